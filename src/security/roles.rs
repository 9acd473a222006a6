//! Role hierarchy service.
//!
//! Every role implicitly grants the roles below it:
//! `ROLE_ROOT -> ROLE_ADMIN -> ROLE_USER -> ROLE_LOGGED`.

use std::collections::HashMap;

pub const ROLE_LOGGED: &str = "ROLE_LOGGED";
pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_ROOT: &str = "ROLE_ROOT";

#[derive(Debug, Clone)]
pub struct Roles {
    hierarchy: HashMap<String, Vec<String>>,
}

impl Default for Roles {
    fn default() -> Self {
        Self::new([
            (ROLE_ROOT, vec![ROLE_ADMIN]),
            (ROLE_ADMIN, vec![ROLE_USER]),
            (ROLE_USER, vec![ROLE_LOGGED]),
        ])
    }
}

impl Roles {
    pub fn new<'a>(hierarchy: impl IntoIterator<Item = (&'a str, Vec<&'a str>)>) -> Self {
        Self {
            hierarchy: hierarchy
                .into_iter()
                .map(|(role, children)| {
                    (role.to_string(), children.into_iter().map(str::to_string).collect())
                })
                .collect(),
        }
    }

    /// Roles known by the application, lowest first.
    pub fn get_roles(&self) -> Vec<&'static str> {
        vec![ROLE_LOGGED, ROLE_USER, ROLE_ADMIN, ROLE_ROOT]
    }

    pub fn get_role_label(&self, role: &str) -> String {
        match role {
            ROLE_LOGGED => "Logged in users".to_string(),
            ROLE_USER => "Normal users".to_string(),
            ROLE_ADMIN => "Admin users".to_string(),
            ROLE_ROOT => "Root users".to_string(),
            other => format!("Unknown - {other}"),
        }
    }

    /// `ROLE_ADMIN` => `admin`
    pub fn get_short(&self, role: &str) -> String {
        role.strip_prefix("ROLE_").unwrap_or(role).to_lowercase()
    }

    /// Given roles followed by everything they inherit, without duplicates.
    pub fn get_inherited_roles<S: AsRef<str>>(&self, roles: &[S]) -> Vec<String> {
        let mut output: Vec<String> = Vec::new();
        let mut queue = roles
            .iter()
            .map(|role| role.as_ref().to_string())
            .collect::<std::collections::VecDeque<_>>();

        while let Some(role) = queue.pop_front() {
            if output.contains(&role) {
                continue;
            }

            if let Some(children) = self.hierarchy.get(&role) {
                queue.extend(children.iter().cloned());
            }

            output.push(role);
        }

        output
    }

    pub fn has_role<S: AsRef<str>>(&self, granted: &[S], role: &str) -> bool {
        self.get_inherited_roles(granted).iter().any(|r| r == role)
    }
}
