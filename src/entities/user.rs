//! User entity - Entità utente con metodi per gestione password

use super::{Entity, UserGroup};
use crate::security::Roles;
use bcrypt::{hash, verify};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref USERNAME_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9._@-]+$").unwrap();
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[validate(
        length(min = 2, max = 255, message = "Username must be between 2 and 255 characters"),
        regex(path = *USERNAME_PATTERN, message = "Username contains invalid characters")
    )]
    pub username: String,
    #[validate(length(min = 2, max = 255, message = "Firstname must be between 2 and 255 characters"))]
    pub firstname: String,
    #[validate(length(min = 2, max = 255, message = "Surname must be between 2 and 255 characters"))]
    pub surname: String,
    #[validate(email(message = "Email is not a valid email address"))]
    pub email: String,
    /// bcrypt hash, mai esposta al client
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Transient value waiting to be hashed on persist
    #[serde(skip)]
    #[sqlx(skip)]
    pub plain_password: Option<String>,
    #[serde(default)]
    #[sqlx(skip)]
    pub user_groups: Vec<String>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: String::new(),
            firstname: String::new(),
            surname: String::new(),
            email: String::new(),
            password: String::new(),
            plain_password: None,
            user_groups: Vec::new(),
        }
    }
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with the given cost
    pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, cost)?;
        Ok(hash)
    }

    pub fn set_plain_password(&mut self, plain_password: impl Into<String>) {
        self.plain_password = Some(plain_password.into());
    }

    pub fn clear_user_groups(&mut self) {
        self.user_groups.clear();
    }

    pub fn add_user_group(&mut self, user_group_id: impl Into<String>) -> &mut Self {
        let user_group_id = user_group_id.into();
        if !self.user_groups.contains(&user_group_id) {
            self.user_groups.push(user_group_id);
        }
        self
    }

    /// Roles granted through the user's groups, including inherited ones.
    ///
    /// `groups` may contain any groups; only those the user belongs to count.
    pub fn get_roles(&self, groups: &[UserGroup], roles: &Roles) -> Vec<String> {
        let direct = groups
            .iter()
            .filter(|group| self.user_groups.contains(&group.id))
            .map(|group| group.role.clone())
            .collect::<Vec<_>>();

        roles.get_inherited_roles(&direct)
    }
}

impl Entity for User {
    const NAME: &'static str = "User";
    const PROPERTIES: &'static [&'static str] = &["id", "username", "firstname", "surname", "email"];
    const ASSOCIATIONS: &'static [&'static str] = &["userGroups"];
    const SEARCH_COLUMNS: &'static [&'static str] = &["username", "firstname", "surname", "email"];
    const UNIQUE: &'static [&'static str] = &["username", "email"];

    fn id(&self) -> &str {
        &self.id
    }

    fn property(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => &self.id,
            "username" => &self.username,
            "firstname" => &self.firstname,
            "surname" => &self.surname,
            "email" => &self.email,
            _ => return None,
        };

        Some(Value::from(value.as_str()))
    }

    fn association(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "userGroups" => Some(self.user_groups.clone()),
            _ => None,
        }
    }
}
