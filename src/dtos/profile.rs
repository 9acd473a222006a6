//! Response DTOs with associations expanded, used by `/auth/profile` and the user routes.

use crate::entities::{Role, User, UserGroup};
use serde::Serialize;

/// Group with its role object instead of the role id
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserGroupView {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl UserGroupView {
    /// `roles` must contain the role of the group, else the description is left empty.
    pub fn new(group: &UserGroup, roles: &[Role]) -> Self {
        let role = roles
            .iter()
            .find(|role| role.id == group.role)
            .cloned()
            .unwrap_or_else(|| Role::new(group.role.clone(), ""));

        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            role,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub firstname: String,
    pub surname: String,
    pub email: String,
    pub user_groups: Vec<UserGroupView>,
    /// Direct and inherited roles
    pub roles: Vec<String>,
}

impl UserProfile {
    pub fn new(user: &User, groups: &[UserGroup], all_roles: &[Role], roles: Vec<String>) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            user_groups: groups
                .iter()
                .filter(|group| user.user_groups.contains(&group.id))
                .map(|group| UserGroupView::new(group, all_roles))
                .collect(),
            roles,
        }
    }
}
