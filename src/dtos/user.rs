//! User DTO - Data Transfer Object per utenti

use super::{FormType, Patch, RestDto};
use crate::entities::User;
use serde::{Deserialize, Serialize};

pub const USER_CREATE_FORM: FormType = FormType::new(
    "UserCreateType",
    &["username", "firstname", "surname", "email", "password", "userGroups"],
);

pub const USER_UPDATE_FORM: FormType = FormType::new(
    "UserType",
    &["username", "firstname", "surname", "email", "password"],
);

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDto {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub username: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub firstname: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub surname: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub email: Patch<String>,
    /// Plain text, mai esposta al client
    #[serde(skip_serializing)]
    pub password: Patch<String>,
    /// Group ids
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub user_groups: Patch<Vec<String>>,
}

impl RestDto for UserDto {
    type Entity = User;

    // The stored hash never goes back into a DTO
    fn load(entity: &User) -> Self {
        Self {
            username: Patch::Value(entity.username.clone()),
            firstname: Patch::Value(entity.firstname.clone()),
            surname: Patch::Value(entity.surname.clone()),
            email: Patch::Value(entity.email.clone()),
            password: Patch::Unset,
            user_groups: Patch::Value(entity.user_groups.clone()),
        }
    }

    fn update(&self, entity: &mut User) {
        self.username.apply_to(&mut entity.username);
        self.firstname.apply_to(&mut entity.firstname);
        self.surname.apply_to(&mut entity.surname);
        self.email.apply_to(&mut entity.email);

        if let Patch::Value(password) = &self.password {
            if !password.is_empty() {
                entity.set_plain_password(password.clone());
            }
        }

        match &self.user_groups {
            Patch::Value(groups) => {
                entity.clear_user_groups();
                for group in groups {
                    entity.add_user_group(group.clone());
                }
            }
            Patch::Null => entity.clear_user_groups(),
            Patch::Unset => {}
        }
    }

    fn merge(&mut self, submitted: Self) {
        self.username.merge(submitted.username);
        self.firstname.merge(submitted.firstname);
        self.surname.merge(submitted.surname);
        self.email.merge(submitted.email);
        self.password.merge(submitted.password);
        self.user_groups.merge(submitted.user_groups);
    }

    fn visited(&self) -> Vec<&'static str> {
        [
            ("username", self.username.is_set()),
            ("firstname", self.firstname.is_set()),
            ("surname", self.surname.is_set()),
            ("email", self.email.is_set()),
            ("password", self.password.is_set()),
            ("userGroups", self.user_groups.is_set()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }
}
