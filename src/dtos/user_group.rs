use super::{FormType, Patch, RestDto};
use crate::entities::UserGroup;
use serde::{Deserialize, Serialize};

pub const USER_GROUP_FORM: FormType = FormType::new("UserGroupType", &["name", "role"]);

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct UserGroupDto {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    /// Role id
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub role: Patch<String>,
}

impl RestDto for UserGroupDto {
    type Entity = UserGroup;

    fn load(entity: &UserGroup) -> Self {
        Self {
            name: Patch::Value(entity.name.clone()),
            role: Patch::Value(entity.role.clone()),
        }
    }

    fn update(&self, entity: &mut UserGroup) {
        self.name.apply_to(&mut entity.name);
        self.role.apply_to(&mut entity.role);
    }

    fn merge(&mut self, submitted: Self) {
        self.name.merge(submitted.name);
        self.role.merge(submitted.role);
    }

    fn visited(&self) -> Vec<&'static str> {
        [("name", self.name.is_set()), ("role", self.role.is_set())]
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }
}
