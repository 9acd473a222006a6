//! Role DTO - only the description is editable, the id is the role name.

use super::{Patch, RestDto};
use crate::entities::Role;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct RoleDto {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
}

impl RestDto for RoleDto {
    type Entity = Role;

    fn load(entity: &Role) -> Self {
        Self {
            description: Patch::Value(entity.description.clone()),
        }
    }

    fn update(&self, entity: &mut Role) {
        self.description.apply_to(&mut entity.description);
    }

    fn merge(&mut self, submitted: Self) {
        self.description.merge(submitted.description);
    }

    fn visited(&self) -> Vec<&'static str> {
        if self.description.is_set() {
            vec!["description"]
        } else {
            Vec::new()
        }
    }

    // Blank roles have no id, only the description is checked
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        let mut entity = Role::new("ROLE", "");
        self.update(&mut entity);
        validator::Validate::validate(&entity)
    }
}
