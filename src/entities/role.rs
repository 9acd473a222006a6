//! Role entity - the id is the role name itself, eg. `ROLE_ADMIN`.

use super::Entity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Validate, sqlx::FromRow)]
pub struct Role {
    #[validate(length(min = 1, max = 255, message = "Role name cannot be blank"))]
    pub id: String,
    #[validate(length(max = 255, message = "Description cannot exceed 255 characters"))]
    pub description: String,
}

impl Role {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

impl Entity for Role {
    const NAME: &'static str = "Role";
    const PROPERTIES: &'static [&'static str] = &["id", "description"];
    const SEARCH_COLUMNS: &'static [&'static str] = &["id", "description"];
    const UNIQUE: &'static [&'static str] = &["id"];

    fn id(&self) -> &str {
        &self.id
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id.as_str())),
            "description" => Some(Value::from(self.description.as_str())),
            _ => None,
        }
    }
}
