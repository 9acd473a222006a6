use super::Entity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Validate, sqlx::FromRow)]
pub struct UserGroup {
    pub id: String,
    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    pub name: String,
    /// Id of the role granted to group members
    #[validate(length(min = 1, message = "Role cannot be blank"))]
    pub role: String,
}

impl Default for UserGroup {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            role: String::new(),
        }
    }
}

impl UserGroup {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Self::default()
        }
    }
}

impl Entity for UserGroup {
    const NAME: &'static str = "UserGroup";
    const PROPERTIES: &'static [&'static str] = &["id", "name", "role"];
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "role"];

    fn id(&self) -> &str {
        &self.id
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id.as_str())),
            "name" => Some(Value::from(self.name.as_str())),
            "role" => Some(Value::from(self.role.as_str())),
            _ => None,
        }
    }
}
