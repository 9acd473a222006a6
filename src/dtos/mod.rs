//! DTOs module - Data Transfer Objects
//!
//! I DTO separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).
//! Ogni campo è un [`Patch`], così `update` applica solo ciò che il client ha inviato.

pub mod patch;
pub mod profile;
pub mod role;
pub mod user;
pub mod user_group;

pub use patch::Patch;
pub use profile::{UserGroupView, UserProfile};
pub use role::RoleDto;
pub use user::UserDto;
pub use user_group::UserGroupDto;

use crate::entities::Entity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use validator::{Validate, ValidationErrors};

/// Transport representation of the settable fields of an entity.
pub trait RestDto: Default + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Entity: Entity;

    /// Copies the entity state; every loaded field counts as set.
    fn load(entity: &Self::Entity) -> Self;

    /// Applies the set fields to `entity`, leaving the others untouched.
    fn update(&self, entity: &mut Self::Entity);

    /// Overwrites this DTO with the fields set on `submitted`.
    fn merge(&mut self, submitted: Self);

    /// Names of the set fields.
    fn visited(&self) -> Vec<&'static str>;

    /// Checks the entity constraints against the DTO projected onto a blank entity.
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut entity = Self::Entity::default();
        self.update(&mut entity);
        entity.validate()
    }
}

/// Body fields a controller accepts for one HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormType {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

impl FormType {
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn accepts(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}
