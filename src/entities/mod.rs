//! Entities module - domain objects persisted through the repositories.

pub mod role;
pub mod user;
pub mod user_group;

pub use role::Role;
pub use user::User;
pub use user_group::UserGroup;

use serde::Serialize;
use serde_json::Value;
use validator::Validate;

/// Persistent domain object with a string identity.
///
/// `Default` must produce a fresh entity (new identity where the entity owns one).
pub trait Entity: Clone + Default + Serialize + Validate + Send + Sync + 'static {
    /// Short entity name used in messages and references.
    const NAME: &'static str;

    /// Scalar properties that can be filtered and sorted on.
    const PROPERTIES: &'static [&'static str];

    /// Collection valued associations, holding ids of other entities.
    const ASSOCIATIONS: &'static [&'static str] = &[];

    /// Properties matched by free text search.
    const SEARCH_COLUMNS: &'static [&'static str] = &[];

    /// Properties whose values must be unique across all entities.
    const UNIQUE: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    /// Value of a scalar property, `None` for unknown properties.
    fn property(&self, name: &str) -> Option<Value>;

    /// Ids held by a collection association.
    fn association(&self, _name: &str) -> Option<Vec<String>> {
        None
    }
}
