//! Common repository traits
//!
//! This module defines the generic interface the REST resources use to reach
//! persistence.

use crate::entities::Entity;
use crate::rest::criteria::{Criteria, OrderBy, SearchTerms};
use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Filter or sort on a property the entity does not expose.
    #[error("Property '{property}' is not supported by '{entity}'")]
    UnknownProperty {
        entity: &'static str,
        property: String,
    },

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn unknown_property(entity: &'static str, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            entity,
            property: property.into(),
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::UnknownProperty { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Database(sqlx::Error::RowNotFound) => Some(StatusCode::NOT_FOUND),
            Self::Database(sqlx::Error::Database(_)) => Some(StatusCode::BAD_REQUEST),
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) => {
                Some(StatusCode::SERVICE_UNAVAILABLE)
            }
            Self::Database(_) => Some(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

/// Lightweight pointer to an entity that has not been loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReference {
    pub entity: &'static str,
    pub id: String,
}

/// Persistence contract of a single entity type.
///
/// # Type Parameters
/// * `E` - Entity stored by the repository
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    fn get_entity_name(&self) -> &'static str {
        E::NAME
    }

    fn get_associations(&self) -> &'static [&'static str] {
        E::ASSOCIATIONS
    }

    fn get_reference(&self, id: &str) -> EntityReference {
        EntityReference {
            entity: E::NAME,
            id: id.to_string(),
        }
    }

    /// Reads an entity by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(E))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    async fn find(&self, id: &str) -> Result<Option<E>, RepositoryError>;

    async fn find_by_advanced(
        &self,
        criteria: &Criteria,
        order_by: &OrderBy,
        limit: Option<u64>,
        offset: Option<u64>,
        search: &SearchTerms,
    ) -> Result<Vec<E>, RepositoryError>;

    async fn find_one_by(
        &self,
        criteria: &Criteria,
        order_by: &OrderBy,
    ) -> Result<Option<E>, RepositoryError> {
        let entities = self
            .find_by_advanced(criteria, order_by, Some(1), None, &SearchTerms::default())
            .await?;

        Ok(entities.into_iter().next())
    }

    async fn count_advanced(
        &self,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<u64, RepositoryError>;

    async fn find_ids(
        &self,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<Vec<String>, RepositoryError>;

    /// Inserts or updates the entity together with its associations
    async fn save(&self, entity: &E) -> Result<(), RepositoryError>;

    async fn remove(&self, entity: &E) -> Result<(), RepositoryError>;
}
