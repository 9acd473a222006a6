//! In-memory repository, selected with `DATABASE_URL=memory://`.
//!
//! Filtering mirrors the MySQL adapter: equality / `IN` on properties and
//! associations, `LIKE %term%` search over the search columns.

use super::{Repository, RepositoryError};
use crate::entities::Entity;
use crate::rest::criteria::{Criteria, Direction, OrderBy, SearchTerms};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

pub struct InMemoryRepository<E: Entity> {
    entities: RwLock<Vec<E>>,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::with_entities(Vec::new())
    }

    pub fn with_entities(entities: Vec<E>) -> Self {
        Self {
            entities: RwLock::new(entities),
        }
    }

    async fn select(
        &self,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<Vec<E>, RepositoryError> {
        check_properties::<E>(criteria.keys().map(String::as_str))?;

        let entities = self.entities.read().await;
        let mut output = Vec::new();

        for entity in entities.iter() {
            if matches_criteria(entity, criteria) && matches_search(entity, search) {
                output.push(entity.clone());
            }
        }

        Ok(output)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn find(&self, id: &str) -> Result<Option<E>, RepositoryError> {
        let entities = self.entities.read().await;

        Ok(entities.iter().find(|entity| entity.id() == id).cloned())
    }

    #[instrument(skip(self), fields(entity = E::NAME))]
    async fn find_by_advanced(
        &self,
        criteria: &Criteria,
        order_by: &OrderBy,
        limit: Option<u64>,
        offset: Option<u64>,
        search: &SearchTerms,
    ) -> Result<Vec<E>, RepositoryError> {
        check_properties::<E>(order_by.iter().map(|(column, _)| column))?;

        let mut entities = self.select(criteria, search).await?;

        if !order_by.is_empty() {
            entities.sort_by(|a, b| compare(a, b, order_by));
        }

        let offset = offset.unwrap_or(0) as usize;
        let limit = limit.map(|limit| limit as usize).unwrap_or(usize::MAX);

        let entities = entities.into_iter().skip(offset).take(limit).collect::<Vec<_>>();
        debug!("Found {} entities", entities.len());

        Ok(entities)
    }

    async fn count_advanced(
        &self,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<u64, RepositoryError> {
        Ok(self.select(criteria, search).await?.len() as u64)
    }

    async fn find_ids(
        &self,
        criteria: &Criteria,
        search: &SearchTerms,
    ) -> Result<Vec<String>, RepositoryError> {
        let entities = self.select(criteria, search).await?;

        Ok(entities.iter().map(|entity| entity.id().to_string()).collect())
    }

    async fn save(&self, entity: &E) -> Result<(), RepositoryError> {
        let mut entities = self.entities.write().await;

        match entities.iter_mut().find(|existing| existing.id() == entity.id()) {
            Some(existing) => *existing = entity.clone(),
            None => entities.push(entity.clone()),
        }

        Ok(())
    }

    async fn remove(&self, entity: &E) -> Result<(), RepositoryError> {
        let mut entities = self.entities.write().await;
        entities.retain(|existing| existing.id() != entity.id());

        Ok(())
    }
}

fn strip_alias(path: &str) -> &str {
    path.strip_prefix("entity.").unwrap_or(path)
}

fn check_properties<'a, E: Entity>(
    paths: impl IntoIterator<Item = &'a str>,
) -> Result<(), RepositoryError> {
    for path in paths {
        let property = strip_alias(path);

        if !E::PROPERTIES.contains(&property) && !E::ASSOCIATIONS.contains(&property) {
            return Err(RepositoryError::unknown_property(E::NAME, property));
        }
    }

    Ok(())
}

fn matches_criteria<E: Entity>(entity: &E, criteria: &Criteria) -> bool {
    criteria.iter().all(|(path, expected)| {
        let property = strip_alias(path);

        let actual = match entity.association(property) {
            Some(ids) => ids.into_iter().map(Value::from).collect(),
            None => entity.property(property).into_iter().collect::<Vec<_>>(),
        };

        let expected = match expected {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        };

        actual
            .iter()
            .any(|value| expected.iter().any(|candidate| same_scalar(value, candidate)))
    })
}

fn matches_search<E: Entity>(entity: &E, search: &SearchTerms) -> bool {
    let haystack = E::SEARCH_COLUMNS
        .iter()
        .filter_map(|column| entity.property(column).map(|value| scalar_text(&value).to_lowercase()))
        .collect::<Vec<_>>();

    let hit = |term: &String| {
        let term = term.to_lowercase();
        haystack.iter().any(|value| value.contains(&term))
    };

    search.and.iter().all(hit) && (search.or.is_empty() || search.or.iter().any(hit))
}

fn compare<E: Entity>(a: &E, b: &E, order_by: &OrderBy) -> Ordering {
    for (path, direction) in order_by.iter() {
        let property = strip_alias(path);
        let left = a.property(property).unwrap_or(Value::Null);
        let right = b.property(property).unwrap_or(Value::Null);

        let ordering = match (left.as_f64(), right.as_f64()) {
            (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
            _ => scalar_text(&left).cmp(&scalar_text(&right)),
        };

        let ordering = match direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

// Loose comparison, `1` matches `"1"` as it would in SQL
fn same_scalar(left: &Value, right: &Value) -> bool {
    scalar_text(left) == scalar_text(right)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
