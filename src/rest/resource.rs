//! Generic CRUD facade between the REST methods and a repository.

use super::criteria::{Criteria, OrderBy, SearchTerms};
use super::error::RestError;
use crate::dtos::{FormType, RestDto};
use crate::entities::{Entity, User, UserGroup};
use crate::repositories::{EntityReference, Repository};
use crate::security::Roles;
use async_trait::async_trait;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::{ValidationError, ValidationErrors};

/// Hook run on every entity right before it is persisted.
pub trait EntityListener<E: Entity>: Send + Sync {
    fn before_persist(&self, entity: &mut E) -> Result<(), RestError>;
}

/// Existence check used for the reference fields of submitted forms.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    fn entity_name(&self) -> &'static str;

    async fn exists(&self, id: &str) -> Result<bool, RestError>;
}

pub struct Resource<E: Entity> {
    repository: Arc<dyn Repository<E>>,
    dto_class: Option<&'static str>,
    form_type: Option<FormType>,
    listeners: Vec<Arc<dyn EntityListener<E>>>,
}

impl<E: Entity> Resource<E> {
    pub fn new(repository: Arc<dyn Repository<E>>) -> Self {
        Self {
            repository,
            dto_class: None,
            form_type: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_dto_class<D: RestDto<Entity = E>>(mut self) -> Self {
        self.dto_class = Some(std::any::type_name::<D>());
        self
    }

    pub fn with_form_type(mut self, form_type: FormType) -> Self {
        self.form_type = Some(form_type);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn EntityListener<E>>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn dto_class(&self) -> Result<&'static str, RestError> {
        match self.dto_class {
            Some(dto_class) if !dto_class.is_empty() => Ok(dto_class),
            _ => Err(RestError::UnexpectedState(format!(
                "DTO class not specified for '{}' resource",
                E::NAME
            ))),
        }
    }

    pub fn form_type(&self) -> Result<FormType, RestError> {
        match self.form_type {
            Some(form_type) if !form_type.is_empty() => Ok(form_type),
            _ => Err(RestError::UnexpectedState(format!(
                "FormType class not specified for '{}' resource",
                E::NAME
            ))),
        }
    }

    pub fn get_entity_name(&self) -> &'static str {
        self.repository.get_entity_name()
    }

    pub fn get_reference(&self, id: &str) -> EntityReference {
        self.repository.get_reference(id)
    }

    pub fn get_associations(&self) -> &'static [&'static str] {
        self.repository.get_associations()
    }

    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn find(
        &self,
        criteria: Option<&Criteria>,
        order_by: Option<&OrderBy>,
        limit: Option<u64>,
        offset: Option<u64>,
        search: Option<&SearchTerms>,
    ) -> Result<Vec<E>, RestError> {
        let entities = self
            .repository
            .find_by_advanced(
                criteria.unwrap_or(&Criteria::new()),
                order_by.unwrap_or(&OrderBy::new()),
                limit,
                offset,
                search.unwrap_or(&SearchTerms::default()),
            )
            .await?;

        debug!("Found {} entities", entities.len());
        Ok(entities)
    }

    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn find_one(&self, id: &str, throw_if_not_found: bool) -> Result<Option<E>, RestError> {
        let entity = self.repository.find(id).await?;

        if entity.is_none() && throw_if_not_found {
            warn!("{} '{}' not found", E::NAME, id);
            return Err(RestError::not_found());
        }

        Ok(entity)
    }

    pub async fn find_one_by(
        &self,
        criteria: &Criteria,
        order_by: Option<&OrderBy>,
        throw_if_not_found: bool,
    ) -> Result<Option<E>, RestError> {
        let entity = self
            .repository
            .find_one_by(criteria, order_by.unwrap_or(&OrderBy::new()))
            .await?;

        if entity.is_none() && throw_if_not_found {
            return Err(RestError::not_found());
        }

        Ok(entity)
    }

    pub async fn count(
        &self,
        criteria: Option<&Criteria>,
        search: Option<&SearchTerms>,
    ) -> Result<u64, RestError> {
        let count = self
            .repository
            .count_advanced(
                criteria.unwrap_or(&Criteria::new()),
                search.unwrap_or(&SearchTerms::default()),
            )
            .await?;

        Ok(count)
    }

    pub async fn get_ids(
        &self,
        criteria: Option<&Criteria>,
        search: Option<&SearchTerms>,
    ) -> Result<Vec<String>, RestError> {
        let ids = self
            .repository
            .find_ids(
                criteria.unwrap_or(&Criteria::new()),
                search.unwrap_or(&SearchTerms::default()),
            )
            .await?;

        Ok(ids)
    }

    /// Creates a new entity from a validated DTO.
    #[instrument(skip(self, dto), fields(entity = E::NAME))]
    pub async fn create<D: RestDto<Entity = E>>(
        &self,
        dto: &D,
        skip_validation: bool,
    ) -> Result<E, RestError> {
        if !skip_validation {
            dto.validate()?;
        }

        let mut entity = E::default();
        dto.update(&mut entity);

        let entity = self.save(entity, skip_validation).await?;
        info!("{} '{}' created", E::NAME, entity.id());

        Ok(entity)
    }

    #[instrument(skip(self, dto), fields(entity = E::NAME))]
    pub async fn update<D: RestDto<Entity = E>>(
        &self,
        id: &str,
        dto: &D,
        skip_validation: bool,
    ) -> Result<E, RestError> {
        let mut entity = self.find_one(id, true).await?.ok_or_else(RestError::not_found)?;

        if !skip_validation {
            dto.validate()?;
        }

        dto.update(&mut entity);

        let entity = self.save(entity, skip_validation).await?;
        info!("{} '{}' updated", E::NAME, id);

        Ok(entity)
    }

    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn delete(&self, id: &str) -> Result<E, RestError> {
        let entity = self.find_one(id, true).await?.ok_or_else(RestError::not_found)?;

        self.repository.remove(&entity).await?;
        info!("{} '{}' deleted", E::NAME, id);

        Ok(entity)
    }

    /// Validates (unless skipped), runs the listeners and persists the entity.
    pub async fn save(&self, mut entity: E, skip_validation: bool) -> Result<E, RestError> {
        if !skip_validation {
            self.validate_entity(&entity).await?;
        }

        for listener in &self.listeners {
            listener.before_persist(&mut entity)?;
        }

        self.repository.save(&entity).await?;

        Ok(entity)
    }

    pub async fn get_dto_for_entity<D: RestDto<Entity = E>>(&self, id: &str) -> Result<D, RestError> {
        let entity = self.find_one(id, true).await?.ok_or_else(RestError::not_found)?;

        Ok(D::load(&entity))
    }

    async fn validate_entity(&self, entity: &E) -> Result<(), RestError> {
        let mut errors = match entity.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        for &field in E::UNIQUE {
            let Some(value) = entity.property(field) else {
                continue;
            };

            let mut criteria = Criteria::new();
            criteria.insert(field.to_string(), value.clone());

            let taken = self
                .repository
                .find_one_by(&criteria, &OrderBy::new())
                .await?
                .is_some_and(|other| other.id() != entity.id());

            if taken {
                let mut error = ValidationError::new("unique");
                error.message = Some(Cow::from("This value is already used."));
                error.add_param(Cow::from("value"), &value);
                errors.add(field, error);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(RestError::Validation(errors))
        }
    }
}

impl Resource<User> {
    /// Users whose inherited roles contain the role of `group`.
    pub async fn get_users_for_group(
        &self,
        group: &UserGroup,
        groups: &[UserGroup],
        roles: &Roles,
    ) -> Result<Vec<User>, RestError> {
        let users = self.find(None, None, None, None, None).await?;

        Ok(users
            .into_iter()
            .filter(|user| user.get_roles(groups, roles).contains(&group.role))
            .collect())
    }
}

#[async_trait]
impl<E: Entity> ReferenceResolver for Resource<E> {
    fn entity_name(&self) -> &'static str {
        E::NAME
    }

    async fn exists(&self, id: &str) -> Result<bool, RestError> {
        Ok(self.find_one(id, false).await?.is_some())
    }
}

/// Resolves scalar or list reference values to ids.
pub fn reference_ids(value: &Value) -> Vec<String> {
    match value {
        Value::String(id) => vec![id.clone()],
        Value::Number(id) => vec![id.to_string()],
        Value::Array(items) => items.iter().flat_map(reference_ids).collect(),
        _ => Vec::new(),
    }
}
