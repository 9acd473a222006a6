//! Per-resource controller: the resource, the response handler and the form bindings
//! the REST methods run against.

use super::error::RestError;
use super::resource::{ReferenceResolver, Resource};
use super::response_handler::ResponseHandler;
use crate::dtos::{FormType, RestDto};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

pub const METHOD_COUNT: &str = "countMethod";
pub const METHOD_CREATE: &str = "createMethod";
pub const METHOD_DELETE: &str = "deleteMethod";
pub const METHOD_FIND: &str = "findMethod";
pub const METHOD_FIND_ONE: &str = "findOneMethod";
pub const METHOD_IDS: &str = "idsMethod";
pub const METHOD_PATCH: &str = "patchMethod";
pub const METHOD_UPDATE: &str = "updateMethod";

pub struct RestController<D: RestDto> {
    resource: Option<Arc<Resource<D::Entity>>>,
    response_handler: Option<ResponseHandler>,
    dto_classes: HashMap<&'static str, &'static str>,
    form_types: HashMap<&'static str, FormType>,
    references: Vec<(&'static str, Arc<dyn ReferenceResolver>)>,
    dto: PhantomData<fn() -> D>,
}

impl<D: RestDto> Default for RestController<D> {
    fn default() -> Self {
        Self {
            resource: None,
            response_handler: None,
            dto_classes: HashMap::new(),
            form_types: HashMap::new(),
            references: Vec::new(),
            dto: PhantomData,
        }
    }
}

impl<D: RestDto> RestController<D> {
    pub fn new(resource: Arc<Resource<D::Entity>>, response_handler: ResponseHandler) -> Self {
        let mut controller = Self::default();
        controller.init(resource, response_handler);
        controller
    }

    pub fn init(&mut self, resource: Arc<Resource<D::Entity>>, response_handler: ResponseHandler) {
        self.resource = Some(resource);
        self.response_handler = Some(response_handler);
    }

    /// Overrides the resource DTO class for one REST method.
    pub fn with_dto_class(mut self, method: &'static str, dto_class: &'static str) -> Self {
        self.dto_classes.insert(method, dto_class);
        self
    }

    /// Overrides the resource form type for one REST method.
    pub fn with_form_type(mut self, method: &'static str, form_type: FormType) -> Self {
        self.form_types.insert(method, form_type);
        self
    }

    /// Submitted `field` values must be ids known by `resolver`.
    pub fn with_reference(mut self, field: &'static str, resolver: Arc<dyn ReferenceResolver>) -> Self {
        self.references.push((field, resolver));
        self
    }

    pub fn get_resource(&self) -> Result<&Arc<Resource<D::Entity>>, RestError> {
        self.resource.as_ref().ok_or_else(|| {
            RestError::Logic(format!(
                "Resource is not set for '{}' controller, call init() first",
                std::any::type_name::<D>()
            ))
        })
    }

    pub fn get_response_handler(&self) -> Result<&ResponseHandler, RestError> {
        self.response_handler.as_ref().ok_or_else(|| {
            RestError::Logic(format!(
                "ResponseHandler is not set for '{}' controller, call init() first",
                std::any::type_name::<D>()
            ))
        })
    }

    pub fn get_dto_class(&self, method: Option<&str>) -> Result<&'static str, RestError> {
        match method.and_then(|method| self.dto_classes.get(method)) {
            Some(dto_class) => Ok(*dto_class),
            None => self.get_resource()?.dto_class(),
        }
    }

    pub fn get_form_type(&self, method: Option<&str>) -> Result<FormType, RestError> {
        match method.and_then(|method| self.form_types.get(method)) {
            Some(form_type) => Ok(*form_type),
            None => self.get_resource()?.form_type(),
        }
    }

    pub fn references(&self) -> &[(&'static str, Arc<dyn ReferenceResolver>)] {
        &self.references
    }

    /// Both collaborators, or the `LogicError` of the first missing one.
    pub(crate) fn parts(&self) -> Result<(&Resource<D::Entity>, &ResponseHandler), RestError> {
        Ok((self.get_resource()?.as_ref(), self.get_response_handler()?))
    }
}
