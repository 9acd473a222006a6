//! One REST method per HTTP verb.
//!
//! Every method follows the same steps: check the controller is initialized (a
//! `LogicError` escapes untouched), check the HTTP method is allowed, then run the
//! resource call inside a single error boundary ([`RestError::into_http`]).

mod count;
mod create;
mod delete;
mod find;
mod find_one;
mod ids;
mod patch;
mod update;

pub use count::count_method;
pub use create::create_method;
pub use delete::delete_method;
pub use find::find_method;
pub use find_one::find_one_method;
pub use ids::ids_method;
pub use patch::patch_method;
pub use update::update_method;

use super::controller::RestController;
use super::error::RestError;
use super::request_handler::RestRequest;
use super::resource::reference_ids;
use crate::dtos::RestDto;
use axum::http::Method;
use serde_json::Value;
use tracing::warn;

pub(crate) fn ensure_allowed(request: &RestRequest, allowed: &[Method]) -> Result<(), RestError> {
    if allowed.contains(&request.method) {
        return Ok(());
    }

    warn!("Method {} not allowed, expected one of {:?}", request.method, allowed);
    Err(RestError::MethodNotAllowed(allowed.to_vec()))
}

/// Binds a request body to `dto` through the form type of `method`.
///
/// With `clear_missing` the form fields absent from the body are submitted as `null`.
pub(crate) async fn process_form<D: RestDto>(
    controller: &RestController<D>,
    method: &str,
    body: &[u8],
    mut dto: D,
    clear_missing: bool,
) -> Result<D, RestError> {
    let form_type = controller.get_form_type(Some(method))?;
    let response_handler = controller.get_response_handler()?;

    let mut fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        _ => {
            return Err(RestError::BadRequest(
                "Request body must be a JSON object.".to_string(),
            ));
        }
    };

    if fields.keys().any(|field| !form_type.accepts(field)) {
        return Err(response_handler
            .handle_form_error(&["This form should not contain extra fields.".to_string()]));
    }

    if clear_missing {
        for field in form_type.fields {
            fields.entry(field.to_string()).or_insert(Value::Null);
        }
    }

    let mut errors = Vec::new();

    for (field, resolver) in controller.references() {
        let Some(value) = fields.get(*field) else {
            continue;
        };

        for id in reference_ids(value) {
            if !resolver.exists(&id).await? {
                errors.push(format!(
                    "{} with id \"{}\" does not exist!",
                    resolver.entity_name(),
                    id
                ));
            }
        }
    }

    if !errors.is_empty() {
        return Err(response_handler.handle_form_error(&errors));
    }

    let submitted = serde_json::from_value::<D>(Value::Object(fields))
        .map_err(|e| response_handler.handle_form_error(&[format!("Invalid form data: {e}")]))?;

    dto.merge(submitted);

    Ok(dto)
}
