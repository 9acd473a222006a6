use super::ensure_allowed;
use crate::dtos::RestDto;
use crate::rest::controller::RestController;
use crate::rest::error::RestError;
use crate::rest::request_handler::{RestRequest, get_criteria, get_search_terms};
use axum::http::{Method, StatusCode};
use axum::response::Response;
use serde_json::json;
use tracing::instrument;

/// `GET /count` - `{"count": n}` for `where` and `search`.
#[instrument(skip_all, fields(dto = std::any::type_name::<D>()))]
pub async fn count_method<D: RestDto>(
    controller: &RestController<D>,
    request: &RestRequest,
    allowed_http_methods: Option<&[Method]>,
) -> Result<Response, RestError> {
    let (resource, response_handler) = controller.parts()?;
    ensure_allowed(request, allowed_http_methods.unwrap_or(&[Method::GET]))?;

    let result: Result<Response, RestError> = async {
        let format = response_handler.get_format(request)?;
        let criteria = get_criteria(&request.query)?;
        let search = get_search_terms(&request.query)?;

        let count = resource.count(Some(&criteria), Some(&search)).await?;

        response_handler.create_response(format, &json!({ "count": count }), StatusCode::OK)
    }
    .await;

    result.map_err(RestError::into_http)
}
