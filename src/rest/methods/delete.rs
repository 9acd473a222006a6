use super::ensure_allowed;
use crate::dtos::RestDto;
use crate::rest::controller::RestController;
use crate::rest::error::RestError;
use crate::rest::request_handler::RestRequest;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use tracing::instrument;

/// `DELETE /{id}` - responds with the removed entity.
#[instrument(skip(controller, request, allowed_http_methods), fields(dto = std::any::type_name::<D>()))]
pub async fn delete_method<D: RestDto>(
    controller: &RestController<D>,
    request: &RestRequest,
    id: &str,
    allowed_http_methods: Option<&[Method]>,
) -> Result<Response, RestError> {
    let (resource, response_handler) = controller.parts()?;
    ensure_allowed(request, allowed_http_methods.unwrap_or(&[Method::DELETE]))?;

    let result: Result<Response, RestError> = async {
        let format = response_handler.get_format(request)?;
        let entity = resource.delete(id).await?;

        response_handler.create_response(format, &entity, StatusCode::OK)
    }
    .await;

    result.map_err(RestError::into_http)
}
