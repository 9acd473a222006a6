use super::{ensure_allowed, process_form};
use crate::dtos::RestDto;
use crate::rest::controller::{METHOD_PATCH, RestController};
use crate::rest::error::RestError;
use crate::rest::request_handler::RestRequest;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use tracing::instrument;

/// `PATCH /{id}` - only the fields present in the body change.
#[instrument(skip(controller, request, body, allowed_http_methods), fields(dto = std::any::type_name::<D>()))]
pub async fn patch_method<D: RestDto>(
    controller: &RestController<D>,
    request: &RestRequest,
    id: &str,
    body: &[u8],
    allowed_http_methods: Option<&[Method]>,
) -> Result<Response, RestError> {
    let (resource, response_handler) = controller.parts()?;
    ensure_allowed(request, allowed_http_methods.unwrap_or(&[Method::PATCH]))?;

    let result: Result<Response, RestError> = async {
        let format = response_handler.get_format(request)?;
        controller.get_dto_class(Some(METHOD_PATCH))?;

        let dto = resource.get_dto_for_entity::<D>(id).await?;
        let dto = process_form(controller, METHOD_PATCH, body, dto, false).await?;
        let entity = resource.update(id, &dto, false).await?;

        response_handler.create_response(format, &entity, StatusCode::OK)
    }
    .await;

    result.map_err(RestError::into_http)
}
