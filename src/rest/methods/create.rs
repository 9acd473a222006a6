use super::{ensure_allowed, process_form};
use crate::dtos::RestDto;
use crate::rest::controller::{METHOD_CREATE, RestController};
use crate::rest::error::RestError;
use crate::rest::request_handler::RestRequest;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use tracing::instrument;

/// `POST /` - responds `201 Created` with the new entity.
#[instrument(skip_all, fields(dto = std::any::type_name::<D>()))]
pub async fn create_method<D: RestDto>(
    controller: &RestController<D>,
    request: &RestRequest,
    body: &[u8],
    allowed_http_methods: Option<&[Method]>,
) -> Result<Response, RestError> {
    let (resource, response_handler) = controller.parts()?;
    ensure_allowed(request, allowed_http_methods.unwrap_or(&[Method::POST]))?;

    let result: Result<Response, RestError> = async {
        let format = response_handler.get_format(request)?;
        controller.get_dto_class(Some(METHOD_CREATE))?;

        let dto = process_form(controller, METHOD_CREATE, body, D::default(), true).await?;
        let entity = resource.create(&dto, false).await?;

        response_handler.create_response(format, &entity, StatusCode::CREATED)
    }
    .await;

    result.map_err(RestError::into_http)
}
