use super::ensure_allowed;
use crate::dtos::RestDto;
use crate::rest::controller::RestController;
use crate::rest::error::RestError;
use crate::rest::request_handler::{RestRequest, get_list_query};
use axum::http::{Method, StatusCode};
use axum::response::Response;
use tracing::instrument;

/// `GET /` - entities matching `where`, `order`, `limit`, `offset` and `search`.
#[instrument(skip_all, fields(dto = std::any::type_name::<D>()))]
pub async fn find_method<D: RestDto>(
    controller: &RestController<D>,
    request: &RestRequest,
    allowed_http_methods: Option<&[Method]>,
) -> Result<Response, RestError> {
    let (resource, response_handler) = controller.parts()?;
    ensure_allowed(request, allowed_http_methods.unwrap_or(&[Method::GET]))?;

    let result: Result<Response, RestError> = async {
        let format = response_handler.get_format(request)?;
        let query = get_list_query(&request.query)?;

        let entities = resource
            .find(
                Some(&query.criteria),
                Some(&query.order_by),
                query.limit,
                query.offset,
                Some(&query.search),
            )
            .await?;

        response_handler.create_response(format, &entities, StatusCode::OK)
    }
    .await;

    result.map_err(RestError::into_http)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::methods::tests::fixture;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_find_returns_ok() {
        let fixture = fixture();

        let response = find_method(&fixture.controller, &RestRequest::new(Method::GET), None)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_where_is_bad_request() {
        let fixture = fixture();
        let request = RestRequest::new(Method::GET).with_query("where=foo");

        let error = find_method(&fixture.controller, &request, None).await.unwrap_err();

        assert!(matches!(error, RestError::BadRequest(_)));
        assert_eq!(fixture.repository.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_property_keeps_its_status() {
        let fixture = fixture();
        let request = RestRequest::new(Method::GET).with_query("order=-foo");

        let error = find_method(&fixture.controller, &request, None).await.unwrap_err();

        assert_eq!(error.status_code(), Some(StatusCode::BAD_REQUEST));
        assert!(matches!(error, RestError::Http { .. }));
    }
}
