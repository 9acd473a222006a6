//! Builds HTTP responses out of resource results.

use super::error::RestError;
use super::request_handler::RestRequest;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

pub const FORMAT_JSON: &str = "json";

const JSON_MEDIA_TYPES: &[&str] = &["application/json", "application/*", "*/*"];

#[derive(Debug, Clone, Default)]
pub struct ResponseHandler;

impl ResponseHandler {
    pub fn new() -> Self {
        Self
    }

    /// Serializes `data` in `format`, as returned by [`Self::get_format`].
    pub fn create_response<T: Serialize>(
        &self,
        format: &str,
        data: &T,
        status: StatusCode,
    ) -> Result<Response, RestError> {
        match format {
            FORMAT_JSON => Ok((status, Json(data)).into_response()),
            other => Err(RestError::NotAcceptable(format!(
                "Requested format '{other}' is not supported, use 'application/json'"
            ))),
        }
    }

    /// Response format for the request, only JSON is produced.
    ///
    /// Must be called before the resource is touched, a write never happens for
    /// a request whose response cannot be produced.
    pub fn get_format(&self, request: &RestRequest) -> Result<&'static str, RestError> {
        let Some(accept) = request.accept.as_deref().filter(|accept| !accept.trim().is_empty())
        else {
            return Ok(FORMAT_JSON);
        };

        let accepted = accept
            .split(',')
            .filter_map(|media_range| media_range.split(';').next())
            .map(|media_type| media_type.trim().to_ascii_lowercase())
            .any(|media_type| JSON_MEDIA_TYPES.contains(&media_type.as_str()));

        if accepted {
            Ok(FORMAT_JSON)
        } else {
            warn!("Cannot produce any of: {}", accept);
            Err(RestError::NotAcceptable(format!(
                "Requested format '{accept}' is not supported, use 'application/json'"
            )))
        }
    }

    /// Turns form violations into a `400 Bad Request`.
    pub fn handle_form_error(&self, errors: &[String]) -> RestError {
        RestError::BadRequest(errors.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use serde_json::json;

    #[test]
    fn test_json_is_negotiated() {
        let handler = ResponseHandler::new();

        for accept in ["application/json", "text/html, application/*;q=0.8", "*/*"] {
            let request = RestRequest::new(Method::GET).with_accept(accept);
            assert_eq!(handler.get_format(&request).unwrap(), FORMAT_JSON, "accept: {accept}");
        }

        assert_eq!(handler.get_format(&RestRequest::new(Method::GET)).unwrap(), FORMAT_JSON);
    }

    #[test]
    fn test_unsupported_format_is_not_acceptable() {
        let request = RestRequest::new(Method::GET).with_accept("application/xml");

        let error = ResponseHandler::new().get_format(&request).unwrap_err();

        assert!(matches!(error, RestError::NotAcceptable(_)));
    }

    #[test]
    fn test_create_response_keeps_status() {
        let response = ResponseHandler::new()
            .create_response(FORMAT_JSON, &json!({"id": "1"}), StatusCode::CREATED)
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_form_errors_are_bad_request() {
        let error = ResponseHandler::new().handle_form_error(&["a".to_string(), "b".to_string()]);

        assert!(matches!(error, RestError::BadRequest(message) if message == "a\nb"));
    }
}
