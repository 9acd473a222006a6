//! Error taxonomy of the generic REST layer.

use crate::core::AppError;
use crate::repositories::RepositoryError;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum RestError {
    /// Malformed request input (query parameters, body, form fields).
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed(Vec<Method>),

    #[error("{0}")]
    NotAcceptable(String),

    /// An error already translated to HTTP at the dispatch boundary.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Misconfigured controller. Never converted at the dispatch boundary.
    #[error("{0}")]
    Logic(String),

    #[error("{0}")]
    UnexpectedState(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RestError {
    pub fn not_found() -> Self {
        Self::NotFound("Not found".to_string())
    }

    /// HTTP errors pass the dispatch boundary unchanged.
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_)
                | Self::NotFound(_)
                | Self::MethodNotAllowed(_)
                | Self::NotAcceptable(_)
                | Self::Http { .. }
        )
    }

    /// Status code carried by the error itself, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::MethodNotAllowed(_) => Some(StatusCode::METHOD_NOT_ALLOWED),
            Self::NotAcceptable(_) => Some(StatusCode::NOT_ACCEPTABLE),
            Self::Http { status, .. } => Some(*status),
            Self::Repository(error) => error.status_code(),
            Self::Validation(_) | Self::Logic(_) | Self::UnexpectedState(_) => None,
        }
    }

    /// Conversion applied once at the dispatch boundary of every REST method.
    pub fn into_http(self) -> Self {
        if self.is_http() {
            return self;
        }

        let status = self.status_code().unwrap_or(StatusCode::BAD_REQUEST);

        Self::Http {
            status,
            message: self.to_string(),
        }
    }
}

impl From<RestError> for AppError {
    fn from(error: RestError) -> Self {
        match error {
            RestError::MethodNotAllowed(allowed) => AppError::method_not_allowed(&allowed),
            RestError::Validation(errors) => AppError::from(errors),
            RestError::Logic(message) => AppError::internal_server_error(message),
            RestError::Repository(RepositoryError::Database(err)) => AppError::from(err),
            other => {
                let status = other
                    .status_code()
                    .unwrap_or(StatusCode::BAD_REQUEST);
                AppError::new(status, other.to_string())
            }
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
