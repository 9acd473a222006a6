//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Gli endpoint CRUD generici sono in `rest::routes`; qui stanno l'autenticazione
//! e le route aggiuntive delle singole risorse.

pub mod auth;
pub mod role;
pub mod user;
pub mod user_group;

// Re-exports per facilitare l'import
pub use auth::{get_token, profile};
pub use role::inherited_roles;
pub use user::{user_groups, user_roles};
pub use user_group::group_users;

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
