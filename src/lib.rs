//! Server library - espone i moduli principali per i test e per la console

pub mod commands;
pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod rest;
pub mod security;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes(state.clone()))
        .nest("/role", configure_role_routes(state.clone()))
        .nest("/user_group", configure_user_group_routes(state.clone()))
        .nest("/user", configure_user_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Configura le routes di autenticazione: getToken è pubblica, profile richiede il token
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::{get_token, profile};

    let protected = Router::new()
        .route("/profile", get(profile))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    Router::new()
        .route("/getToken", post(get_token))
        .merge(protected)
}

/// Tutte le risorse richiedono un utente autenticato con ROLE_ADMIN
fn admin_only(state: Arc<AppState>, router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    use core::{authentication_middleware, require_admin};

    // L'ultimo layer aggiunto è il primo ad essere eseguito
    router
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// I ruoli sono in sola lettura
fn configure_role_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::inherited_roles;

    let router = rest::read_only_routes(state.role_controller())
        .route("/{id}/inherited", get(inherited_roles));

    admin_only(state, router)
}

fn configure_user_group_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::group_users;

    let router = rest::rest_routes(state.user_group_controller())
        .route("/{id}/users", get(group_users));

    admin_only(state, router)
}

fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::{user_groups, user_roles};

    let router = rest::rest_routes(state.user_controller())
        .route("/{id}/roles", get(user_roles))
        .route("/{id}/groups", get(user_groups));

    admin_only(state, router)
}
