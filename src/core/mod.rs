//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione e JWT
//! - Configurazione
//! - Gestione errori
//! - Logging
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;

// Re-exports per facilitare l'import
pub use auth::{
    AuthenticatedUser, Claims, authentication_middleware, decode_jwt, encode_jwt, require_admin,
};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
pub use telemetry::init_tracing;
