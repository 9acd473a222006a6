//! Repositories module - persistence adapters behind the [`Repository`] contract.
//!
//! - [`MySqlRepository`]: sqlx MySQL adapter used in production
//! - [`InMemoryRepository`]: `DATABASE_URL=memory://`, used by tests and local development

pub mod memory;
pub mod mysql;
pub mod traits;

pub use memory::InMemoryRepository;
pub use mysql::{MySqlRepository, SqlEntity};
pub use traits::{EntityReference, Repository, RepositoryError};
