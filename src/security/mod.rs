//! Security module - role hierarchy and password hashing.

pub mod password;
pub mod roles;

pub use password::PasswordListener;
pub use roles::Roles;
