//! Hashes the plain password of a user right before it is persisted.

use crate::entities::User;
use crate::rest::error::RestError;
use crate::rest::resource::EntityListener;
use std::borrow::Cow;
use tracing::{debug, error};
use validator::{ValidationError, ValidationErrors};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct PasswordListener {
    cost: u32,
}

impl PasswordListener {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl EntityListener<User> for PasswordListener {
    fn before_persist(&self, user: &mut User) -> Result<(), RestError> {
        let Some(plain_password) = user.plain_password.take() else {
            return Ok(());
        };

        if plain_password.chars().count() < MIN_PASSWORD_LENGTH {
            let mut violation = ValidationError::new("length");
            violation.message = Some(Cow::from(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));

            let mut errors = ValidationErrors::new();
            errors.add("password", violation);
            return Err(RestError::Validation(errors));
        }

        debug!("Hashing password for user {}", user.username);
        user.password = User::hash_password(&plain_password, self.cost).map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            RestError::Logic("Failed to hash password".to_string())
        })?;

        Ok(())
    }
}
