//! Auth services - Rilascio del token JWT e profilo dell'utente autenticato

use crate::core::{AppError, AppState, AuthenticatedUser, encode_jwt};
use crate::dtos::UserProfile;
use crate::entities::User;
use crate::rest::criteria::Criteria;
use axum::{
    Extension,
    body::Bytes,
    extract::{Json, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const MISSING_CREDENTIALS: &str = "You need to send JSON body to obtain token eg. {\"username\":\"username\",\"password\":\"password\"}";

/// Credenziali accettate da `/auth/getToken`, lo username può essere anche l'email
#[derive(Deserialize)]
pub struct CredentialsDTO {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct TokenDTO {
    pub token: String,
}

/// Il body viene letto come bytes: qualsiasi cosa che non sia un JSON con
/// username e password produce lo stesso 400.
#[instrument(skip(state, body))]
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TokenDTO>, AppError> {
    let credentials = serde_json::from_slice::<CredentialsDTO>(&body).map_err(|_| {
        warn!("Token requested without JSON credentials");
        AppError::bad_request(MISSING_CREDENTIALS)
    })?;

    let user = find_user(&state, &credentials.username)
        .await?
        .filter(|user| user.verify_password(&credentials.password))
        .ok_or_else(|| {
            warn!("Bad credentials for {}", credentials.username);
            AppError::unauthorized("Bad credentials")
        })?;

    let groups = state
        .user_groups
        .find(None, None, None, None, None)
        .await?;
    let roles = user.get_roles(&groups, &state.role_hierarchy);

    let token = encode_jwt(
        user.username.clone(),
        user.id.clone(),
        roles,
        &state.jwt_secret,
        state.jwt_ttl_secs,
    )?;

    info!("Token issued for {}", user.username);
    Ok(Json(TokenDTO { token }))
}

/// Lookup per username, poi per email
async fn find_user(state: &AppState, login: &str) -> Result<Option<User>, AppError> {
    for property in ["username", "email"] {
        let mut criteria = Criteria::new();
        criteria.insert(property.to_string(), Value::String(login.to_string()));

        if let Some(user) = state.users.find_one_by(&criteria, None, false).await? {
            return Ok(Some(user));
        }
    }

    Ok(None)
}

#[instrument(skip(state, current_user), fields(username = %current_user.user.username))]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<AuthenticatedUser>,
) -> Result<Json<UserProfile>, AppError> {
    let roles = state.roles.find(None, None, None, None, None).await?;

    Ok(Json(UserProfile::new(
        &current_user.user,
        &current_user.groups,
        &roles,
        current_user.roles.clone(),
    )))
}
