use crate::core::{AppError, AppState};
use crate::entities::{User, UserGroup};
use crate::security::roles::ROLE_ADMIN;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
}

/// Utente autenticato, inserito nelle extension della richiesta dal middleware
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    /// Gruppi di cui l'utente fa parte
    pub groups: Vec<UserGroup>,
    /// Ruoli diretti ed ereditati
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|granted| granted == role)
    }
}

#[instrument(skip(secret, roles), fields(username = %username, id = %id))]
pub fn encode_jwt(
    username: String,
    id: String,
    roles: Vec<String>,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, AppError> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire = Duration::seconds(ttl_secs);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        username,
        id,
        roles,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map(|token| {
        info!("JWT token encoded successfully");
        token
    })
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal_server_error("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    debug!("Decoding JWT token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data: TokenData<Claims>| {
        debug!("JWT token decoded successfully for user: {}", data.claims.username);
        data
    })
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            warn!("Expired JWT token");
            AppError::unauthorized("Expired JWT Token")
        }
        _ => {
            warn!("Failed to decode JWT token: {:?}", e);
            AppError::unauthorized("Invalid JWT Token")
        }
    })
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let mut parts = header.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(bearer), Some(token)) if bearer.eq_ignore_ascii_case("Bearer") => {
                    Some(token.to_string())
                }
                _ => None,
            }
        })
        .ok_or_else(|| {
            warn!("Missing or malformed authorization header");
            AppError::unauthorized("JWT Token not found")
        })?;

    let token_data = decode_jwt(&token, &state.jwt_secret)?;

    // Fetch the user details from the repository
    let user = state
        .users
        .find_one(&token_data.claims.id, false)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            warn!("User not found: {}", token_data.claims.username);
            AppError::unauthorized("Invalid JWT Token")
        })?;

    let groups = state
        .user_groups
        .find(None, None, None, None, None)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .filter(|group| user.user_groups.contains(&group.id))
        .collect::<Vec<_>>();

    let roles = user.get_roles(&groups, &state.role_hierarchy);

    info!("User authenticated: {}", user.username);
    req.extensions_mut().insert(AuthenticatedUser {
        user,
        groups,
        roles,
    });

    Ok(next.run(req).await)
}

/// Middleware che richiede `ROLE_ADMIN` (diretto o ereditato).
/// Deve girare dopo `authentication_middleware`.
#[instrument(skip(req, next))]
pub async fn require_admin(req: Request, next: Next) -> Result<Response<Body>, AppError> {
    let current_user = req.extensions().get::<AuthenticatedUser>().ok_or_else(|| {
        warn!("User not found in request extensions");
        AppError::unauthorized("JWT Token not found")
    })?;

    if !current_user.has_role(ROLE_ADMIN) {
        warn!(
            "User {} has insufficient roles {:?}",
            current_user.user.username, current_user.roles
        );
        return Err(AppError::forbidden("Access denied.").with_details(format!(
            "This action requires the {} role",
            ROLE_ADMIN
        )));
    }

    Ok(next.run(req).await)
}
