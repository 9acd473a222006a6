use crate::core::{AppError, AppState};
use axum::extract::{Json, Path, State};
use std::sync::Arc;
use tracing::instrument;

/// Il ruolo stesso seguito da tutti quelli che eredita
#[instrument(skip(state))]
pub async fn inherited_roles(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let role = state
        .roles
        .find_one(&role_id, true)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    Ok(Json(state.role_hierarchy.get_inherited_roles(&[role.id])))
}
