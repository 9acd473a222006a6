use crate::core::{AppError, AppState};
use crate::entities::User;
use axum::extract::{Json, Path, State};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Utenti che hanno il ruolo del gruppo, anche per ereditarietà
#[instrument(skip(state))]
pub async fn group_users(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    let group = state
        .user_groups
        .find_one(&group_id, true)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    let groups = state
        .user_groups
        .find(None, None, None, None, None)
        .await?;

    let users = state
        .users
        .get_users_for_group(&group, &groups, &state.role_hierarchy)
        .await?;

    debug!("Found {} users for group {}", users.len(), group.name);
    Ok(Json(users))
}
