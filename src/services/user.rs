//! User services - Ruoli e gruppi di un utente

use crate::core::{AppError, AppState};
use crate::dtos::UserGroupView;
use axum::extract::{Json, Path, State};
use std::sync::Arc;
use tracing::instrument;

/// Ruoli dell'utente, diretti ed ereditati
#[instrument(skip(state))]
pub async fn user_roles(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let user = state
        .users
        .find_one(&user_id, true)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    let groups = state
        .user_groups
        .find(None, None, None, None, None)
        .await?;

    Ok(Json(user.get_roles(&groups, &state.role_hierarchy)))
}

#[instrument(skip(state))]
pub async fn user_groups(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserGroupView>>, AppError> {
    let user = state
        .users
        .find_one(&user_id, true)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    let groups = state
        .user_groups
        .find(None, None, None, None, None)
        .await?;
    let roles = state.roles.find(None, None, None, None, None).await?;

    Ok(Json(
        groups
            .iter()
            .filter(|group| user.user_groups.contains(&group.id))
            .map(|group| UserGroupView::new(group, &roles))
            .collect(),
    ))
}
