use super::Prompt;
use crate::core::AppState;
use crate::entities::Role;
use anyhow::Result;
use tracing::{info, instrument};

/// `user:create-roles` - allinea la tabella dei ruoli alla gerarchia dell'applicazione.
///
/// Ritorna il numero di ruoli creati e rimossi.
#[instrument(skip_all)]
pub async fn create_roles(state: &AppState, prompt: &dyn Prompt) -> Result<(usize, usize)> {
    let hierarchy = &state.role_hierarchy;
    let known = hierarchy.get_roles();
    let existing = state.roles.get_ids(None, None).await?;

    let mut created = 0;
    for role in &known {
        if existing.iter().any(|id| id == role) {
            continue;
        }

        state
            .roles
            .save(Role::new(*role, hierarchy.get_role_label(role)), false)
            .await?;
        created += 1;
    }

    let mut removed = 0;
    for id in existing.iter().filter(|id| !known.contains(&id.as_str())) {
        state.roles.delete(id).await?;
        removed += 1;
    }

    info!("Roles synchronized: {} created, {} removed", created, removed);
    prompt.message(&format!(
        "Created total of {created} role(s) and removed {removed} role(s) - have a nice day"
    ));

    Ok((created, removed))
}
