use super::{Prompt, create_roles, option_or_input};
use crate::core::AppState;
use crate::dtos::UserGroupDto;
use crate::entities::UserGroup;
use anyhow::{Result, bail};
use tracing::{info, instrument};

/// `user:create-group` - crea i ruoli se mancano, poi il gruppo
#[instrument(skip(state, prompt))]
pub async fn create_user_group(
    state: &AppState,
    prompt: &dyn Prompt,
    name: Option<String>,
    role: Option<String>,
) -> Result<UserGroup> {
    if state.roles.count(None, None).await? == 0 {
        prompt.message("Roles are not yet created, creating those now...");
        create_roles(state, prompt).await?;
    }

    let name = option_or_input(prompt, name, "name", "Name of the user group")?;

    let role = match role {
        Some(role) => role,
        None if prompt.is_interactive() => {
            let roles = state.roles.get_ids(None, None).await?;
            let index = prompt.select("Role of the user group", &roles)?;
            match roles.get(index) {
                Some(role) => role.clone(),
                None => bail!("Invalid role selection"),
            }
        }
        None => bail!("The \"--role\" option is required in non-interactive mode"),
    };

    if state.roles.find_one(&role, false).await?.is_none() {
        bail!("Role with id \"{role}\" does not exist!");
    }

    let dto = UserGroupDto {
        name: name.into(),
        role: role.into(),
    };
    let group = state.user_groups.create(&dto, false).await?;

    info!("User group {} created", group.name);
    prompt.message("User group created - have a nice day");

    Ok(group)
}
