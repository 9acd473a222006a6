use super::{Prompt, create_user_group, option_or_input};
use crate::core::AppState;
use crate::dtos::UserDto;
use crate::entities::User;
use anyhow::{Result, bail};
use tracing::{info, instrument};

/// Opzioni di `user:create`, quelle mancanti vengono chieste
#[derive(Debug, Default, Clone)]
pub struct UserOptions {
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Id o nomi dei gruppi
    pub groups: Vec<String>,
}

/// `user:create` - crea un gruppo se non ne esiste nessuno, poi l'utente
#[instrument(skip_all, fields(username = ?options.username))]
pub async fn create_user(state: &AppState, prompt: &dyn Prompt, options: UserOptions) -> Result<User> {
    if state.user_groups.count(None, None).await? == 0 {
        prompt.message("User groups are not yet created, creating those now...");
        create_user_group(state, prompt, None, None).await?;
    }

    let username = option_or_input(prompt, options.username, "username", "Username")?;
    let firstname = option_or_input(prompt, options.firstname, "firstname", "Firstname")?;
    let surname = option_or_input(prompt, options.surname, "surname", "Surname")?;
    let email = option_or_input(prompt, options.email, "email", "Email address")?;
    let password = match options.password {
        Some(password) => password,
        None if prompt.is_interactive() => prompt.password("Password")?,
        None => bail!("The \"--password\" option is required in non-interactive mode"),
    };

    let groups = state.user_groups.find(None, None, None, None, None).await?;
    let user_groups = if options.groups.is_empty() && prompt.is_interactive() {
        let names = groups.iter().map(|group| group.name.clone()).collect::<Vec<_>>();
        prompt
            .multi_select("User groups", &names)?
            .into_iter()
            .filter_map(|index| groups.get(index))
            .map(|group| group.id.clone())
            .collect::<Vec<_>>()
    } else {
        let mut ids = Vec::new();
        for wanted in &options.groups {
            match groups.iter().find(|group| group.id == *wanted || group.name == *wanted) {
                Some(group) => ids.push(group.id.clone()),
                None => bail!("UserGroup with id \"{wanted}\" does not exist!"),
            }
        }
        ids
    };

    let dto = UserDto {
        username: username.into(),
        firstname: firstname.into(),
        surname: surname.into(),
        email: email.into(),
        password: password.into(),
        user_groups: user_groups.into(),
    };
    let user = state.users.create(&dto, false).await?;

    info!("User {} created", user.username);
    prompt.message("User created - have a nice day");

    Ok(user)
}
