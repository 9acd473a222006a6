//! Console commands - Creazione di ruoli, gruppi e utenti da riga di comando
//!
//! I comandi lavorano sulle stesse risorse dell'API; i valori mancanti vengono
//! chiesti all'utente tramite un [`Prompt`] quando la console è interattiva.

pub mod create_roles;
pub mod create_user;
pub mod create_user_group;

pub use create_roles::create_roles;
pub use create_user::{UserOptions, create_user};
pub use create_user_group::create_user_group;

use anyhow::{Result, bail};
use dialoguer::{Input, MultiSelect, Password, Select, theme::ColorfulTheme};

/// Interazione con l'utente della console
pub trait Prompt {
    fn is_interactive(&self) -> bool;

    fn input(&self, label: &str) -> Result<String>;

    fn password(&self, label: &str) -> Result<String>;

    fn select(&self, label: &str, items: &[String]) -> Result<usize>;

    fn multi_select(&self, label: &str, items: &[String]) -> Result<Vec<usize>>;

    /// Printed only in interactive mode
    fn message(&self, message: &str);
}

pub struct DialoguerPrompt {
    interactive: bool,
    theme: ColorfulTheme,
}

impl DialoguerPrompt {
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompt for DialoguerPrompt {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn input(&self, label: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .interact_text()?)
    }

    fn password(&self, label: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(label)
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?)
    }

    fn select(&self, label: &str, items: &[String]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn multi_select(&self, label: &str, items: &[String]) -> Result<Vec<usize>> {
        Ok(MultiSelect::with_theme(&self.theme)
            .with_prompt(label)
            .items(items)
            .interact()?)
    }

    fn message(&self, message: &str) {
        if self.interactive {
            println!("{message}");
        }
    }
}

/// Valore dell'opzione, oppure chiesto all'utente
fn option_or_input(prompt: &dyn Prompt, value: Option<String>, option: &str, label: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None if prompt.is_interactive() => prompt.input(label),
        None => bail!("The \"--{option}\" option is required in non-interactive mode"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::{AppState, Config};
    use crate::entities::{Role, User, UserGroup};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Risposte predefinite, nell'ordine in cui vengono chieste
    pub(crate) struct ScriptedPrompt {
        interactive: bool,
        answers: RefCell<VecDeque<String>>,
        pub(crate) messages: RefCell<Vec<String>>,
    }

    impl ScriptedPrompt {
        pub(crate) fn interactive(answers: &[&str]) -> Self {
            Self {
                interactive: true,
                answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
                messages: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn silent() -> Self {
            Self {
                interactive: false,
                ..Self::interactive(&[])
            }
        }

        fn next(&self, label: &str) -> Result<String> {
            match self.answers.borrow_mut().pop_front() {
                Some(answer) => Ok(answer),
                None => bail!("No answer for \"{label}\""),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn is_interactive(&self) -> bool {
            self.interactive
        }

        fn input(&self, label: &str) -> Result<String> {
            self.next(label)
        }

        fn password(&self, label: &str) -> Result<String> {
            self.next(label)
        }

        fn select(&self, label: &str, items: &[String]) -> Result<usize> {
            let answer = self.next(label)?;
            items
                .iter()
                .position(|item| *item == answer)
                .ok_or_else(|| anyhow::anyhow!("\"{answer}\" is not an option"))
        }

        fn multi_select(&self, label: &str, items: &[String]) -> Result<Vec<usize>> {
            let answer = self.next(label)?;
            answer
                .split(',')
                .map(|choice| {
                    items
                        .iter()
                        .position(|item| item == choice)
                        .ok_or_else(|| anyhow::anyhow!("\"{choice}\" is not an option"))
                })
                .collect()
        }

        fn message(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    pub(crate) fn state(roles: Vec<Role>, groups: Vec<UserGroup>, users: Vec<User>) -> AppState {
        let config = Config {
            bcrypt_cost: 4,
            ..Config::default()
        };
        AppState::in_memory(roles, groups, users, &config)
    }

    #[test]
    fn test_option_or_input() {
        let prompt = ScriptedPrompt::interactive(&["typed"]);

        assert_eq!(option_or_input(&prompt, Some("given".to_string()), "name", "Name").unwrap(), "given");
        assert_eq!(option_or_input(&prompt, None, "name", "Name").unwrap(), "typed");
    }

    #[test]
    fn test_missing_option_without_interaction() {
        let error = option_or_input(&ScriptedPrompt::silent(), None, "name", "Name").unwrap_err();

        assert_eq!(
            error.to_string(),
            "The \"--name\" option is required in non-interactive mode"
        );
    }
}
