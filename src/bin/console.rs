use anyhow::Result;
use clap::{Parser, Subcommand};
use flex_backend::commands::{
    DialoguerPrompt, UserOptions, create_roles, create_user, create_user_group,
};
use flex_backend::core::{AppState, Config, init_tracing};

/// Console di amministrazione: ruoli, gruppi e utenti
#[derive(Parser)]
#[command(name = "console")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Non chiedere nulla, le opzioni mancanti sono un errore
    #[arg(short = 'n', long, global = true)]
    no_interaction: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create all roles of the role hierarchy, removing unknown ones
    #[command(name = "user:create-roles")]
    CreateRoles,

    /// Create a user group
    #[command(name = "user:create-group")]
    CreateGroup {
        /// Name of the user group
        #[arg(long)]
        name: Option<String>,

        /// Role of the user group
        #[arg(long)]
        role: Option<String>,
    },

    /// Create a user
    #[command(name = "user:create")]
    CreateUser {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        firstname: Option<String>,

        #[arg(long)]
        surname: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, env = "USER_PASSWORD")]
        password: Option<String>,

        /// User group id or name, repeatable
        #[arg(long = "group")]
        groups: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    if config.uses_memory_database() {
        tracing::warn!("DATABASE_URL is memory://, nothing will be persisted");
    }
    let state = AppState::connect(&config).await?;

    let prompt = DialoguerPrompt::new(!cli.no_interaction);

    match cli.command {
        Commands::CreateRoles => {
            create_roles(&state, &prompt).await?;
        }
        Commands::CreateGroup { name, role } => {
            create_user_group(&state, &prompt, name, role).await?;
        }
        Commands::CreateUser {
            username,
            firstname,
            surname,
            email,
            password,
            groups,
        } => {
            let options = UserOptions {
                username,
                firstname,
                surname,
                email,
                password,
                groups,
            };
            create_user(&state, &prompt, options).await?;
        }
    }

    Ok(())
}
