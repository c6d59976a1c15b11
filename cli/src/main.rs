mod account;
mod client;
mod cook;
mod recipes;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use hearth_core::{CookAction, SessionContext};
use uuid::Uuid;

use client::ApiClient;
use cook::JumpTarget;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Hearth CLI", long_about = None)]
struct Cli {
    /// Server URL for signup and login; later commands use the server the
    /// session was issued by
    #[arg(
        long,
        global = true,
        env = "HEARTH_SERVER",
        default_value = "http://localhost:3000"
    )]
    server: String,

    /// Session file (default: ~/.hearth/session.json)
    #[arg(long, global = true, env = "HEARTH_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long, env = "HEARTH_PASSWORD")]
        password: String,
    },
    /// Log in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "HEARTH_PASSWORD")]
        password: String,
    },
    /// Revoke the session and forget it locally
    Logout,
    /// Show who is logged in
    Status,
    /// Manage recipes
    Recipes {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Step through a recipe while cooking
    Cook {
        /// Recipe ID
        recipe: Uuid,
        #[command(subcommand)]
        command: CookCommands,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// List your recipes
    List,
    /// Print a recipe
    Show { id: Uuid },
    /// Create a recipe from a JSON file
    Create { file: PathBuf },
}

#[derive(Subcommand)]
enum CookCommands {
    /// Show where you are
    Show,
    /// Check or uncheck an ingredient
    Check { ingredient_id: String },
    /// Check every ingredient
    CheckAll,
    /// Mark a step done
    Complete { step: usize },
    /// Mark a step not done
    Reopen { step: usize },
    /// Move to the next step
    Next,
    /// Move to the previous step
    Back,
    /// Jump to a step number, `ingredients` or `finish`
    Jump {
        target: JumpTarget,
        /// Skip ahead even past unfinished steps
        #[arg(long)]
        yes: bool,
    },
    /// Clear all progress and start over
    Restart {
        #[arg(long)]
        yes: bool,
    },
    /// Control a step's timer
    Timer {
        #[command(subcommand)]
        command: TimerCommands,
    },
}

#[derive(Subcommand)]
enum TimerCommands {
    Start { step: usize },
    Pause { step: usize },
    Reset { step: usize },
    /// Start the timer and count down until it's done
    Watch { step: usize },
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let ctx = SessionContext::new(cli.session_file.unwrap_or_else(SessionContext::default_path));

    match cli.command {
        Commands::Signup { username, password } => {
            account::signup(&ctx, &cli.server, &username, &password).await?;
        }
        Commands::Login { username, password } => {
            account::login(&ctx, &cli.server, &username, &password).await?;
        }
        Commands::Logout => account::logout(&ctx).await?,
        Commands::Status => account::status(&ctx)?,
        Commands::Recipes { command } => {
            let client = authed_client(&ctx)?;
            match command {
                RecipeCommands::List => recipes::list(&client).await?,
                RecipeCommands::Show { id } => recipes::show(&client, id).await?,
                RecipeCommands::Create { file } => recipes::create(&client, &file).await?,
            }
        }
        Commands::Cook { recipe, command } => {
            let client = authed_client(&ctx)?;
            run_cook(&client, recipe, command).await?;
        }
    }

    Ok(())
}

/// Client for commands that need a logged-in session.
fn authed_client(ctx: &SessionContext) -> Result<ApiClient> {
    let session = ctx.require_active(Utc::now())?;
    Ok(ApiClient::with_token(&session.server, &session.token))
}

async fn run_cook(client: &ApiClient, recipe: Uuid, command: CookCommands) -> Result<()> {
    let action = match command {
        CookCommands::Show => return cook::show(client, recipe).await,
        CookCommands::Jump { target, yes } => return cook::jump(client, recipe, target, yes).await,
        CookCommands::Check { ingredient_id } => CookAction::ToggleIngredient { ingredient_id },
        CookCommands::CheckAll => CookAction::CheckAllIngredients,
        CookCommands::Complete { step } => CookAction::CompleteStep {
            index: cook::step_index(step)?,
        },
        CookCommands::Reopen { step } => CookAction::ReopenStep {
            index: cook::step_index(step)?,
        },
        CookCommands::Next => CookAction::Advance,
        CookCommands::Back => CookAction::GoBack,
        CookCommands::Restart { yes } => CookAction::Restart { confirmed: yes },
        CookCommands::Timer { command } => match command {
            TimerCommands::Watch { step } => {
                return cook::watch(client, recipe, cook::step_index(step)?).await
            }
            TimerCommands::Start { step } => CookAction::StartTimer {
                index: cook::step_index(step)?,
            },
            TimerCommands::Pause { step } => CookAction::PauseTimer {
                index: cook::step_index(step)?,
            },
            TimerCommands::Reset { step } => CookAction::ResetTimer {
                index: cook::step_index(step)?,
            },
        },
    };

    cook::run(client, recipe, &action).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cook_jump() {
        let id = Uuid::new_v4();
        let id_arg = id.to_string();
        let cli = Cli::try_parse_from([
            "hearth",
            "cook",
            id_arg.as_str(),
            "jump",
            "finish",
            "--yes",
        ])
        .unwrap();

        match cli.command {
            Commands::Cook {
                recipe,
                command: CookCommands::Jump { target, yes },
            } => {
                assert_eq!(recipe, id);
                assert_eq!(target, JumpTarget::Finish);
                assert!(yes);
            }
            _ => panic!("expected cook jump"),
        }
    }
}
