pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::{App, LoginAffordance};
use crate::config::AppConfig;
use crate::session::Navigator;
use crate::storage::FileStore;

#[derive(Parser)]
#[command(name = "bambino")]
#[command(about = "Casa del Bambino admin CLI - users, profiles and relationships")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Student and staff profiles")]
    Profiles {
        #[command(subcommand)]
        cmd: commands::profiles::ProfileCommands,
    },

    #[command(about = "Relationships between users")]
    Relationships {
        #[command(subcommand)]
        cmd: commands::relationships::RelationshipCommands,
    },

    #[command(about = "User accounts")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// There is no login page in a terminal; point the user at the login command
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "Login redirect");
        eprintln!("Run `bambino auth login <email>` to sign in again.");
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let mut config: AppConfig = crate::config::config().clone();
    // the process is about to exit; redirect right away
    config.session.relogin_redirect_delay_ms = 0;

    let store = Arc::new(FileStore::open_default()?);
    let app = App::bootstrap(config, store, Arc::new(CliNavigator), LoginAffordance::Redirect).await?;

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &app, output_format).await,
        Commands::Profiles { cmd } => commands::profiles::handle(cmd, &app, output_format).await,
        Commands::Relationships { cmd } => commands::relationships::handle(cmd, &app, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, &app, output_format).await,
    };

    app.shutdown().await;
    result
}
