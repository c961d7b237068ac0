use clap::Subcommand;
use serde_json::json;

use crate::app::App;
use crate::cli::utils::{command_failed, output_success, resolve_password};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and store the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Register a new account and login with it")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let outcome = app.session.login(&email, &password).await;
            if outcome.success {
                output_success(&output_format, &format!("Logged in as {}", email), Some(json!({ "email": email })))
            } else {
                let message = outcome.error.unwrap_or_else(|| "Login failed".to_string());
                command_failed(&output_format, &message, Some("LOGIN_FAILED"))
            }
        }
        AuthCommands::Logout => {
            app.session.logout();
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let snapshot = app.session.snapshot();
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "api_url": app.client.base_url().as_str(),
                        "session": snapshot,
                    }))?);
                }
                OutputFormat::Text => {
                    println!("API: {}", app.client.base_url());
                    match snapshot.current_user {
                        Some(user) if snapshot.is_authenticated => println!("Logged in as {}", user.email),
                        _ if snapshot.is_authenticated => println!("Logged in"),
                        _ => println!("Not logged in"),
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Register { email, password } => {
            let password = resolve_password(password)?;
            let outcome = app.session.register(&email, &password).await;
            if outcome.success {
                output_success(&output_format, &format!("Registered and logged in as {}", email), Some(json!({ "email": email })))
            } else {
                let message = outcome.error.unwrap_or_else(|| "Registration failed".to_string());
                command_failed(&output_format, &message, Some("REGISTER_FAILED"))
            }
        }
    }
}
