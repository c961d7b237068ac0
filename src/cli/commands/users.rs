use clap::Subcommand;

use crate::app::App;
use crate::cli::utils::{delete_via_screen, guarded, output_record, print_list_page, read_stdin_json};
use crate::cli::OutputFormat;
use crate::listing::Pager;
use crate::models::{EntityId, NewUser, User, UserUpdate};

const LOAD_CONTEXT: &str = "Sesión expirada al cargar el usuario";
const SAVE_CONTEXT: &str = "Sesión expirada al guardar el usuario";

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List user accounts")]
    List {
        #[arg(long, default_value = "0", help = "Records to skip")]
        skip: u32,
        #[arg(long, help = "Page size (defaults to BAMBINO_PAGE_SIZE)")]
        limit: Option<u32>,
    },

    #[command(about = "Show one user")]
    Get {
        #[arg(help = "User id")]
        id: EntityId,
    },

    #[command(about = "Create a user from JSON on stdin")]
    Create,

    #[command(about = "Update a user from JSON on stdin")]
    Update {
        #[arg(help = "User id")]
        id: EntityId,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User id")]
        id: EntityId,
    },
}

pub async fn handle(cmd: UserCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::List { skip, limit } => {
            let limit = limit.unwrap_or(app.config.listing.page_size);
            let screen = app.users_screen().with_pager(Pager::at(skip, limit));
            print_list_page(&screen, &output_format, "users", "No users found", render_rows).await
        }
        UserCommands::Get { id } => {
            let user = guarded(app, &output_format, LOAD_CONTEXT, || app.users.get(id)).await?;
            output_record(&user)
        }
        UserCommands::Create => {
            let user: NewUser = read_stdin_json()?;
            let created = guarded(app, &output_format, SAVE_CONTEXT, || app.users.create(&user)).await?;
            output_record(&created)
        }
        UserCommands::Update { id } => {
            let update: UserUpdate = read_stdin_json()?;
            let updated = guarded(app, &output_format, SAVE_CONTEXT, || app.users.update(id, &update)).await?;
            output_record(&updated)
        }
        UserCommands::Delete { id } => {
            let screen = app.users_screen();
            delete_via_screen(&screen, id, &output_format, "User").await
        }
    }
}

fn render_rows(rows: &[User]) {
    println!("{:<6} {:<35} {:<12} {}", "ID", "EMAIL", "ROLE", "ACTIVE");
    println!("{}", "-".repeat(70));
    for user in rows {
        let active = match user.is_active {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        println!("{:<6} {:<35} {:<12} {}", user.id, user.email, user.role.as_deref().unwrap_or("-"), active);
    }
}
