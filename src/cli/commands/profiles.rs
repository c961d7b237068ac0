use clap::Subcommand;

use crate::app::App;
use crate::cli::utils::{delete_via_screen, guarded, output_record, print_list_page, read_stdin_json};
use crate::cli::OutputFormat;
use crate::listing::{Pager, ProfileRow};
use crate::models::{EntityId, NewProfile, ProfileUpdate};

const LOAD_CONTEXT: &str = "Sesión expirada al cargar el perfil";
const SAVE_CONTEXT: &str = "Sesión expirada al guardar el perfil";

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "List profiles with their account email")]
    List {
        #[arg(long, default_value = "0", help = "Records to skip")]
        skip: u32,
        #[arg(long, help = "Page size (defaults to BAMBINO_PAGE_SIZE)")]
        limit: Option<u32>,
    },

    #[command(about = "Show one profile")]
    Get {
        #[arg(help = "Profile id")]
        id: EntityId,
    },

    #[command(about = "Create a profile from JSON on stdin")]
    Create,

    #[command(about = "Update a profile from JSON on stdin")]
    Update {
        #[arg(help = "Profile id")]
        id: EntityId,
    },

    #[command(about = "Delete a profile")]
    Delete {
        #[arg(help = "Profile id")]
        id: EntityId,
    },
}

pub async fn handle(cmd: ProfileCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProfileCommands::List { skip, limit } => {
            let limit = limit.unwrap_or(app.config.listing.page_size);
            let screen = app.profiles_screen().with_pager(Pager::at(skip, limit));
            print_list_page(&screen, &output_format, "profiles", "No profiles found", render_rows).await
        }
        ProfileCommands::Get { id } => {
            let profile = guarded(app, &output_format, LOAD_CONTEXT, || app.profiles.get(id)).await?;
            output_record(&profile)
        }
        ProfileCommands::Create => {
            let profile: NewProfile = read_stdin_json()?;
            let created = guarded(app, &output_format, SAVE_CONTEXT, || app.profiles.create(&profile)).await?;
            output_record(&created)
        }
        ProfileCommands::Update { id } => {
            let update: ProfileUpdate = read_stdin_json()?;
            let updated = guarded(app, &output_format, SAVE_CONTEXT, || app.profiles.update(id, &update)).await?;
            output_record(&updated)
        }
        ProfileCommands::Delete { id } => {
            let screen = app.profiles_screen();
            delete_via_screen(&screen, id, &output_format, "Profile").await
        }
    }
}

fn render_rows(rows: &[ProfileRow]) {
    println!("{:<6} {:<35} {:<12} {}", "ID", "NAME", "BIRTH DATE", "USER");
    println!("{}", "-".repeat(80));
    for row in rows {
        let birth_date = row
            .profile
            .birth_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<6} {:<35} {:<12} {}", row.profile.id, row.profile.full_name(), birth_date, row.user_email);
    }
}
