use clap::Subcommand;

use crate::app::App;
use crate::cli::utils::{delete_via_screen, guarded, output_record, print_list_page, read_stdin_json};
use crate::cli::OutputFormat;
use crate::listing::{Pager, RelationshipRow};
use crate::models::{EntityId, NewRelationship, RelationshipUpdate};

const LOAD_CONTEXT: &str = "Sesión expirada al cargar la relación";
const SAVE_CONTEXT: &str = "Sesión expirada al guardar la relación";

#[derive(Subcommand)]
pub enum RelationshipCommands {
    #[command(about = "List relationships with both users resolved")]
    List {
        #[arg(long, default_value = "0", help = "Records to skip")]
        skip: u32,
        #[arg(long, help = "Page size (defaults to BAMBINO_PAGE_SIZE)")]
        limit: Option<u32>,
    },

    #[command(about = "Show one relationship")]
    Get {
        #[arg(help = "Relationship id")]
        id: EntityId,
    },

    #[command(about = "Create a relationship from JSON on stdin")]
    Create,

    #[command(about = "Update a relationship from JSON on stdin")]
    Update {
        #[arg(help = "Relationship id")]
        id: EntityId,
    },

    #[command(about = "Delete a relationship")]
    Delete {
        #[arg(help = "Relationship id")]
        id: EntityId,
    },

    #[command(about = "List the configured relationship types")]
    Types,
}

pub async fn handle(cmd: RelationshipCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RelationshipCommands::List { skip, limit } => {
            let limit = limit.unwrap_or(app.config.listing.page_size);
            let screen = app.relationships_screen().with_pager(Pager::at(skip, limit));
            print_list_page(&screen, &output_format, "relationships", "No relationships found", render_rows).await
        }
        RelationshipCommands::Get { id } => {
            let relationship = guarded(app, &output_format, LOAD_CONTEXT, || app.relationships.get(id)).await?;
            output_record(&relationship)
        }
        RelationshipCommands::Create => {
            let relationship: NewRelationship = read_stdin_json()?;
            let created = guarded(app, &output_format, SAVE_CONTEXT, || app.relationships.create(&relationship)).await?;
            output_record(&created)
        }
        RelationshipCommands::Update { id } => {
            let update: RelationshipUpdate = read_stdin_json()?;
            let updated = guarded(app, &output_format, SAVE_CONTEXT, || app.relationships.update(id, &update)).await?;
            output_record(&updated)
        }
        RelationshipCommands::Delete { id } => {
            let screen = app.relationships_screen();
            delete_via_screen(&screen, id, &output_format, "Relationship").await
        }
        RelationshipCommands::Types => {
            let types = app.relationships.allowed_types();
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "types": types }))?);
                }
                OutputFormat::Text => {
                    for t in types {
                        println!("{}", t);
                    }
                }
            }
            Ok(())
        }
    }
}

fn render_rows(rows: &[RelationshipRow]) {
    println!("{:<6} {:<28} {:<12} {}", "ID", "USER", "TYPE", "RELATED USER");
    println!("{}", "-".repeat(80));
    for row in rows {
        println!(
            "{:<6} {:<28} {:<12} {}",
            row.relationship.id, row.user_name, row.relationship.relationship_type, row.related_user_name
        );
    }
}
