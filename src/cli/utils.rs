use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::io::{self, BufRead, Read};

use crate::app::App;
use crate::cli::OutputFormat;
use crate::error::ApiError;
use crate::listing::{DeleteOutcome, ListResource, ListScreen, LoadOutcome};
use crate::models::EntityId;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(extra)) = data {
                if let Some(obj) = response.as_object_mut() {
                    obj.extend(extra);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Render a failure for JSON consumers and hand it back as the command's
/// error; in text mode the binary prints it on exit.
pub fn command_failed<T>(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<T> {
    if let OutputFormat::Json = output_format {
        let mut response = json!({
            "success": false,
            "error": message
        });

        if let Some(code) = error_code {
            response["error_code"] = json!(code);
        }

        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Err(anyhow::anyhow!("{}", message))
}

/// Same as [`command_failed`] for API errors, including per-field messages
/// when the backend sent them
pub fn api_failed<T>(output_format: &OutputFormat, err: ApiError) -> anyhow::Result<T> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": err.to_string(),
                "error_code": err.error_code()
            });
            if let Some(fields) = err.field_errors() {
                response["field_errors"] = json!(fields);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if let Some(fields) = err.field_errors() {
                let mut fields: Vec<_> = fields.iter().collect();
                fields.sort();
                for (field, msg) in fields {
                    eprintln!("  {}: {}", field, msg);
                }
            }
        }
    }
    Err(err.into())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a single record as pretty JSON (both formats; records have no table form)
pub fn output_record<T: Serialize>(record: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Read a JSON document from stdin
pub fn read_stdin_json<T: DeserializeOwned>() -> anyhow::Result<T> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        anyhow::bail!("Expected a JSON document on stdin");
    }
    Ok(serde_json::from_str(&input)?)
}

/// Use the given password or read one line from stdin
pub fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }
    Ok(password)
}

/// Run one resource call through the session guard. Any failure, an
/// expired session included, becomes the command's error.
pub async fn guarded<T, F, Fut>(
    app: &App,
    output_format: &OutputFormat,
    context_message: &str,
    operation: F,
) -> anyhow::Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match app.guard.safe_request(operation, |_| {}, context_message).await {
        Ok(Some(value)) => Ok(value),
        Ok(None) => command_failed(output_format, context_message, Some(ApiError::SessionExpired.error_code())),
        Err(e) => api_failed(output_format, e),
    }
}

/// Load one page of a list screen and print it
pub async fn print_list_page<R, F>(
    screen: &ListScreen<R>,
    output_format: &OutputFormat,
    collection_name: &str,
    empty_message: &str,
    render_text: F,
) -> anyhow::Result<()>
where
    R: ListResource,
    F: Fn(&[R::Row]),
{
    let outcome = screen.load().await;
    let state = screen.state();

    match outcome {
        LoadOutcome::Loaded { rows: 0 } => output_empty_collection(output_format, collection_name, empty_message),
        LoadOutcome::Loaded { .. } => {
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            collection_name: state.rows,
                            "pagination": state.pager,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    render_text(&state.rows);
                    let mut hints = Vec::new();
                    if state.pager.has_previous() {
                        hints.push(format!("--skip {}", state.pager.skip.saturating_sub(state.pager.limit)));
                    }
                    if state.pager.has_next {
                        hints.push(format!("--skip {}", state.pager.skip + state.pager.limit));
                    }
                    if !hints.is_empty() {
                        println!("\nMore pages: {}", hints.join(" | "));
                    }
                }
            }
            Ok(())
        }
        _ => {
            let message = state.error.unwrap_or_else(|| "No se pudo cargar el listado".to_string());
            command_failed(output_format, &message, None)
        }
    }
}

/// Delete through a list screen so the same 404/permission policy applies
pub async fn delete_via_screen<R: ListResource>(
    screen: &ListScreen<R>,
    id: EntityId,
    output_format: &OutputFormat,
    noun: &str,
) -> anyhow::Result<()> {
    match screen.delete(id).await {
        DeleteOutcome::Removed => output_success(
            output_format,
            &format!("{} {} deleted", noun, id),
            Some(json!({ "id": id })),
        ),
        DeleteOutcome::Resynced => output_success(
            output_format,
            &format!("{} {} was already gone", noun, id),
            Some(json!({ "id": id })),
        ),
        DeleteOutcome::SessionExpired | DeleteOutcome::Failed => {
            let message = screen
                .delete_error()
                .unwrap_or_else(|| format!("Failed to delete {} {}", noun, id));
            command_failed(output_format, &message, None)
        }
    }
}
