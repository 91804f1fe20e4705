use crate::output::Output;
use crate::GenreCommands;
use cinemateca_config::Config;
use cinemateca_core::{canonical_name, convert_genre_id_for, genre_id_for, CatalogError};
use cinemateca_models::{ApiResponse, MediaKind};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

use super::catalog_service;

pub async fn run_genre(cmd: GenreCommands, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        GenreCommands::Id { name, content_type } => lookup_id(&name, &content_type, output),
        GenreCommands::Convert { id, from, to } => convert(id, &from, &to, output),
        GenreCommands::List { content_type } => list(&content_type, config, output).await,
    }
}

/// Report a failed lookup in the envelope, then hand it to the error reporter
fn fail(err: CatalogError, output: &Output) -> color_eyre::Report {
    output.envelope(&ApiResponse::<()>::failure(err.to_string()));
    eyre!(err)
}

fn lookup_id(name: &str, content_type: &str, output: &Output) -> Result<()> {
    let id = genre_id_for(name, content_type).map_err(|e| fail(e, output))?;

    let data = json!({ "name": name, "type": content_type, "id": id });
    if output.envelope(&ApiResponse::ok(data)) {
        return Ok(());
    }

    match id {
        Some(id) => output.success(format!("{} ({}) → {}", name, content_type, id.bold())),
        None => output.warn(format!("No {} genre named '{}'", content_type, name)),
    }
    Ok(())
}

fn convert(id: u32, from: &str, to: &str, output: &Output) -> Result<()> {
    let converted = convert_genre_id_for(id, from, to).map_err(|e| fail(e, output))?;

    let data = json!({ "id": id, "from": from, "to": to, "converted": converted });
    if output.envelope(&ApiResponse::ok(data)) {
        return Ok(());
    }

    match converted {
        Some(converted) => {
            // Both strings parsed above, so the kinds are valid here
            let name = to
                .parse::<MediaKind>()
                .ok()
                .and_then(|kind| canonical_name(converted, kind))
                .unwrap_or("unknown");
            output.success(format!("{} {} → {} {} ({})", from, id, to, converted.bold(), name));
        }
        None => output.warn(format!("{} genre {} has no {} equivalent", from, id, to)),
    }
    Ok(())
}

async fn list(content_type: &str, config: &Config, output: &Output) -> Result<()> {
    let kind: MediaKind = content_type
        .parse()
        .map_err(|e| fail(CatalogError::from(e), output))?;

    let service = catalog_service(config)?;
    let genres = service.get_genres(kind).await.map_err(|e| fail(e, output))?;

    if output.envelope(&ApiResponse::ok(&genres)) || output.is_quiet() {
        return Ok(());
    }

    println!("{}", format!("{} genres", kind).bold());
    for genre in &genres {
        match &genre.canonical {
            Some(canonical) => println!("  {:>6}  {} {}", genre.id, genre.name, format!("({})", canonical).dimmed()),
            None => println!("  {:>6}  {}", genre.id, genre.name),
        }
    }
    Ok(())
}
