use crate::output::Output;
use cinemateca_config::Config;
use cinemateca_core::AggregateReport;
use cinemateca_models::{ApiResponse, Media, MediaKind, Wallpaper};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;

use super::catalog_service;

pub async fn run_get(id: &str, kind: MediaKind, report: bool, config: &Config, output: &Output) -> Result<()> {
    let service = catalog_service(config)?;

    let aggregated = match service.get_media_report(id, kind).await {
        Ok(aggregated) => aggregated,
        Err(e) => {
            if !output.envelope(&ApiResponse::<Media>::failure(e.to_string())) {
                output.error(format!("Could not load {} {}", kind, id));
            }
            return Err(eyre!(e));
        }
    };

    let printed = if report {
        output.envelope(&ApiResponse::ok(&aggregated))
    } else {
        output.envelope(&ApiResponse::ok(&aggregated.media))
    };
    if printed || output.is_quiet() {
        return Ok(());
    }

    render_media(&aggregated.media);
    render_degraded(&aggregated, output);
    Ok(())
}

pub async fn run_wallpapers(id: &str, kind: MediaKind, config: &Config, output: &Output) -> Result<()> {
    let service = catalog_service(config)?;
    let wallpapers = service.get_wallpapers(id, kind).await;

    if output.envelope(&ApiResponse::ok(&wallpapers)) || output.is_quiet() {
        return Ok(());
    }

    if wallpapers.is_empty() {
        output.warn(format!("No wallpapers for {} {}", kind, id));
        return Ok(());
    }
    for wallpaper in &wallpapers {
        render_wallpaper(wallpaper);
    }
    Ok(())
}

fn render_degraded(report: &AggregateReport, output: &Output) {
    for failure in &report.degraded {
        output.warn(format!("{} (shown empty)", failure));
    }
}

fn render_wallpaper(wallpaper: &Wallpaper) {
    println!(
        "  {:<8} {:>4}x{:<4} {}",
        format!("{:?}", wallpaper.kind).to_lowercase(),
        wallpaper.width,
        wallpaper.height,
        wallpaper.url.dimmed()
    );
}

fn render_media(media: &Media) {
    let base = media.base();
    let year = base
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();

    println!();
    println!("{}{}  {}", base.title.bright_cyan().bold(), year, format!("[{} {}]", media.kind(), base.id).dimmed());
    println!("{} {:.1}/10", "★".yellow(), base.rating);
    if !base.genres.is_empty() {
        println!("{}", base.genres.join(" · ").dimmed());
    }

    match media {
        Media::Movie(movie) => {
            if movie.runtime_minutes > 0 {
                println!("Runtime: {} min", movie.runtime_minutes);
            }
            match &movie.director {
                Some(director) => println!("Director: {}", director.name),
                None => println!("Director: {}", "unknown".dimmed()),
            }
        }
        Media::Series(series) => {
            println!("Seasons: {}  Episodes: {}", series.season_count, series.episode_count);
            if !series.creators.is_empty() {
                let names: Vec<_> = series.creators.iter().map(|c| c.name.as_str()).collect();
                println!("Created by: {}", names.join(", "));
            }
        }
    }

    if !base.synopsis.is_empty() {
        println!();
        println!("{}", base.synopsis);
    }

    if !base.cast.is_empty() {
        println!();
        println!("{}", "Cast".bold());
        for actor in base.cast.iter().take(10) {
            if actor.character.is_empty() {
                println!("  {}", actor.name);
            } else {
                println!("  {} {} {}", actor.name, "as".dimmed(), actor.character);
            }
        }
        if base.cast.len() > 10 {
            println!("  {}", format!("... and {} more", base.cast.len() - 10).dimmed());
        }
    }

    if let Some(trailer) = base.primary_trailer() {
        println!();
        println!("{} {}", "Trailer:".bold(), trailer.watch_url().unwrap_or_else(|| trailer.provider_key.clone()));
    }

    if !base.watch_providers.is_empty() {
        println!();
        println!("{}", "Where to watch".bold());
        for provider in &base.watch_providers {
            println!("  {} {}", provider.name, format!("({})", provider.offer_type).dimmed());
        }
    }

    if !base.wallpapers.is_empty() {
        println!();
        println!("{} {}", "Wallpapers:".bold(), base.wallpapers.len());
    }
    println!();
}
