use crate::output::Output;
use crate::ConfigCommands;
use cinemateca_config::Config;
use cinemateca_models::ApiResponse;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run_config(cmd: ConfigCommands, path: &Path, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, path, config, output),
        ConfigCommands::Init { force } => init_config(force, path, output),
    }
}

fn mask_string(s: &str) -> String {
    let visible: String = s.chars().take(4).collect();
    let hidden = s.chars().count().saturating_sub(4);
    if hidden == 0 {
        "*".repeat(visible.chars().count())
    } else {
        format!("{}{}", visible, "*".repeat(hidden))
    }
}

fn show_config(full: bool, path: &Path, config: &Config, output: &Output) -> Result<()> {
    let mut shown = config.clone();
    if !full {
        shown.catalog.api_key = shown.catalog.api_key.as_deref().map(mask_string);
    }

    if output.envelope(&ApiResponse::ok(&shown)) || output.is_quiet() {
        return Ok(());
    }

    if !path.exists() {
        output.warn(format!("Configuration file not found at: {}", path.display()));
        output.info("Showing defaults and environment overrides. Run 'cinemateca config init' to create the file.");
    } else {
        println!("{} {}", "Config file:".bold(), path.display());
    }

    let rendered = toml::to_string_pretty(&shown).map_err(|e| eyre!("Failed to render configuration: {}", e))?;
    println!();
    println!("{}", rendered);

    if !config.catalog.has_api_key() {
        output.warn("No catalog API key set. Add catalog.api_key or export TMDB_API_KEY.");
    }
    if let Err(e) = config.validate() {
        output.error(format!("Configuration is invalid: {:#}", e));
    }
    Ok(())
}

fn init_config(force: bool, path: &Path, output: &Output) -> Result<()> {
    if path.exists() && !force {
        output.warn(format!("Configuration already exists at {} (use --force to overwrite)", path.display()));
        return Ok(());
    }

    Config::default()
        .save_to_file(path)
        .map_err(|e| eyre!("Failed to write config to {}: {:#}", path.display(), e))?;

    output.success(format!("Wrote default configuration to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("abcdef12"), "abcd****");
        assert_eq!(mask_string(""), "");
    }
}
