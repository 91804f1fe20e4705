use cinemateca_config::{Config, PathManager};
use cinemateca_models::MediaKind;
use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{config, genre, get};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinemateca")]
#[command(about = "Cinemateca - one consistent view of movies and series from the catalog API")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to the configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a movie or series with cast, trailers, watch providers and wallpapers
    #[command(long_about = "Fetch a title from the catalog and print the normalized entity. Sub-resources that fail to load are reported as warnings and left empty; the detail record itself is required.")]
    Get {
        /// Catalog id of the title
        id: String,

        /// Content type: movie or tv
        #[arg(long, default_value = "movie")]
        kind: MediaKind,

        /// Include the list of degraded sub-resources in the output
        #[arg(long, action = ArgAction::SetTrue)]
        report: bool,
    },
    /// List backdrops and posters of a title
    Wallpapers {
        id: String,

        #[arg(long, default_value = "movie")]
        kind: MediaKind,
    },
    /// Genre ontology lookups
    Genre {
        #[command(subcommand)]
        cmd: GenreCommands,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum GenreCommands {
    /// Id of a genre name for a content type
    Id {
        name: String,

        /// Content type: movie or tv
        #[arg(long = "type", default_value = "movie")]
        content_type: String,
    },
    /// Translate a genre id between the movie and tv ontologies
    #[command(long_about = "Translate a genre id between the movie and tv ontologies. The conversion is lossy: several movie genres share one tv genre, so converting back may land on a different id.")]
    Convert {
        id: u32,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },
    /// Fetch the upstream genre list annotated with canonical names
    List {
        #[arg(long = "type", default_value = "movie")]
        content_type: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective configuration (API key masked)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => PathManager::default().config_file(),
    };
    let app_config = Config::load_or_default(&config_path)
        .map_err(|e| eyre!("Failed to load config from {}: {:#}", config_path.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &app_config.logging).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Get { id, kind, report } => get::run_get(&id, kind, report, &app_config, &output).await,
        Commands::Wallpapers { id, kind } => get::run_wallpapers(&id, kind, &app_config, &output).await,
        Commands::Genre { cmd } => genre::run_genre(cmd, &app_config, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &config_path, &app_config, &output),
    }
}
