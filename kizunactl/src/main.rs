use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kizuna_config::{ConfigLoader, MappingTableSource};
use kizunactl::{JsonCatalog, commands};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "kizunactl", version)]
#[command(
    about = "Align episode numbering and merge title metadata across catalogs"
)]
struct Cli {
    /// Path to kizuna.toml (defaults to $KIZUNA_CONFIG, ./kizuna.toml or
    /// ./config/kizuna.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mapping file (JSON or TOML), overrides every other mapping source
    #[arg(long, global = true)]
    mapping: Option<PathBuf>,

    /// Environment file to load before reading the configuration
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the mapping entries for a primary (`kitsu:1376`) or reference
    /// (`tt0409591`) id
    Lookup { id: String },
    /// Print the episodes of a primary record aligned to reference numbering
    Align {
        /// Primary id, with or without the `kitsu:` prefix
        primary_id: String,
        /// Directory holding `<id>.json` records
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Print a record merged with its counterpart
    Merge {
        id: String,
        /// Directory holding `<id>.json` records
        #[arg(long)]
        catalog: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config.clone() {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = cli.env_file.clone() {
        loader = loader.with_env_file(path);
    }
    if let Some(path) = cli.mapping.clone() {
        loader = loader.with_mapping_path(path);
    }
    let load = loader.load().context("failed to load configuration")?;

    if load.env_file_loaded {
        info!("loaded .env file");
    }
    match &load.mapping_source {
        MappingTableSource::Default => {
            info!("no mapping file found; every id passes through unchanged")
        }
        source => debug!(?source, "mapping table source"),
    }

    let reconciler = load.into_reconciler();

    match cli.command {
        Command::Lookup { id } => {
            print_json(&commands::lookup(&reconciler, &id)?)?;
        }
        Command::Align {
            primary_id,
            catalog,
        } => {
            let catalog = JsonCatalog::new(catalog);
            let videos =
                commands::align(&reconciler, &catalog, &primary_id).await?;
            print_json(&videos)?;
        }
        Command::Merge { id, catalog } => {
            let catalog = JsonCatalog::new(catalog);
            let merged = commands::merge(&reconciler, &catalog, &id).await?;
            print_json(&merged)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
