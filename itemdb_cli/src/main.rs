mod build;
mod download;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itemdb_core::{BuildConfig, SuffixCatalog};

#[derive(Parser)]
#[command(name = "itemdb")]
#[command(about = "Classic item database builder", long_about = None)]
struct Cli {
    /// Build configuration file; built-in defaults apply when absent
    #[arg(short, long, default_value = "itemdb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the master item list and per-item documents into the cache
    Download,

    /// Build a named database (or every configured one)
    Build {
        /// Database name from the configuration
        name: Option<String>,

        /// Build every configured database
        #[arg(long)]
        all: bool,
    },

    /// Look up a suffix definition by decorated item name and bonus value
    Suffix {
        /// e.g. "Blesswind Hammer of Arcane Wrath"
        item_name: String,

        /// The first bonus value of the enchant
        value: i32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = BuildConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Download => download::run(&config),
        Commands::Build { name, all } => build::run(&config, name.as_deref(), all),
        Commands::Suffix { item_name, value } => {
            let catalog = SuffixCatalog::load(&config.suffix_catalog).with_context(|| {
                format!("loading suffix catalog {}", config.suffix_catalog.display())
            })?;
            match catalog.find_by_name_and_value(&item_name, value) {
                Some(def) => {
                    println!("{}", serde_json::to_string_pretty(def)?);
                    Ok(())
                }
                None => bail!("no suffix matches {item_name:?} with value {value}"),
            }
        }
    }
}
