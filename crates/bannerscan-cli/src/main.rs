//! bannerscan command-line shell.
//!
//! Thin wrapper over the list and detector crates: fetch the banner list,
//! inspect it, and run detection on saved pages.

mod commands;

use anyhow::{Context, Result};
use bannerscan_core::AppConfig;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "bannerscan")]
#[command(about = "Cookie banner detection with a community selector list")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the current banner list
    Fetch {
        /// Directory to store the list in (defaults to the data directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show size and sanity information for a list
    Stats {
        /// List file (defaults to the fetched list)
        #[arg(short, long)]
        list: Option<PathBuf>,
    },
    /// Detect banners in a saved HTML page
    Detect {
        /// Page URL or domain used for the list lookup
        url: String,
        /// Saved HTML document
        html: PathBuf,
        /// List file (defaults to the fetched list)
        #[arg(short, long)]
        list: Option<PathBuf>,
        /// Visit identifier written to the records
        #[arg(long, default_value_t = 0)]
        visit_id: i64,
        /// Crawl identifier written to the records
        #[arg(long, default_value_t = 0)]
        crawl_id: i64,
        /// Report an unparseable page as zero banners instead of failing
        #[arg(long)]
        allow_empty: bool,
    },
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bannerscan=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load_with_env().context("failed to load configuration")?;

    info!("Starting bannerscan v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Fetch { dir } => {
            let path = commands::fetch(&config, dir).await?;
            println!("{}", path.display());
        }
        Commands::Stats { list } => {
            print_json(&commands::stats(&config, list.as_deref())?)?;
        }
        Commands::Detect {
            url,
            html,
            list,
            visit_id,
            crawl_id,
            allow_empty,
        } => {
            let (_, table) = commands::load_table(&config, list.as_deref())?;
            let options = commands::DetectOptions {
                url,
                html,
                visit_id,
                crawl_id,
                allow_empty,
            };
            print_json(&commands::detect(&table, &options)?)?;
        }
    }

    Ok(())
}
