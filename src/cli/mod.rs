//! Command-line interface for gallery-sync.
//!
//! Provides commands for running a sync pass, inspecting or advancing the
//! watermark, and dumping the resolved configuration.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::adapters::{GalleryClient, SearchIndexClient};
use crate::config;
use crate::state::{FileCacheStore, FileWatermarkStore, WatermarkStore};
use crate::sync::{Extractor, Loader, Orchestrator, SyncOutcome, Transformer};

/// gallery-sync - incremental gallery to search index connector
#[derive(Parser, Debug)]
#[command(name = "gallery-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one sync pass
    Sync {
        /// Skip the cache snapshot and extract from the gallery API
        /// (rewrites the snapshot on success)
        #[arg(long)]
        remote: bool,

        /// Bearer token for the destination index
        #[arg(long, env = "GALLERY_SYNC_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Inspect or update the sync watermark
    Watermark {
        #[command(subcommand)]
        command: WatermarkCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum WatermarkCommands {
    /// Print the effective watermark
    Show,

    /// Overwrite the watermark with a new timestamp
    Set {
        /// RFC 3339 timestamp, e.g. 2024-06-01T00:00:00Z
        timestamp: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Sync { remote, token } => run_sync(remote, token).await,
            Commands::Watermark { command } => match command {
                WatermarkCommands::Show => show_watermark().await,
                WatermarkCommands::Set { timestamp } => set_watermark(&timestamp).await,
            },
            Commands::Config => show_config(),
        }
    }
}

/// Wire the file stores and HTTP clients together and run one pass
async fn run_sync(remote: bool, token: String) -> Result<()> {
    let config = config::config()?;

    let extractor = Extractor::new(
        GalleryClient::new(&config.endpoint),
        FileCacheStore::new(config.cache_path()),
        config.page_size,
    );
    let transformer = Transformer::new(&config.item_url_base);
    let loader = Loader::new(SearchIndexClient::new(
        &config.graph_base_url,
        &config.connection_id,
        token,
    ));
    let watermark = FileWatermarkStore::new(config.watermark_path());

    let orchestrator = Orchestrator::new(extractor, transformer, loader, watermark);
    let report = orchestrator.run(!remote).await?;

    match report.outcome {
        SyncOutcome::Idle => println!("run {}: nothing to sync", report.run_id),
        SyncOutcome::Completed => println!(
            "run {}: {} records extracted, {} items loaded",
            report.run_id, report.extracted, report.loaded
        ),
        SyncOutcome::PartiallyLoaded => println!(
            "run {}: {} records extracted, {} of {} items loaded (next run picks up the rest)",
            report.run_id, report.extracted, report.loaded, report.extracted
        ),
    }

    Ok(())
}

async fn show_watermark() -> Result<()> {
    let config = config::config()?;
    let store = FileWatermarkStore::new(config.watermark_path());

    println!("{}", store.load().await.to_rfc3339());
    Ok(())
}

async fn set_watermark(timestamp: &str) -> Result<()> {
    let parsed: DateTime<Utc> = timestamp
        .parse()
        .with_context(|| format!("Invalid RFC 3339 timestamp: {timestamp}"))?;

    let config = config::config()?;
    let store = FileWatermarkStore::new(config.watermark_path());
    store.store(parsed).await?;

    println!("watermark set to {}", parsed.to_rfc3339());
    Ok(())
}

fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("home:          {}", config.home.display());
    println!("cache:         {}", config.cache_path().display());
    println!("watermark:     {}", config.watermark_path().display());
    println!("endpoint:      {}", config.endpoint);
    println!("page size:     {}", config.page_size);
    println!("item url base: {}", config.item_url_base);
    println!("index base:    {}", config.graph_base_url);
    println!("connection:    {}", config.connection_id);
    match &config.config_file {
        Some(path) => println!("config file:   {}", path.display()),
        None => println!("config file:   (none)"),
    }

    Ok(())
}
