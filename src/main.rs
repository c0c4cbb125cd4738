//! Retrace CLI
//!
//! Command-line interface for inspecting a visit log: print the ranked
//! most-visited sites, render the panel page, or look up a single host.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retrace::config::{generate_default_config, Config};
use retrace::history::{MemoryLog, VisitEntry};
use retrace::panel::MostVisited;
use retrace::rank::NoIcons;
use retrace::render::{FileTemplate, DEFAULT_TEMPLATE};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "retrace", version, about = "Most-visited site ranking over a visit log")]
struct Cli {
    /// Path to a JSON visit log (array of {url, visited_at, title})
    #[arg(short = 'f', long, global = true)]
    visits: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the top-N ranked sites
    Top {
        /// How many sites (negative = all); defaults to the configured count
        #[arg(short = 'n', long)]
        count: Option<i64>,
    },
    /// Render the panel page to a file or stdout
    Render {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show where a host ranks in the visit history
    Rank {
        /// Address to look up
        address: String,
    },
    /// Print a default configuration file
    InitConfig,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "retrace=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    match cli.command {
        Command::Top { count } => {
            let log = load_visits(cli.visits.as_deref())?;
            let mut panel = MostVisited::new(config.ranking.max_entries);
            let top = match count {
                Some(n) => panel.top_n(&log, &NoIcons, n),
                None => panel.top_entries(&log, &NoIcons),
            };

            if top.is_empty() {
                println!("No ranked sites.");
            }
            for (i, entry) in top.iter().enumerate() {
                println!(
                    "{:>3}. {:<40} score {:>5}  last visited {}",
                    i + 1,
                    entry.site,
                    entry.frecency,
                    entry.last_visited.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Render { output } => {
            let log = load_visits(cli.visits.as_deref())?;
            let mut panel = MostVisited::new(config.ranking.max_entries);

            let payload = match &config.template.path {
                Some(path) => panel.render(&log, &NoIcons, &FileTemplate::new(path)),
                None => panel.render(&log, &NoIcons, &DEFAULT_TEMPLATE),
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, &payload)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!("Wrote {} bytes to {}", payload.len(), path.display());
                }
                None => print!("{}", String::from_utf8_lossy(&payload)),
            }
        }
        Command::Rank { address } => {
            let log = load_visits(cli.visits.as_deref())?;
            let mut panel = MostVisited::new(config.ranking.max_entries);

            match panel.host_rank(&log, &address) {
                0 => println!("{address}: not ranked"),
                rank => println!("{address}: #{rank} by recency"),
            }
        }
        Command::InitConfig => {
            print!("{}", generate_default_config());
        }
    }

    Ok(())
}

fn load_visits(path: Option<&Path>) -> Result<MemoryLog> {
    let path = path.context("a visit log is required; pass --visits <file.json>")?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading visit log {}", path.display()))?;
    let entries: Vec<VisitEntry> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    tracing::debug!(visits = entries.len(), "loaded visit log");
    Ok(MemoryLog::from_entries(entries))
}
