//! dropboard - Release dashboard engine

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dropboard_core::{
    DashboardConfig, DashboardEvent, DashboardOrchestrator, ViewportClass,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dropboard",
    version,
    about = "Release dashboard engine - timeline, roadmap, teams, birthdays",
    long_about = "Derives a display-ready release dashboard from a single JSON config\n\
                  document: versioned timeline progress, drop roadmap with computed\n\
                  statuses, team rosters, and the nearest team birthdays.\n\
                  \n\
                  Examples:\n\
                    dropboard show                        # Load config once and print\n\
                    dropboard show --json                 # Machine-readable view model\n\
                    dropboard run                         # Keep running with live cadences\n\
                    dropboard run --viewport mobile       # Slower carousel rotation\n\
                    dropboard validate ./config.json      # Schema-check a document\n\
                  \n\
                  Environment Variables:\n\
                    DROPBOARD_CONFIG                      # Config URL or file path\n\
                    DROPBOARD_NO_COLOR                    # Disable ANSI colors"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Config document URL or file path (default: ./config.json)
    #[arg(long, env = "DROPBOARD_CONFIG")]
    config: Option<String>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "DROPBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Load the config once and print the dashboard (default)
    Show {
        /// Output the view model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run continuously: rotate slides, poll reminders, refresh at midnight
    Run {
        /// Viewport class deciding the carousel rotation period
        #[arg(long, value_enum, default_value_t = Viewport::Desktop)]
        viewport: Viewport,
    },
    /// Validate a local config document and exit
    Validate {
        /// Path to the JSON document
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Viewport {
    Desktop,
    Mobile,
}

impl From<Viewport> for ViewportClass {
    fn from(viewport: Viewport) -> Self {
        match viewport {
            Viewport::Desktop => ViewportClass::Desktop,
            Viewport::Mobile => ViewportClass::Mobile,
        }
    }
}

/// Resolve the config location: flag/env, then ./config.json, then the
/// user config directory
fn resolve_config_location(flag: Option<String>) -> String {
    if let Some(location) = flag {
        return location;
    }

    let local = PathBuf::from("config.json");
    if local.exists() {
        return local.to_string_lossy().to_string();
    }

    dirs::config_dir()
        .map(|dir| dir.join("dropboard").join("config.json"))
        .unwrap_or(local)
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let location = resolve_config_location(cli.config);
    let no_color = cli.no_color;

    match cli.mode.unwrap_or(Mode::Show { json: false }) {
        Mode::Show { json } => run_show(location, json, no_color).await,
        Mode::Run { viewport } => run_dashboard(location, viewport.into(), no_color).await,
        Mode::Validate { path } => run_validate(path),
    }
}

async fn run_show(location: String, json: bool, no_color: bool) -> Result<()> {
    let source = dropboard_core::ConfigSource::new(dropboard_core::SourceConfig::new(&location));
    let config = source
        .get_config()
        .await
        .with_context(|| format!("Could not load config from {location}"))?;

    let view = dropboard_core::transform::process_config(&config, chrono::Local::now())
        .context("Could not process config")?;

    println!("{}", cli::format_dashboard(&view, json, no_color));
    Ok(())
}

async fn run_dashboard(
    location: String,
    viewport: ViewportClass,
    no_color: bool,
) -> Result<()> {
    let mut config = DashboardConfig::new(&location);
    config.viewport = viewport;

    let orchestrator = DashboardOrchestrator::new(config);
    let mut events = orchestrator.subscribe();

    orchestrator.start().await;

    if let Some(view) = orchestrator.view() {
        println!("{}", cli::format_dashboard(&view, false, no_color));
    } else if let Some(error) = orchestrator.last_error() {
        eprintln!("{error}");
    }

    info!(config = %location, "Dashboard running; press Ctrl-C to stop");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(DashboardEvent::ViewUpdated) => {
                    if let Some(view) = orchestrator.view() {
                        println!("{}", cli::format_dashboard(&view, false, no_color));
                    }
                }
                Ok(DashboardEvent::SlideChanged(index)) => {
                    info!(slide = index, "Carousel moved");
                }
                Ok(DashboardEvent::ReminderChanged(visible)) => {
                    info!(visible, "Reminder window changed");
                }
                Ok(DashboardEvent::LoadFailed(message)) => {
                    eprintln!("{message}");
                }
                Err(_) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    orchestrator.shutdown();
    Ok(())
}

fn run_validate(path: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    match dropboard_core::schema::validate_str(&raw) {
        Ok(config) => {
            println!(
                "Config OK: version {}, {} drops, {} teams, {} birthdays",
                config.version_data.name,
                config.drops.len(),
                config.teams.len(),
                config.birthdays.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Config rejected: {e}");
            std::process::exit(1);
        }
    }
}
