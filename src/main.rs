use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use showcase::config::ShowcaseConfig;
use showcase::storage::{FjallPreferenceStore, MemoryPreferenceStore, PreferenceStore};
use showcase::telemetry::init_tracing;
use showcase::{Dashboard, PositionReport, Tab, lookup, web};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Configuration file (defaults to the user config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the site and the panel API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load one panel and print its HTML fragment
    Render {
        tab: Tab,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
}

fn open_store(config: &ShowcaseConfig) -> Arc<dyn PreferenceStore> {
    let path = config.storage_path();
    match FjallPreferenceStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            warn!(
                "Preference store at {} unavailable, preferences will not persist: {}",
                path.display(),
                err
            );
            Arc::new(MemoryPreferenceStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        ShowcaseConfig::load_from_path(args.config).context("Failed to load configuration")?;
    if args.verbose {
        config.logging.level = "debug".to_string();
    }
    init_tracing(&config.logging)?;
    lookup::validate(&config.crypto.ids).context("Lookup tables are incomplete")?;

    let store = open_store(&config);
    let dashboard =
        Arc::new(Dashboard::from_config(&config, store).context("Failed to build API clients")?);

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Showcase {} starting", showcase::VERSION);
            web::run(&config.server, dashboard).await
        }
        Command::Render { tab, lat, lon } => {
            let position = match (lat, lon) {
                (Some(lat), Some(lon)) => PositionReport::at(lat, lon, 0.0),
                _ => PositionReport::default(),
            };
            let state = dashboard.activate(tab, &position).await;
            info!(tab = %tab, state = %state, "Panel rendered");
            println!("{}", dashboard.view(tab).await);
            Ok(())
        }
    }
}
