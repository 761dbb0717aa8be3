//! Shipment Intake Server
//!
//! Reads delivery-note PDFs, extracts the logistics fields, enriches them with
//! dangerous-goods data from the hazard reference table, and serves the
//! forwarder TSV export. Provides REST endpoints for:
//!
//! - Batch upload of PDFs
//! - Parsed results of the current batch
//! - TSV download with signature and checklist services

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shipment_engine::{ExportProfile, HazardTable, ShipmentEngine};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod state;

use state::AppState;

/// Command-line arguments for the shipment server
#[derive(Parser, Debug)]
#[command(name = "shipment-server")]
#[command(about = "Shipment PDF intake and forwarder TSV export")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5151")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Hazard reference table (.csv or .tsv) keyed by item number
    #[arg(long, env = "HAZARD_TABLE")]
    hazard_table: Option<PathBuf>,

    /// JSON file overriding the export boilerplate columns
    #[arg(long, env = "EXPORT_PROFILE")]
    export_profile: Option<PathBuf>,

    /// Maximum upload request size in megabytes
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "50")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_hazard_table(path: Option<&PathBuf>) -> anyhow::Result<HazardTable> {
    match path {
        Some(path) => HazardTable::from_path(path)
            .with_context(|| format!("loading hazard table {}", path.display())),
        None => {
            warn!("No hazard table configured; hazard columns will be empty");
            Ok(HazardTable::new())
        }
    }
}

fn load_export_profile(path: Option<&PathBuf>) -> anyhow::Result<ExportProfile> {
    match path {
        Some(path) => {
            let profile = ExportProfile::from_path(path)
                .with_context(|| format!("loading export profile {}", path.display()))?;
            info!("Loaded export profile from {}", path.display());
            Ok(profile)
        }
        None => Ok(ExportProfile::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let hazards = load_hazard_table(args.hazard_table.as_ref())?;
    let profile = load_export_profile(args.export_profile.as_ref())?;

    let state = AppState::new(ShipmentEngine::new(hazards), profile);
    let app = api::router(state, args.max_upload_mb * 1024 * 1024);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Upload limit: {} MB", args.max_upload_mb);

    axum::serve(listener, app).await?;

    Ok(())
}
