//! Healthcare AI Assistant API server
//!
//! Reads configuration from the environment (and `.env`), checks the document
//! store, then serves until Ctrl-C or SIGTERM.

use anyhow::Result;
use medassist_api::{
    config::Config,
    notifier::LogOnlyForwarder,
    routes::default_mounts,
    startup::{shutdown_signal, Application},
    store::DocumentBackend,
    telemetry::init_tracing,
};
use medassist_kommo::KommoForwarder;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();
    info!("Starting Healthcare AI Assistant API");

    let config = Config::from_env()?;

    let kommo = config
        .kommo
        .clone()
        .map(KommoForwarder::new)
        .transpose()?;

    let store = DocumentBackend::connect(&config.store).await;

    let app = match kommo {
        Some(forwarder) => {
            info!("Forwarding reception requests to Kommo");
            Application::build(&config, store, forwarder, default_mounts()).await?
        }
        None => {
            warn!("KOMMO_BASE_URL / KOMMO_ACCESS_TOKEN not set, CRM forwarding is log-only");
            Application::build(&config, store, LogOnlyForwarder, default_mounts()).await?
        }
    };

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            app.shutdown().await;
            return Err(err.into());
        }
    };

    info!(addr = %addr, "Starting HTTP server");

    let served = app.serve(listener, shutdown_signal()).await;
    app.shutdown().await;
    served?;

    info!("Server stopped");
    Ok(())
}
