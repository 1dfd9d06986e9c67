//! Judi Online Comment Classifier — Binary Entrypoint
//! Boots the Axum HTTP server after the startup barrier: the slang
//! dictionary and the classifier are built before the listener accepts.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use judol_screener::api::{self, AppState};
use judol_screener::classifier;
use judol_screener::config::Config;
use judol_screener::slang::SlangDictionary;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = Config::from_env();

    // Startup barrier: no request is accepted until both are ready.
    // The dictionary degrades internally on fetch failure; a classifier
    // build failure is fatal.
    let slang = SlangDictionary::load(&cfg).await;
    info!(entries = slang.len(), "slang dictionary ready");

    let classifier = classifier::build(&cfg)?;
    info!(provider = classifier.name(), "classifier ready");

    let state = AppState {
        slang: Arc::new(slang),
        classifier,
    };
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    info!(addr = %cfg.bind_addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
