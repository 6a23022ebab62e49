//! Tag Trends Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use anyhow::Context;
use tag_trends::{api, metrics::Metrics, AppConfig, AppState};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs; `RUST_LOG` wins, otherwise `DEBUG` picks the level.
fn init_tracing(debug: bool) {
    let default = if debug {
        "tag_trends=debug,info"
    } else {
        "tag_trends=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();

    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(config.debug);

    api::log_dataset_status(&config);

    let addr = config.bind_addr();
    let metrics = Metrics::install().context("installing metrics recorder")?;
    let app = api::router(AppState::new(config)).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "tag trends service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
