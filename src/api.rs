use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Html, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::dataset::load_records;
use crate::error::TrendsError;
use crate::metrics;
use crate::palette;
use crate::trends::{compute_tag_trends_with_summary, AggregationSummary, TagSeries};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/data", get(get_data))
        .route("/index.html", get(serve_index))
        .route("/colors", get(get_colors))
        .nest_service("/static", static_files)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Startup diagnostics: where the dataset is expected and whether it is there.
pub fn log_dataset_status(config: &AppConfig) {
    let path = config.dataset_path.display();
    info!(%path, "looking for CSV dataset");
    if config.dataset_path.exists() {
        info!(%path, "CSV dataset found");
    } else {
        warn!(%path, "CSV file not found! /data will answer 404 until it appears");
    }
}

async fn get_data(State(state): State<AppState>) -> Result<Json<TagSeries>, TrendsError> {
    metrics::record_request("/data");
    let started = Instant::now();

    match load_and_aggregate(state.config.dataset_path.clone()).await {
        Ok((series, summary)) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            metrics::record_run(&summary, elapsed_ms);
            debug!(
                rows = summary.rows_read,
                dropped_bad_time = summary.dropped_bad_time,
                dropped_missing_tag = summary.dropped_missing_tag,
                years = summary.years,
                tags = summary.tags,
                top = series.len(),
                elapsed_ms,
                "tag trends computed"
            );
            Ok(Json(series))
        }
        Err(e) => {
            match &e {
                TrendsError::DatasetNotFound { path } => {
                    metrics::record_error("not_found");
                    warn!(path = %path.display(), "CSV file not found!");
                }
                other => {
                    metrics::record_error("internal");
                    error!(error = %other, "failed to build tag trends");
                }
            }
            Err(e)
        }
    }
}

/// Read + aggregate on the blocking pool; both are synchronous and bounded by the file size.
async fn load_and_aggregate(
    path: PathBuf,
) -> Result<(TagSeries, AggregationSummary), TrendsError> {
    tokio::task::spawn_blocking(move || {
        let records = load_records(&path)?;
        Ok(compute_tag_trends_with_summary(&records))
    })
    .await
    .map_err(|e| TrendsError::Aggregation(e.to_string()))?
}

async fn serve_index(State(state): State<AppState>) -> Result<Html<String>, TrendsError> {
    metrics::record_request("/index.html");
    let path = state.config.index_path();
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Ok(Html(body)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "static asset unavailable");
            Err(TrendsError::AssetNotFound { path })
        }
    }
}

async fn get_colors() -> Json<BTreeMap<&'static str, &'static str>> {
    metrics::record_request("/colors");
    Json(palette::palette())
}
