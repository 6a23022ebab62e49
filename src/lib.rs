// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod palette;
pub mod timestamp;
pub mod trends;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::dataset::{load_records, Record};
pub use crate::error::TrendsError;
pub use crate::trends::{compute_tag_trends, TagSeries, TrendPoint, TOP_TAG_LIMIT};
