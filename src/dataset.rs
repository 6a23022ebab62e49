//! # Dataset Loader
//! Reads the tag dataset (UTF-8 CSV with a header row) into [`Record`]s.
//!
//! Only the `Tag` and `Time` columns are required; anything else is ignored
//! and columns may come in any order. A row shorter than the header reads its
//! missing cells as empty strings.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TrendsError;

pub const TAG_COLUMN: &str = "Tag";
pub const TIME_COLUMN: &str = "Time";

/// One input row. `time` is kept raw; parsing is the engine's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub tag: String,
    pub time: String,
}

impl Record {
    pub fn new(tag: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            time: time.into(),
        }
    }
}

/// Load every record of the dataset at `path`.
pub fn load_records(path: &Path) -> Result<Vec<Record>, TrendsError> {
    let not_found = || TrendsError::DatasetNotFound {
        path: path.to_path_buf(),
    };
    if !path.exists() {
        return Err(not_found());
    }

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => TrendsError::DatasetParse(format!("reading {}: {e}", path.display())),
    })?;

    let records = read_records(file)?;
    debug!(path = %path.display(), rows = records.len(), "dataset loaded");
    Ok(records)
}

/// Parse records from any CSV source.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, TrendsError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let tag_idx = column_index(&headers, TAG_COLUMN)?;
    let time_idx = column_index(&headers, TIME_COLUMN)?;

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        out.push(Record {
            tag: row.get(tag_idx).unwrap_or_default().to_string(),
            time: row.get(time_idx).unwrap_or_default().to_string(),
        });
    }
    Ok(out)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, TrendsError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == name)
        .ok_or_else(|| TrendsError::DatasetParse(format!("missing required column `{name}`")))
}
