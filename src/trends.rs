//! # Aggregation Engine
//! Pure, testable pipeline that maps dataset [`Record`]s → [`TagSeries`].
//! No I/O, suitable for unit tests and offline use.
//!
//! Steps: parse each `Time` (rows that fail are dropped, see
//! [`crate::timestamp`]), bucket by calendar year, count per `(year, tag)`,
//! normalize each count to a percentage of its year's total, rank tags by the
//! sum of their yearly percentages, keep the top [`TOP_TAG_LIMIT`] and reshape
//! into per-tag series sorted by year.
//!
//! Rows whose tag cell is empty or a missing-value marker (`NA`, `null`, …)
//! are dropped as well.
//!
//! Ranking ties (equal sums) are broken by tag name, ascending.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dataset::Record;
use crate::timestamp::parse_year;

/// Number of tags kept in the published series.
pub const TOP_TAG_LIMIT: usize = 10;

/// Tag cells read as "no value", like a spreadsheet export writes them.
const MISSING_TAG_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_tag(tag: &str) -> bool {
    MISSING_TAG_MARKERS.contains(&tag)
}

/// One row of the full (pre-ranking) aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTagCount {
    pub year: i32,
    pub tag: String,
    pub count: u64,
    /// `100 * count / total count of that year`.
    pub normalized_percent: f64,
}

/// A single point of a tag's series. Field names are part of the HTTP contract.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrendPoint {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Normalized_Count")]
    pub normalized_percent: f64,
}

/// Top tags with their yearly shares, held in rank order (largest total first).
///
/// Serializes as a JSON object keyed by tag, keys emitted in rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSeries {
    entries: Vec<(String, Vec<TrendPoint>)>,
}

impl TagSeries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tags in rank order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn get(&self, tag: &str) -> Option<&[TrendPoint]> {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, pts)| pts.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TrendPoint])> {
        self.entries
            .iter()
            .map(|(t, pts)| (t.as_str(), pts.as_slice()))
    }
}

impl Serialize for TagSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, points) in &self.entries {
            map.serialize_entry(tag, points)?;
        }
        map.end()
    }
}

/// Counters describing one pipeline run; feeds logs and metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    pub rows_read: usize,
    pub dropped_bad_time: usize,
    pub dropped_missing_tag: usize,
    pub years: usize,
    pub tags: usize,
}

impl AggregationSummary {
    pub fn rows_dropped(&self) -> usize {
        self.dropped_bad_time + self.dropped_missing_tag
    }
}

/// Full `(year, tag)` table sorted by year then tag, plus run counters.
pub fn year_tag_counts(records: &[Record]) -> (Vec<YearTagCount>, AggregationSummary) {
    let mut summary = AggregationSummary {
        rows_read: records.len(),
        ..Default::default()
    };

    // 1–3) parse, bucket by year, count per (year, tag)
    let mut counts: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    for r in records {
        let Some(year) = parse_year(&r.time) else {
            summary.dropped_bad_time += 1;
            continue;
        };
        if is_missing_tag(&r.tag) {
            summary.dropped_missing_tag += 1;
            continue;
        }
        *counts.entry((year, r.tag.as_str())).or_insert(0) += 1;
    }

    // 4) normalize within each year; totals are never zero for a present year
    let mut year_totals: BTreeMap<i32, u64> = BTreeMap::new();
    let mut distinct_tags = BTreeSet::new();
    for (&(year, tag), &n) in &counts {
        *year_totals.entry(year).or_insert(0) += n;
        distinct_tags.insert(tag);
    }
    summary.years = year_totals.len();
    summary.tags = distinct_tags.len();

    let table = counts
        .into_iter()
        .filter_map(|((year, tag), count)| {
            let total = *year_totals.get(&year)?;
            Some(YearTagCount {
                year,
                tag: tag.to_string(),
                count,
                normalized_percent: 100.0 * count as f64 / total as f64,
            })
        })
        .collect();

    (table, summary)
}

/// Rank tags by summed yearly percentage, largest first, ties by name.
pub fn rank_tags(table: &[YearTagCount], limit: usize) -> Vec<String> {
    // The table is year-sorted, so each tag's sum accumulates in year order.
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in table {
        *totals.entry(row.tag.as_str()).or_insert(0.0) += row.normalized_percent;
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(b.0),
        ord => ord,
    });
    ranked.truncate(limit);
    ranked.into_iter().map(|(t, _)| t.to_string()).collect()
}

/// Top-10 tag series for the given records. Empty input gives an empty series.
pub fn compute_tag_trends(records: &[Record]) -> TagSeries {
    compute_tag_trends_with_summary(records).0
}

/// Same as [`compute_tag_trends`] but also returns the run counters.
pub fn compute_tag_trends_with_summary(records: &[Record]) -> (TagSeries, AggregationSummary) {
    let (table, summary) = year_tag_counts(records);
    if table.is_empty() {
        return (TagSeries::default(), summary);
    }

    // 5) rank
    let top = rank_tags(&table, TOP_TAG_LIMIT);

    // 6) filter; table order keeps every series ascending by year
    let mut by_tag: BTreeMap<&str, Vec<TrendPoint>> =
        top.iter().map(|t| (t.as_str(), Vec::new())).collect();
    for row in &table {
        if let Some(points) = by_tag.get_mut(row.tag.as_str()) {
            points.push(TrendPoint {
                year: row.year,
                normalized_percent: row.normalized_percent,
            });
        }
    }

    // 7) reshape in rank order
    let entries = top
        .iter()
        .map(|t| {
            let points = by_tag.remove(t.as_str()).unwrap_or_default();
            (t.clone(), points)
        })
        .collect();

    (TagSeries { entries }, summary)
}
