// src/process/unify.rs
use tracing::{info, instrument};

use crate::error::PipelineError;
use crate::extract::{RawTable, RawTableRow};

// Candidate column labels per target field, highest priority first.
pub const TITLE_COLUMNS: &[&str] = &["show", "programme", "program", "broadcast", "episode", "title"];
pub const DATE_COLUMNS: &[&str] = &["date"];
pub const VIEWERS_COLUMNS: &[&str] = &["viewers", "number of viewers", "number of viewers (millions)"];
pub const NETWORK_COLUMNS: &[&str] = &["network", "channel"];

/// A row projected onto the fixed schema. Values are still raw text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    pub source_table_index: usize,
    pub title: Option<String>,
    pub date: Option<String>,
    pub viewers: Option<String>,
    pub network: Option<String>,
}

/// Value of the first candidate column the row has. The cell may be empty.
fn resolve<'a>(row: &RawTableRow<'a>, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|c| row.get_ignore_case(c))
        .flatten()
}

/// Cells holding only a number (a rank, a count) are not text.
fn is_numeric(value: &str) -> bool {
    value
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .is_ok_and(f64::is_finite)
}

fn first_text_cell<'a>(row: &RawTableRow<'a>) -> Option<&'a str> {
    row.iter()
        .filter_map(|(_, value)| value)
        .find(|v| !v.trim().is_empty() && !is_numeric(v))
}

pub fn normalize_row(row: RawTableRow<'_>) -> NormalizedRecord {
    let title = resolve(&row, TITLE_COLUMNS).or_else(|| first_text_cell(&row));
    NormalizedRecord {
        source_table_index: row.table_index,
        title: title.map(str::to_string),
        date: resolve(&row, DATE_COLUMNS).map(str::to_string),
        viewers: resolve(&row, VIEWERS_COLUMNS).map(str::to_string),
        network: resolve(&row, NETWORK_COLUMNS).map(str::to_string),
    }
}

/// One record per row of every table, in page order. Fails only when there
/// are no tables at all.
#[instrument(level = "info", skip_all, fields(tables = tables.len()))]
pub fn unify_tables(tables: &[RawTable]) -> Result<Vec<NormalizedRecord>, PipelineError> {
    if tables.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    let records: Vec<NormalizedRecord> = tables
        .iter()
        .flat_map(|t| t.rows())
        .map(normalize_row)
        .collect();
    info!(rows = records.len(), "unified tables");
    Ok(records)
}
