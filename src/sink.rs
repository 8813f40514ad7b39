// src/sink.rs
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::{info, instrument};

use crate::process::CleanedRecord;

pub const CSV_COLUMNS: [&str; 8] = [
    "title",
    "date",
    "viewers",
    "network",
    "title_clean",
    "viewers_millions",
    "year",
    "source_table_index",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    date: Option<&'a str>,
    viewers: Option<&'a str>,
    network: Option<&'a str>,
    title_clean: &'a str,
    viewers_millions: f64,
    year: Option<i32>,
    source_table_index: usize,
}

impl<'a> From<&'a CleanedRecord> for CsvRow<'a> {
    fn from(r: &'a CleanedRecord) -> Self {
        Self {
            title: &r.title,
            date: r.date.as_deref(),
            viewers: r.viewers.as_deref(),
            network: r.network.as_deref(),
            title_clean: &r.title_clean,
            viewers_millions: r.viewers_millions,
            year: r.year,
            source_table_index: r.source_table_index,
        }
    }
}

/// Write the cleaned records to `path`, header first, one row per record.
///
/// The file is written next to its destination and renamed into place, so a
/// failed run never leaves a half-written CSV behind. Returns the row count.
#[instrument(level = "info", skip(records), fields(path = %path.as_ref().display()))]
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[CleanedRecord]) -> Result<usize> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("sink path {:?} has no file name", path))?
        .to_string_lossy();
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    }

    let tmp_path = dir.join(format!(".{}.tmp", file_name));
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&tmp_path)
        .with_context(|| format!("creating {:?}", tmp_path))?;

    wtr.write_record(CSV_COLUMNS)?;
    for record in records {
        wtr.serialize(CsvRow::from(record))
            .with_context(|| format!("writing row for {:?}", record.title))?;
    }
    wtr.flush().with_context(|| format!("flushing {:?}", tmp_path))?;
    drop(wtr);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;

    info!(rows = records.len(), "saved cleaned data");
    Ok(records.len())
}
