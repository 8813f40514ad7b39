// src/pipeline.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::config::{BrokerConfig, Config};
use crate::error::PipelineError;
use crate::extract::TableExtractor;
use crate::fetch;
use crate::process::{clean_records, unify_tables, CleanedRecord};
use crate::publish::{KafkaPublisher, PublishReport};
use crate::sink;

#[derive(Debug)]
pub struct TransformOutput {
    pub tables: usize,
    pub combined_rows: usize,
    pub records: Vec<CleanedRecord>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub tables: usize,
    pub combined_rows: usize,
    pub cleaned_rows: usize,
    pub csv_path: PathBuf,
    /// `None` when no producer could be created at all.
    pub publish: Option<PublishReport>,
}

/// Markup → cleaned records: extract, unify, clean.
#[instrument(level = "info", skip_all)]
pub fn transform(html: &str, config: &Config) -> Result<TransformOutput, PipelineError> {
    let extractor = TableExtractor::new(&config.table_selector)?;
    let tables = extractor.extract(html);
    info!(tables = tables.len(), "found tables on the page");

    let combined = unify_tables(&tables)?;
    let combined_rows = combined.len();
    info!(rows = combined_rows, "combined rows");

    let records = clean_records(combined);
    info!(rows = records.len(), "cleaned rows");
    if records.len() < config.min_expected_rows {
        warn!(
            rows = records.len(),
            expected = config.min_expected_rows,
            "few rows survived cleaning, the column heuristics may need adjusting"
        );
    }

    Ok(TransformOutput {
        tables: tables.len(),
        combined_rows,
        records,
    })
}

/// Publish to the broker. Never fails the run: every problem is logged and
/// the CSV already written stays the durable output.
pub async fn publish_records(cfg: &BrokerConfig, records: &[CleanedRecord]) -> Option<PublishReport> {
    let publisher = match KafkaPublisher::connect(cfg) {
        Ok(p) => p,
        Err(e) => {
            warn!(bootstrap = %cfg.bootstrap_servers, error = %e, "cannot create Kafka producer, skipping publish");
            return None;
        }
    };

    let report = publisher.publish(records).await;
    if report.broker_unavailable() {
        warn!(
            bootstrap = %cfg.bootstrap_servers,
            "broker unreachable, make sure Kafka is running; cleaned data is saved locally"
        );
    }
    Some(report)
}

/// Fetch → transform → CSV → broker.
///
/// Only a failed fetch, a page without tables, or a failed CSV write stop the run.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let client = fetch::build_client(&config.fetch).context("building HTTP client")?;
    let html = fetch::fetch_page(&client, &config.page_url, &config.fetch)
        .await
        .map_err(PipelineError::from)?;

    let out = transform(&html, config)?;

    sink::write_csv(&config.output_csv, &out.records)
        .with_context(|| format!("saving cleaned data to {:?}", config.output_csv))?;

    let publish = publish_records(&config.broker, &out.records).await;

    Ok(RunSummary {
        tables: out.tables,
        combined_rows: out.combined_rows,
        cleaned_rows: out.records.len(),
        csv_path: config.output_csv.clone(),
        publish,
    })
}
