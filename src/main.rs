use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use tvscrape::{pipeline, publish::ProvisionOutcome, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::default();
    info!(
        url = %config.page_url,
        csv = %config.output_csv.display(),
        bootstrap = %config.broker.bootstrap_servers,
        topic = %config.broker.topic,
        "configured"
    );

    // ─── 3) fetch → extract → unify → clean → csv → kafka ───────────
    let summary = pipeline::run(&config).await?;

    // ─── 4) summary ──────────────────────────────────────────────────
    info!(
        tables = summary.tables,
        combined = summary.combined_rows,
        cleaned = summary.cleaned_rows,
        csv = %summary.csv_path.display(),
        "run complete"
    );
    match summary.publish {
        Some(report) if report.broker_unavailable() => {
            warn!("nothing was published; the CSV file is the only output of this run")
        }
        Some(report) => info!(
            sent = report.tally.sent,
            failed = report.tally.failed,
            topic_created = report.provision == ProvisionOutcome::Created,
            flushed = report.flushed,
            "published"
        ),
        None => warn!("publishing skipped"),
    }

    Ok(())
}
