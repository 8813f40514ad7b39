// src/fetch/page.rs
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{FetchError, FetchFailure};

/// Client carrying the browser user-agent and per-request timeout.
pub fn build_client(cfg: &FetchConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .timeout(cfg.timeout)
        .build()
}

async fn get_text_core(client: &Client, url: &Url) -> Result<String, reqwest::Error> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// GET the page and return its markup.
///
/// Any failure, non-2xx statuses included, is retried up to `max_retries`
/// times with exponential backoff before it becomes a [`FetchError`].
#[instrument(level = "info", skip(client, cfg))]
pub async fn fetch_page(
    client: &Client,
    page_url: &str,
    cfg: &FetchConfig,
) -> Result<String, FetchError> {
    let url = Url::parse(page_url).map_err(|e| FetchError {
        url: page_url.to_string(),
        attempts: 0,
        source: FetchFailure::from(e),
    })?;

    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match get_text_core(client, &url).await {
            Ok(body) => {
                info!(%url, attempts, bytes = body.len(), "fetched page");
                return Ok(body);
            }
            Err(e) if attempts <= cfg.max_retries => {
                let backoff = cfg
                    .initial_backoff
                    .saturating_mul(1u32 << (attempts - 1).min(16));
                warn!(%url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "Retrying");
                sleep(backoff).await;
            }
            Err(e) => {
                error!(%url, attempts, error = %e, "Exhausted retries");
                return Err(FetchError {
                    url: url.to_string(),
                    attempts,
                    source: FetchFailure::from(e),
                });
            }
        }
    }
}
