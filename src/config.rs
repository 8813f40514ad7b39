// src/config.rs
use std::{path::PathBuf, time::Duration};

pub const PAGE_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_most-watched_television_broadcasts";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/117.0 Safari/537.36";
pub const TABLE_SELECTOR: &str = "table.wikitable";
pub const OUTPUT_CSV: &str = "cleaned_data.csv";
pub const KAFKA_BOOTSTRAP: &str = "localhost:9092";
pub const TOPIC: &str = "bonus_22b031177";

/// Fewer cleaned rows than this usually means the column heuristics drifted.
pub const MIN_EXPECTED_ROWS: usize = 20;

/// Everything a run needs, built once in `main` and borrowed by each stage.
#[derive(Debug, Clone)]
pub struct Config {
    pub page_url: String,
    pub table_selector: String,
    pub output_csv: PathBuf,
    pub min_expected_rows: usize,
    pub fetch: FetchConfig,
    pub broker: BrokerConfig,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further attempt.
    pub initial_backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub bootstrap_servers: String,
    pub topic: String,
    pub partitions: i32,
    pub replication_factor: i32,
    pub admin_timeout: Duration,
    pub send_retries: u32,
    /// Upper bound on one message's delivery, retries included.
    pub message_timeout: Duration,
    pub flush_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_url: PAGE_URL.to_string(),
            table_selector: TABLE_SELECTOR.to_string(),
            output_csv: PathBuf::from(OUTPUT_CSV),
            min_expected_rows: MIN_EXPECTED_ROWS,
            fetch: FetchConfig::default(),
            broker: BrokerConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: KAFKA_BOOTSTRAP.to_string(),
            topic: TOPIC.to_string(),
            partitions: 1,
            replication_factor: 1,
            admin_timeout: Duration::from_secs(10),
            send_retries: 5,
            message_timeout: Duration::from_secs(30),
            flush_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn defaults_are_usable() {
        let cfg = Config::default();
        let url = Url::parse(&cfg.page_url).expect("default page URL parses");
        assert_eq!(url.host_str(), Some("en.wikipedia.org"));
        assert!(scraper::Selector::parse(&cfg.table_selector).is_ok());
        assert_eq!(cfg.broker.partitions, 1);
        assert_eq!(cfg.broker.replication_factor, 1);
        assert_eq!(cfg.broker.send_retries, 5);
        assert_eq!(cfg.output_csv, PathBuf::from("cleaned_data.csv"));
    }
}
