// src/test_support.rs
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tvscrape=debug")),
        )
        .with_test_writer()
        .finish();
    // another test may have installed one already
    let _ = tracing::subscriber::set_global_default(subscriber);
}
