// src/publish/mod.rs
pub mod kafka;
pub mod message;

use std::time::Duration;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::config::BrokerConfig;
use crate::error::SendError;
use crate::process::CleanedRecord;
pub use kafka::{KafkaAdmin, KafkaProducer, KafkaPublisher};
pub use message::PublishedMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i32,
}

impl From<&BrokerConfig> for TopicSpec {
    fn from(cfg: &BrokerConfig) -> Self {
        Self {
            name: cfg.topic.clone(),
            partitions: cfg.partitions,
            replication_factor: cfg.replication_factor,
        }
    }
}

/// Result of asking the broker for the topic. Only `Failed` is a problem,
/// and even that does not stop publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyExists,
    Failed(String),
}

#[allow(async_fn_in_trait)]
pub trait TopicAdmin {
    async fn create_topic(&self, topic: &TopicSpec) -> ProvisionOutcome;
}

#[allow(async_fn_in_trait)]
pub trait MessageProducer {
    /// Resolves once the broker acknowledges the message or the client gives
    /// up retrying it.
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<(), SendError>;

    fn flush(&self, timeout: Duration) -> Result<(), SendError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SendTally {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub provision: ProvisionOutcome,
    pub tally: SendTally,
    pub flushed: bool,
}

impl PublishReport {
    /// Provisioning failed and nothing got through.
    pub fn broker_unavailable(&self) -> bool {
        matches!(self.provision, ProvisionOutcome::Failed(_))
            && self.tally.sent == 0
            && self.tally.failed > 0
    }
}

pub struct Publisher<A, P> {
    admin: Option<A>,
    producer: P,
    topic: TopicSpec,
    flush_timeout: Duration,
}

impl<A: TopicAdmin, P: MessageProducer> Publisher<A, P> {
    pub fn new(admin: Option<A>, producer: P, topic: TopicSpec, flush_timeout: Duration) -> Self {
        Self {
            admin,
            producer,
            topic,
            flush_timeout,
        }
    }

    /// Create the topic if needed. "Already exists" counts as success.
    pub async fn ensure_topic(&self) -> ProvisionOutcome {
        let outcome = match &self.admin {
            Some(admin) => admin.create_topic(&self.topic).await,
            None => ProvisionOutcome::Failed("admin client unavailable".to_string()),
        };
        let topic = self.topic.name.as_str();
        match &outcome {
            ProvisionOutcome::Created => info!(topic, "created topic"),
            ProvisionOutcome::AlreadyExists => info!(topic, "topic already exists"),
            ProvisionOutcome::Failed(reason) => {
                warn!(topic, %reason, "topic provisioning failed, publishing anyway")
            }
        }
        outcome
    }

    /// Send every record in order. A failed send is logged and counted; it
    /// never stops the records after it.
    ///
    /// All sends are queued before any delivery report is awaited, so an
    /// unreachable broker costs one delivery timeout for the whole batch.
    pub async fn send_all(&self, records: &[CleanedRecord]) -> SendTally {
        let producer = &self.producer;
        let topic = self.topic.name.as_str();
        let deliveries = join_all(
            records
                .iter()
                .map(|record| send_record(producer, topic, record)),
        )
        .await;

        records
            .iter()
            .zip(deliveries)
            .fold(SendTally::default(), |mut tally, (record, delivery)| {
                match delivery {
                    Ok(()) => tally.sent += 1,
                    Err(e) => {
                        warn!(title = %record.title, error = %e, "failed to send message");
                        tally.failed += 1;
                    }
                }
                tally
            })
    }

    /// Provision, send, flush, then close the producer.
    #[instrument(level = "info", skip_all, fields(topic = %self.topic.name, records = records.len()))]
    pub async fn publish(self, records: &[CleanedRecord]) -> PublishReport {
        let provision = self.ensure_topic().await;
        let tally = self.send_all(records).await;
        let flushed = match self.producer.flush(self.flush_timeout) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "flush did not complete");
                false
            }
        };
        // dropping the clients closes their connections
        drop(self);

        info!(sent = tally.sent, failed = tally.failed, "produced messages");
        PublishReport {
            provision,
            tally,
            flushed,
        }
    }
}

async fn send_record<P: MessageProducer>(
    producer: &P,
    topic: &str,
    record: &CleanedRecord,
) -> Result<(), SendError> {
    let payload = PublishedMessage::from(record).to_json()?;
    producer.send(topic, &payload).await
}
