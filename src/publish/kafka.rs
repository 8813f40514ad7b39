// src/publish/kafka.rs
use std::time::Duration;

use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::error::{KafkaResult, RDKafkaErrorCode};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tracing::{debug, warn};

use super::{MessageProducer, ProvisionOutcome, Publisher, TopicAdmin, TopicSpec};
use crate::config::BrokerConfig;
use crate::error::SendError;

pub type KafkaPublisher = Publisher<KafkaAdmin, KafkaProducer>;

impl KafkaPublisher {
    /// Build the admin and producer clients.
    ///
    /// An admin client that cannot be created only disables provisioning;
    /// a producer that cannot be created means there is nothing to publish with.
    pub fn connect(cfg: &BrokerConfig) -> KafkaResult<Self> {
        let admin = match KafkaAdmin::connect(cfg) {
            Ok(admin) => Some(admin),
            Err(e) => {
                warn!(error = %e, "admin client unavailable, skipping topic provisioning");
                None
            }
        };
        let producer = KafkaProducer::connect(cfg)?;
        Ok(Publisher::new(
            admin,
            producer,
            TopicSpec::from(cfg),
            cfg.flush_timeout,
        ))
    }
}

pub struct KafkaAdmin {
    client: AdminClient<DefaultClientContext>,
    options: AdminOptions,
}

impl KafkaAdmin {
    pub fn connect(cfg: &BrokerConfig) -> KafkaResult<Self> {
        let client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &cfg.bootstrap_servers)
            .create()?;
        let options = AdminOptions::new().request_timeout(Some(cfg.admin_timeout));
        Ok(Self { client, options })
    }
}

impl TopicAdmin for KafkaAdmin {
    async fn create_topic(&self, topic: &TopicSpec) -> ProvisionOutcome {
        let new_topic = NewTopic::new(
            &topic.name,
            topic.partitions,
            TopicReplication::Fixed(topic.replication_factor),
        );
        match self.client.create_topics([&new_topic], &self.options).await {
            Ok(results) => match results.into_iter().next() {
                Some(Ok(name)) => {
                    debug!(topic = %name, "broker accepted topic");
                    ProvisionOutcome::Created
                }
                Some(Err((_, RDKafkaErrorCode::TopicAlreadyExists))) => {
                    ProvisionOutcome::AlreadyExists
                }
                Some(Err((name, code))) => ProvisionOutcome::Failed(format!("{name}: {code}")),
                None => ProvisionOutcome::Failed("broker returned no topic result".to_string()),
            },
            Err(e) => ProvisionOutcome::Failed(e.to_string()),
        }
    }
}

pub struct KafkaProducer {
    inner: FutureProducer,
    queue_timeout: Duration,
}

impl KafkaProducer {
    /// The client retries transient delivery failures `send_retries` times
    /// within `message_timeout` before reporting the message as failed.
    pub fn connect(cfg: &BrokerConfig) -> KafkaResult<Self> {
        let inner: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &cfg.bootstrap_servers)
            .set("message.send.max.retries", cfg.send_retries.to_string())
            .set("message.timeout.ms", cfg.message_timeout.as_millis().to_string())
            .create()?;
        Ok(Self {
            inner,
            queue_timeout: cfg.message_timeout,
        })
    }
}

impl MessageProducer for KafkaProducer {
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<(), SendError> {
        let record = FutureRecord::<(), [u8]>::to(topic).payload(payload);
        self.inner
            .send(record, Timeout::After(self.queue_timeout))
            .await
            .map(|_| ())
            .map_err(|(e, _)| SendError::Delivery(e))
    }

    fn flush(&self, timeout: Duration) -> Result<(), SendError> {
        Producer::flush(&self.inner, Timeout::After(timeout)).map_err(SendError::Delivery)
    }
}
