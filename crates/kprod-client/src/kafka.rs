//! Kafka broker implementation on top of `rskafka`.
//!
//! A session is one `rskafka` client plus a cache of partition clients. Each
//! publish is a single produce request with one record, acknowledged before
//! the call returns. Both connecting and publishing are bounded by
//! [`OPERATION_TIMEOUT`].

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use kprod_core::ConnectionSettings;
use rand::Rng;
use rskafka::{
    client::{
        Client, ClientBuilder,
        partition::{Compression, PartitionClient, UnknownTopicHandling},
    },
    record::Record,
};
use tokio::{sync::Mutex, time::timeout};

use crate::{
    broker::{Broker, Delivery, OPERATION_TIMEOUT, PublishRequest, Session, SessionHandle},
    error::{ConnectError, PublishError},
    partition,
    tls::build_transport_security,
};

/// [`Broker`] that opens real Kafka connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct KafkaBroker;

impl KafkaBroker {
    /// Create the broker.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Broker for KafkaBroker {
    async fn open(&self, settings: &ConnectionSettings) -> Result<SessionHandle, ConnectError> {
        settings.validate_for_connect()?;
        let brokers = settings.brokers_field();

        let mut builder = ClientBuilder::new(settings.brokers.clone());
        if settings.use_auth {
            let tls =
                build_transport_security(&settings.cert_path, &settings.key_path, &settings.ca_path)?;
            builder = builder.tls_config(tls);
        }

        let client = timeout(OPERATION_TIMEOUT, builder.build())
            .await
            .map_err(|_| ConnectError::Timeout { brokers: brokers.clone(), after: OPERATION_TIMEOUT })?
            .map_err(|e| ConnectError::Broker { brokers: brokers.clone(), reason: e.to_string() })?;

        tracing::info!(%brokers, tls = settings.use_auth, "kafka client connected");
        Ok(Arc::new(KafkaSession::new(client, brokers)))
    }
}

/// Open connection to a Kafka cluster.
pub struct KafkaSession {
    brokers: String,
    inner: Mutex<Option<Inner>>,
}

struct Inner {
    client: Arc<Client>,
    partitions: HashMap<(String, i32), Arc<PartitionClient>>,
}

impl KafkaSession {
    fn new(client: Client, brokers: String) -> Self {
        Self {
            brokers,
            inner: Mutex::new(Some(Inner { client: Arc::new(client), partitions: HashMap::new() })),
        }
    }

    async fn client(&self) -> Result<Arc<Client>, PublishError> {
        let inner = self.inner.lock().await;
        inner.as_ref().map(|i| Arc::clone(&i.client)).ok_or(PublishError::Closed)
    }

    async fn partition_count(&self, client: &Client, topic: &str) -> Result<i32, PublishError> {
        let topics = client.list_topics().await.map_err(|e| broker_err(topic, &e))?;
        let found = topics
            .into_iter()
            .find(|t| t.name == topic)
            .ok_or_else(|| PublishError::UnknownTopic { topic: topic.to_string() })?;

        let count = i32::try_from(found.partitions.len()).unwrap_or(i32::MAX);
        if count == 0 {
            return Err(PublishError::NoPartitions { topic: topic.to_string() });
        }
        Ok(count)
    }

    async fn partition_client(
        &self,
        client: &Client,
        topic: &str,
        partition: i32,
    ) -> Result<Arc<PartitionClient>, PublishError> {
        let cache_key = (topic.to_string(), partition);
        if let Some(cached) =
            self.inner.lock().await.as_ref().and_then(|i| i.partitions.get(&cache_key).cloned())
        {
            return Ok(cached);
        }

        let fresh = Arc::new(
            client
                .partition_client(topic.to_string(), partition, UnknownTopicHandling::Error)
                .await
                .map_err(|e| broker_err(topic, &e))?,
        );

        let mut inner = self.inner.lock().await;
        let inner = inner.as_mut().ok_or(PublishError::Closed)?;
        inner.partitions.insert(cache_key, Arc::clone(&fresh));
        Ok(fresh)
    }

    async fn publish_inner(&self, request: PublishRequest) -> Result<Delivery, PublishError> {
        let client = self.client().await?;
        let topic = request.topic.as_str();

        let count = self.partition_count(&client, topic).await?;
        let partition = match request.key.as_deref() {
            Some(key) => partition::for_key(key, count)
                .ok_or_else(|| PublishError::NoPartitions { topic: topic.to_string() })?,
            None => rand::rng().random_range(0..count),
        };

        let partition_client = self.partition_client(&client, topic, partition).await?;
        let record = Record {
            key: request.key,
            value: Some(request.value),
            headers: BTreeMap::new(),
            timestamp: Utc::now(),
        };

        let offsets = partition_client
            .produce(vec![record], Compression::NoCompression)
            .await
            .map_err(|e| broker_err(topic, &e))?;
        let offset = offsets.first().copied().ok_or_else(|| PublishError::Broker {
            topic: topic.to_string(),
            reason: "broker returned no offset".to_string(),
        })?;

        Ok(Delivery { partition, offset })
    }
}

#[async_trait]
impl Session for KafkaSession {
    async fn publish(&self, request: PublishRequest) -> Result<Delivery, PublishError> {
        let topic = request.topic.clone();
        let delivery = timeout(OPERATION_TIMEOUT, self.publish_inner(request))
            .await
            .map_err(|_| PublishError::Timeout { topic: topic.clone(), after: OPERATION_TIMEOUT })??;

        tracing::debug!(%topic, partition = delivery.partition, offset = delivery.offset, "published");
        Ok(delivery)
    }

    async fn close(&self) {
        if self.inner.lock().await.take().is_some() {
            tracing::info!(brokers = %self.brokers, "kafka session closed");
        }
    }
}

impl fmt::Debug for KafkaSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaSession").field("brokers", &self.brokers).finish_non_exhaustive()
    }
}

fn broker_err(topic: &str, err: &rskafka::client::error::Error) -> PublishError {
    PublishError::Broker { topic: topic.to_string(), reason: err.to_string() }
}
