//! Service - owns the configuration, a keyed store and a batch processor.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::ProcessError;
use crate::observability::BatchReport;
use crate::processor::BatchProcessor;
use crate::store::KeyValueStore;
use crate::transform::{Prefix, Transform};

/// Service-layer entry point.
///
/// All state is owned by the instance; two services never share a store.
///
/// ```ignore
/// let svc = Service::new(Config::default());
/// svc.set("answer", json!(42));
/// let results = svc.process(&CancellationToken::new(), ["a", "b", "c"]).await?;
/// ```
pub struct Service<V = Value, T: Transform = Prefix> {
    config: Config,
    store: KeyValueStore<V>,
    processor: BatchProcessor<T>,
}

impl<V: Clone> Service<V, Prefix> {
    pub fn new(config: Config) -> Self {
        Self::with_transform(config, Prefix)
    }
}

impl<V: Clone, T: Transform> Service<V, T> {
    pub fn with_transform(config: Config, transform: T) -> Self {
        let processor = BatchProcessor::new(&config, transform);
        Self {
            config,
            store: KeyValueStore::new(),
            processor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.store.get(key)
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.store.set(key, value);
    }

    pub fn store(&self) -> &KeyValueStore<V> {
        &self.store
    }

    pub async fn process<I, S>(
        &self,
        cancel: &CancellationToken,
        items: I,
    ) -> Result<Vec<String>, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processor.process(cancel, items).await
    }

    pub async fn process_report<I, S>(
        &self,
        cancel: &CancellationToken,
        items: I,
    ) -> Result<BatchReport, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processor.process_report(cancel, items).await
    }
}
