//! fanout-core
//!
//! In-memory keyed store plus a bounded-concurrency fan-out processor.
//!
//! - **config**: `Config` (timeout, retries, concurrency, admission strategy)
//! - **store**: `KeyValueStore<V>`, one reader/writer lock over the whole map
//! - **transform**: `Transform` trait and the reference `Prefix` transform
//! - **processor**: `BatchProcessor`, one unit per item under a concurrency cap
//! - **service**: `Service`, owns a store and a processor
//! - **observability**: batch ids and per-batch reports
//! - **error**: error types

pub mod config;
pub mod error;
pub mod observability;
pub mod processor;
pub mod service;
pub mod store;
pub mod transform;

pub use config::{Admission, Config};
pub use error::{ConfigError, ProcessError, TransformError};
pub use observability::{BatchId, BatchReport};
pub use processor::BatchProcessor;
pub use service::Service;
pub use store::KeyValueStore;
pub use transform::{Prefix, Transform};
