//! Transform - per-item work applied by the batch processor.

use async_trait::async_trait;

use crate::error::TransformError;

/// Work applied to each input item.
///
/// Implementations must not depend on other items' results; the processor
/// runs them concurrently in no particular order.
#[async_trait]
pub trait Transform: Send + Sync + 'static {
    async fn apply(&self, item: &str) -> Result<String, TransformError>;
}

/// Reference transform: `"processed: " + item`. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prefix;

impl Prefix {
    pub const PREFIX: &'static str = "processed: ";
}

#[async_trait]
impl Transform for Prefix {
    async fn apply(&self, item: &str) -> Result<String, TransformError> {
        Ok(format!("{}{item}", Self::PREFIX))
    }
}
