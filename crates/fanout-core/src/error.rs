use thiserror::Error;

/// Failure of a single transformation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    /// A transformation failed; the rest of the batch was aborted.
    #[error("transform failed for item={item}: {source}")]
    Transform {
        item: String,
        #[source]
        source: TransformError,
    },

    #[error("task panicked: {0}")]
    TaskPanicked(String),

    #[error("admission pool closed")]
    AdmissionClosed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config read: {0}")]
    Io(#[from] std::io::Error),
}
