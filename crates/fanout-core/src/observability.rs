//! Batch ids, in-flight accounting and the per-batch report.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::config::Admission;

/// Identifies one batch invocation in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(Ulid);

impl BatchId {
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of one finished batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: BatchId,
    pub admission: Admission,
    pub items: usize,
    /// Completion order, not input order.
    pub results: Vec<String>,
    /// Highest number of transformations observed running at once.
    pub peak_in_flight: usize,
    pub elapsed_ms: u64,
}

/// Counts running transformations and remembers the peak.
#[derive(Debug, Clone, Default)]
pub(crate) struct InFlight {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    pub(crate) fn enter(&self) -> InFlightGuard {
        let now = self.inner.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    pub(crate) fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }
}

/// Decrements the running count on drop, including on panic.
pub(crate) struct InFlightGuard {
    inner: Arc<Counters>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_tracks_peak() {
        let gauge = InFlight::default();
        let a = gauge.enter();
        let b = gauge.enter();
        drop(a);
        let c = gauge.enter();
        drop(b);
        drop(c);
        assert_eq!(gauge.peak(), 2);
        assert_eq!(gauge.inner.current.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn report_serializes_batch_id_as_string() {
        let report = BatchReport {
            batch_id: BatchId::generate(),
            admission: Admission::Pooled,
            items: 0,
            results: vec![],
            peak_in_flight: 0,
            elapsed_ms: 0,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["batch_id"], report.batch_id.to_string());
        assert_eq!(value["admission"], "pooled");
    }
}
