//! Batch processor: bounded-concurrency fan-out over string items.
//!
//! Every item becomes one unit of work. A unit runs the [`Transform`], then
//! appends its output to a result collection shared by the batch. At most
//! `concurrency` units run the transform at any instant, and the batch returns
//! only once every unit is done.
//!
//! Two admission strategies share that contract:
//! - [`Admission::PerItem`]: one task per item, gated by a counting semaphore
//! - [`Admission::Pooled`]: a fixed set of workers draining a shared queue

mod per_item;
mod pooled;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::{Admission, Config};
use crate::error::ProcessError;
use crate::observability::{BatchId, BatchReport, InFlight};
use crate::transform::Transform;

type UnitSet = JoinSet<Result<(), ProcessError>>;

pub struct BatchProcessor<T: Transform> {
    concurrency: NonZeroUsize,
    admission: Admission,
    transform: Arc<T>,
}

impl<T: Transform> BatchProcessor<T> {
    pub fn new(config: &Config, transform: T) -> Self {
        Self {
            concurrency: config.concurrency,
            admission: config.admission,
            transform: Arc::new(transform),
        }
    }

    pub fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    pub fn admission(&self) -> Admission {
        self.admission
    }

    /// Transform every item and return the outputs in completion order.
    ///
    /// `cancel` is accepted but not observed: a batch always runs until every
    /// unit has finished or the first one fails.
    pub async fn process<I, S>(
        &self,
        cancel: &CancellationToken,
        items: I,
    ) -> Result<Vec<String>, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let report = self.process_report(cancel, items).await?;
        Ok(report.results)
    }

    /// Like [`process`](Self::process), but also returns the batch id, the
    /// peak number of concurrently running transforms and the elapsed time.
    pub async fn process_report<I, S>(
        &self,
        _cancel: &CancellationToken,
        items: I,
    ) -> Result<BatchReport, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let batch_id = BatchId::generate();
        let span = info_span!("batch", %batch_id);

        self.run(batch_id, items).instrument(span).await
    }

    async fn run(&self, batch_id: BatchId, items: Vec<String>) -> Result<BatchReport, ProcessError> {
        let started = Instant::now();
        let count = items.len();
        info!(
            items = count,
            concurrency = self.concurrency.get(),
            admission = ?self.admission,
            "batch started"
        );

        let shared = Shared::new(Arc::clone(&self.transform), count);
        if count > 0 {
            let mut units = JoinSet::new();
            match self.admission {
                Admission::PerItem => per_item::spawn(&mut units, items, self.concurrency, &shared),
                Admission::Pooled => pooled::spawn(&mut units, items, self.concurrency, &shared),
            }
            join_all(units).await?;
        }

        let results = shared.take_results().await;
        debug_assert_eq!(results.len(), count);

        let report = BatchReport {
            batch_id,
            admission: self.admission,
            items: count,
            results,
            peak_in_flight: shared.in_flight.peak(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            results = report.results.len(),
            peak_in_flight = report.peak_in_flight,
            elapsed_ms = report.elapsed_ms,
            "batch finished"
        );
        Ok(report)
    }
}

/// State shared by every unit of one batch.
struct Shared<T> {
    transform: Arc<T>,
    results: Arc<Mutex<Vec<String>>>,
    in_flight: InFlight,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            transform: Arc::clone(&self.transform),
            results: Arc::clone(&self.results),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<T: Transform> Shared<T> {
    fn new(transform: Arc<T>, capacity: usize) -> Self {
        Self {
            transform,
            results: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            in_flight: InFlight::default(),
        }
    }

    /// Run the transform for one item and append exactly one result.
    async fn run_unit(&self, item: String) -> Result<(), ProcessError> {
        let output = {
            let _running = self.in_flight.enter();
            match self.transform.apply(&item).await {
                Ok(output) => output,
                Err(source) => return Err(ProcessError::Transform { item, source }),
            }
        };

        self.results.lock().await.push(output);
        debug!(item = %item, "unit appended");
        Ok(())
    }

    async fn take_results(&self) -> Vec<String> {
        std::mem::take(&mut *self.results.lock().await)
    }
}

/// Wait for every unit. The first failure aborts the rest.
async fn join_all(mut units: UnitSet) -> Result<(), ProcessError> {
    while let Some(joined) = units.join_next().await {
        let err = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => err,
            Err(join_err) => panicked(join_err),
        };

        warn!(error = %err, pending = units.len(), "aborting batch");
        units.shutdown().await;
        return Err(err);
    }
    Ok(())
}

fn panicked(err: JoinError) -> ProcessError {
    ProcessError::TaskPanicked(err.to_string())
}
