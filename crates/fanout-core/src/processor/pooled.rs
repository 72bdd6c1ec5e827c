use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{Instrument, debug};

use super::{Shared, UnitSet};
use crate::error::ProcessError;
use crate::transform::Transform;

/// Spawn `min(concurrency, items)` workers that pop from a shared queue until
/// it drains. The worker count is the admission bound, so pending items sit in
/// the queue instead of as parked tasks.
pub(super) fn spawn<T: Transform>(
    units: &mut UnitSet,
    items: Vec<String>,
    concurrency: NonZeroUsize,
    shared: &Shared<T>,
) {
    let workers = concurrency.get().min(items.len());
    let queue = Arc::new(Mutex::new(VecDeque::from(items)));

    for worker_id in 0..workers {
        let queue = Arc::clone(&queue);
        let shared = shared.clone();

        units.spawn(
            async move {
                let mut handled = 0usize;
                loop {
                    // guard is released before the transform runs
                    let Some(item) = queue.lock().await.pop_front() else {
                        break;
                    };
                    shared.run_unit(item).await?;
                    handled += 1;
                }
                debug!(worker_id, handled, "worker drained queue");
                Ok::<(), ProcessError>(())
            }
            .in_current_span(),
        );
    }
}
