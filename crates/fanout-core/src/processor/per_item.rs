use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{Instrument, debug};

use super::{Shared, UnitSet};
use crate::error::ProcessError;
use crate::transform::Transform;

/// Spawn one task per item. Each task waits for a semaphore slot before it
/// runs, and the permit is released when the task ends, success or not.
pub(super) fn spawn<T: Transform>(
    units: &mut UnitSet,
    items: Vec<String>,
    concurrency: NonZeroUsize,
    shared: &Shared<T>,
) {
    let slots = Arc::new(Semaphore::new(concurrency.get().min(Semaphore::MAX_PERMITS)));

    for item in items {
        let slots = Arc::clone(&slots);
        let shared = shared.clone();

        units.spawn(
            async move {
                let _permit = slots
                    .acquire_owned()
                    .await
                    .map_err(|_| ProcessError::AdmissionClosed)?;
                debug!(item = %item, "unit admitted");
                shared.run_unit(item).await
            }
            .in_current_span(),
        );
    }
}
