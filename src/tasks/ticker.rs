//! Periodic tick task for a running countdown

use std::{sync::Weak, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::debug;

use crate::state::CountdownController;

/// Drive one countdown run, ticking every `period` starting at `first_tick`.
///
/// The task exits when the controller is dropped, when the run is superseded
/// by a newer generation, or when the countdown finishes.
pub async fn tick_task(
    controller: Weak<CountdownController>,
    generation: u64,
    first_tick: Instant,
    period: Duration,
) {
    debug!("Tick task for run {} started", generation);

    let mut interval = interval_at(first_tick, period);

    loop {
        interval.tick().await;

        let Some(controller) = controller.upgrade() else {
            debug!("Controller dropped, tick task for run {} exiting", generation);
            break;
        };

        if !controller.on_tick(generation) {
            break;
        }
    }

    debug!("Tick task for run {} finished", generation);
}
