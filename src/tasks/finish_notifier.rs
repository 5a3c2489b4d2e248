//! "Time's up!" notification background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::{CountdownController, CountdownEvent};

pub const FINISHED_MESSAGE: &str = "Time's up!";

/// Background task that surfaces a one-shot notification per finished run.
///
/// `notify` is called exactly once for every run that reaches zero. The
/// controller's finished-run count is the source of truth, so a `Finished`
/// event skipped because the task lagged behind is still reported, and never
/// twice. The task ends when the controller is dropped.
pub async fn finish_notifier_task<F>(controller: Arc<CountdownController>, mut notify: F)
where
    F: FnMut(&str),
{
    info!("Starting finish notifier task");

    let mut events = controller.subscribe_events();
    let mut notified = controller.finished_runs();
    // Holding a strong reference would keep the event channel open forever.
    let controller = Arc::downgrade(&controller);

    loop {
        match events.recv().await {
            Ok(CountdownEvent::Finished) => {}
            Ok(event) => {
                debug!("Notifier ignoring {:?}", event);
                continue;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Finish notifier lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Event channel closed, finish notifier exiting");
                break;
            }
        }

        let Some(finished) = controller.upgrade().map(|c| c.finished_runs()) else {
            debug!("Controller dropped, finish notifier exiting");
            break;
        };

        while notified < finished {
            notified += 1;
            info!("{}", FINISHED_MESSAGE);
            notify(FINISHED_MESSAGE);
        }
    }
}
