//! Countdown controller: owns the clock, the run status and the tick handle

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info, warn};

use super::{ClockField, CountdownState, Status};
use crate::tasks::tick_task;

/// Transitions buffered per event subscriber before it starts lagging
const EVENT_CAPACITY: usize = 64;

/// Whether clock edits are accepted while the countdown is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPolicy {
    /// Edits are rejected while running; allowed when idle, paused or finished
    LockedWhileRunning,
    /// Edits are always applied, leaving the guard to the caller
    Always,
}

/// Status transitions published to event subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownEvent {
    Started,
    Paused,
    Stopped,
    Finished,
}

/// The single live tick task together with the run it belongs to
#[derive(Debug)]
struct TickHandle {
    generation: u64,
    task: JoinHandle<()>,
}

#[derive(Debug)]
struct Inner {
    state: CountdownState,
    ticker: Option<TickHandle>,
    /// Bumped every time a tick is started or cancelled
    generation: u64,
    /// Runs that reached zero since the controller was created
    finished_runs: u64,
}

impl Inner {
    /// Abort the active tick, if any, and invalidate ticks already in flight
    fn cancel_tick(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!("Cancelling tick for run {}", ticker.generation);
            ticker.task.abort();
        }
        self.generation += 1;
    }
}

/// Countdown controller shared between the tick task and its observers
#[derive(Debug)]
pub struct CountdownController {
    inner: Mutex<Inner>,
    tick_period: Duration,
    edit_policy: EditPolicy,
    /// Latest snapshot, pushed on every change
    update_tx: watch::Sender<CountdownState>,
    /// Status transitions
    event_tx: broadcast::Sender<CountdownEvent>,
}

impl CountdownController {
    /// Create an idle controller with a zero clock
    pub fn new(tick_period: Duration, edit_policy: EditPolicy) -> Self {
        let (update_tx, _) = watch::channel(CountdownState::new());
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Mutex::new(Inner {
                state: CountdownState::new(),
                ticker: None,
                generation: 0,
                finished_runs: 0,
            }),
            tick_period,
            edit_policy,
            update_tx,
            event_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Countdown state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn publish(&self, state: CountdownState) {
        self.update_tx.send_replace(state);
    }

    fn emit(&self, event: CountdownEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("No event subscribers for {:?}", event);
        }
    }

    /// Subscribe to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.update_tx.subscribe()
    }

    /// Subscribe to status transitions
    pub fn subscribe_events(&self) -> broadcast::Receiver<CountdownEvent> {
        self.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> CountdownState {
        self.lock().state
    }

    pub fn hours(&self) -> u8 {
        self.snapshot().hours
    }

    pub fn minutes(&self) -> u8 {
        self.snapshot().minutes
    }

    pub fn seconds(&self) -> u8 {
        self.snapshot().seconds
    }

    pub fn status(&self) -> Status {
        self.snapshot().status
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.snapshot().is_paused()
    }

    pub fn is_finished(&self) -> bool {
        self.snapshot().is_finished()
    }

    /// Number of runs that have reached zero so far
    pub fn finished_runs(&self) -> u64 {
        self.lock().finished_runs
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn edit_policy(&self) -> EditPolicy {
        self.edit_policy
    }

    /// Apply an edit to one field under the lock, honoring the edit policy
    fn edit<F>(&self, field: ClockField, value: F) -> bool
    where
        F: FnOnce(i64) -> i64,
    {
        let mut inner = self.lock();
        if self.edit_policy == EditPolicy::LockedWhileRunning && inner.state.is_running() {
            debug!("Ignoring {} edit while running", field);
            return false;
        }

        let next = value(inner.state.field(field) as i64);
        inner.state.set_field(field, next);
        debug!("Set {} to {}", field, inner.state.field(field));
        self.publish(inner.state);
        true
    }

    /// Set a clock field with wrap-around. Returns `false` if the edit was
    /// rejected because the countdown is running.
    pub fn set_field(&self, field: ClockField, value: i64) -> bool {
        self.edit(field, |_| value)
    }

    /// Scroll a wheel by `delta` from its current value
    pub fn nudge(&self, field: ClockField, delta: i64) -> bool {
        self.edit(field, |current| current.saturating_add(delta))
    }

    pub fn set_hours(&self, value: i64) -> bool {
        self.set_field(ClockField::Hours, value)
    }

    pub fn set_minutes(&self, value: i64) -> bool {
        self.set_field(ClockField::Minutes, value)
    }

    pub fn set_seconds(&self, value: i64) -> bool {
        self.set_field(ClockField::Seconds, value)
    }

    /// Start or resume the countdown from the current clock value.
    ///
    /// A zero clock is a no-op. Any active tick is cancelled before the new
    /// one is spawned, so there is never more than one. Must be called from
    /// within a tokio runtime.
    pub fn start(self: &Arc<Self>) -> CountdownState {
        let mut inner = self.lock();
        if inner.state.is_zero() {
            debug!("Ignoring start with a zero clock");
            return inner.state;
        }

        inner.cancel_tick();
        let generation = inner.generation;
        let first_tick = Instant::now() + self.tick_period;
        let task = tokio::spawn(tick_task(
            Arc::downgrade(self),
            generation,
            first_tick,
            self.tick_period,
        ));
        inner.ticker = Some(TickHandle { generation, task });
        inner.state.status = Status::Running;

        info!("Countdown started at {}", inner.state);
        self.publish(inner.state);
        self.emit(CountdownEvent::Started);
        inner.state
    }

    /// Pause a running countdown, keeping the clock value
    pub fn pause(&self) -> CountdownState {
        let mut inner = self.lock();
        if !inner.state.is_running() {
            debug!("Ignoring pause while {:?}", inner.state.status);
            return inner.state;
        }

        inner.cancel_tick();
        inner.state.status = Status::Paused;

        info!("Countdown paused at {}", inner.state);
        self.publish(inner.state);
        self.emit(CountdownEvent::Paused);
        inner.state
    }

    /// Cancel the countdown and reset the clock to zero
    pub fn stop(&self) -> CountdownState {
        let mut inner = self.lock();
        inner.cancel_tick();
        inner.state.clear_clock();
        inner.state.status = Status::Idle;

        info!("Countdown stopped");
        self.publish(inner.state);
        self.emit(CountdownEvent::Stopped);
        inner.state
    }

    /// Apply one tick for the run identified by `generation`.
    ///
    /// Returns `false` when the tick task should exit: the run is stale or
    /// the countdown just finished.
    pub(crate) fn on_tick(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation || !inner.state.is_running() {
            debug!("Dropping stale tick for run {}", generation);
            return false;
        }

        if !inner.state.decrement() {
            debug!("Tick: {}", inner.state);
            self.publish(inner.state);
            return true;
        }

        // The handle belongs to the task running this tick, so it is detached
        // rather than aborted.
        inner.ticker = None;
        inner.generation += 1;
        inner.finished_runs += 1;
        inner.state.clear_clock();
        inner.state.status = Status::Finished;

        info!("Countdown finished");
        self.publish(inner.state);
        self.emit(CountdownEvent::Finished);
        false
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.lock().generation
    }

    #[cfg(test)]
    fn has_ticker(&self) -> bool {
        self.lock().ticker.is_some()
    }
}

impl Default for CountdownController {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), EditPolicy::LockedWhileRunning)
    }
}

impl Drop for CountdownController {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(ticker) = inner.ticker.take() {
            ticker.task.abort();
        }
    }
}
