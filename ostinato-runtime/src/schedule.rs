use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::debug;

use crate::worker::Worker;

/// Acknowledgment sent from the dispatch loop back to the schedule whose
/// run just finished.
pub(crate) struct Completion;

/// Smallest wait the timer is ever re-armed with. Used instead of a zero
/// or negative duration when execution has already eaten the whole
/// interval, so an overrunning job runs back-to-back instead of stalling.
pub(crate) const MIN_WAIT: Duration = Duration::from_nanos(1);

/// One recurring job: its interval, a handle to its worker, and the
/// private channel through which the dispatch loop confirms completion.
///
/// Created by registration; its timing loop runs until the owning
/// [`Scheduler`](crate::Scheduler) is shut down.
pub struct Schedule {
    name: String,
    interval: Duration,
    worker: Arc<dyn Worker>,
    ack_tx: mpsc::Sender<Completion>,
}

impl Schedule {
    pub(crate) fn new(
        name: String,
        interval: Duration,
        worker: Arc<dyn Worker>,
    ) -> (Arc<Self>, mpsc::Receiver<Completion>) {
        // Capacity 1 is enough: the handshake strictly alternates between
        // one dispatch and one acknowledgment.
        let (ack_tx, ack_rx) = mpsc::channel(1);
        let schedule = Arc::new(Self {
            name,
            interval,
            worker,
            ack_tx,
        });
        (schedule, ack_rx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn worker(&self) -> Arc<dyn Worker> {
        Arc::clone(&self.worker)
    }

    /// Confirm to this schedule that its current run has finished.
    pub(crate) async fn confirm(&self) -> Result<(), mpsc::error::SendError<Completion>> {
        self.ack_tx.send(Completion).await
    }

    /// The timing loop: sleep, push this schedule onto the shared dispatch
    /// channel, wait for the acknowledgment, re-arm with whatever is left
    /// of the interval.
    ///
    /// `start` is taken before the dispatch send, so time spent blocked on
    /// a busy consumer counts against the next wait just like execution
    /// time does. The send itself provides the backpressure: it completes
    /// only once the channel has room, and this loop never has more than
    /// one dispatch outstanding because it does not re-arm until the
    /// acknowledgment arrives.
    pub(crate) async fn timing_loop(
        self: Arc<Self>,
        mut ack_rx: mpsc::Receiver<Completion>,
        dispatch_tx: mpsc::Sender<Arc<Schedule>>,
        initial_delay: Duration,
    ) {
        let mut wait = if initial_delay.is_zero() {
            MIN_WAIT
        } else {
            initial_delay
        };
        loop {
            tokio::time::sleep(wait).await;
            let start = Instant::now();
            if dispatch_tx.send(Arc::clone(&self)).await.is_err() {
                debug!(job = %self.name, "dispatch channel closed, stopping timing loop");
                return;
            }
            if ack_rx.recv().await.is_none() {
                debug!(job = %self.name, "acknowledgment channel closed, stopping timing loop");
                return;
            }
            let elapsed = start.elapsed();
            wait = next_wait(self.interval, elapsed);
            debug!(
                job = %self.name,
                elapsed_ms = elapsed.as_millis() as u64,
                next_wait_ms = wait.as_millis() as u64,
                "run confirmed, timer re-armed"
            );
        }
    }
}

/// Remaining wait once `elapsed` of the interval has already been spent
/// waiting and executing. Clamped to [`MIN_WAIT`] when nothing is left.
pub(crate) fn next_wait(interval: Duration, elapsed: Duration) -> Duration {
    match interval.checked_sub(elapsed) {
        Some(rest) if !rest.is_zero() => rest,
        _ => MIN_WAIT,
    }
}
