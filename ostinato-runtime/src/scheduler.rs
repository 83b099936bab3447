use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::schedule::Schedule;
use crate::worker::Worker;

/// Serializing dispatcher for any number of recurring jobs.
///
/// Every registered schedule funnels its runs through one capacity-1
/// channel with a single consumer, so no two jobs execute concurrently,
/// regardless of how many schedules are registered. Construction spawns
/// the consumer loop; each registration spawns one timing loop. All loops
/// run until [`Scheduler::shutdown`].
///
/// A worker that never returns occupies the single consumer forever and
/// starves every other schedule. That is a documented property of this
/// design, not something the scheduler detects or works around.
pub struct Scheduler {
    schedules: Mutex<Vec<Arc<Schedule>>>,
    dispatch_tx: mpsc::Sender<Arc<Schedule>>,
    dispatch_handle: JoinHandle<()>,
    timing_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a scheduler and start its dispatch loop.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        // Capacity 1 is the serialization point: a schedule's push waits
        // until the consumer has drained the previous handoff.
        let (dispatch_tx, dispatch_rx) = mpsc::channel(1);
        let dispatch_handle = tokio::spawn(dispatch_loop(dispatch_rx));
        info!("scheduler started");
        Self {
            schedules: Mutex::new(Vec::new()),
            dispatch_tx,
            dispatch_handle,
            timing_handles: Mutex::new(Vec::new()),
        }
    }

    /// Register a recurring job.
    ///
    /// The worker fires almost immediately, then every `interval`, with
    /// each wait reduced by the time the previous cycle spent waiting and
    /// executing. Returns as soon as the timing loop is spawned; it does
    /// not wait for the first run. A zero `interval` degenerates to
    /// running as fast as the minimal re-arm wait allows.
    pub fn add_schedule<W>(&self, worker: W, interval: Duration)
    where
        W: Worker + 'static,
    {
        self.spawn_schedule(None, Arc::new(worker), interval, Duration::ZERO);
    }

    pub(crate) fn spawn_schedule(
        &self,
        name: Option<String>,
        worker: Arc<dyn Worker>,
        interval: Duration,
        initial_delay: Duration,
    ) {
        let mut schedules = self.schedules.lock().unwrap();
        let name = name.unwrap_or_else(|| format!("schedule-{}", schedules.len()));
        let (schedule, ack_rx) = Schedule::new(name, interval, worker);
        info!(
            job = %schedule.name(),
            interval_ms = interval.as_millis() as u64,
            "schedule registered"
        );
        let handle = tokio::spawn(Arc::clone(&schedule).timing_loop(
            ack_rx,
            self.dispatch_tx.clone(),
            initial_delay,
        ));
        schedules.push(schedule);
        self.timing_handles.lock().unwrap().push(handle);
    }

    /// Registered schedules, in insertion order. Bookkeeping only; the
    /// execution order is driven by the timers.
    pub fn schedules(&self) -> Vec<Arc<Schedule>> {
        self.schedules.lock().unwrap().clone()
    }

    /// Number of registered schedules.
    pub fn schedule_count(&self) -> usize {
        self.schedules.lock().unwrap().len()
    }

    /// Stop every loop this scheduler has spawned.
    ///
    /// Abort-based: pending timers and handoffs are dropped. A worker
    /// already running on the blocking pool is not interrupted; nothing in
    /// this design can cancel in-flight work.
    pub fn shutdown(self) {
        for handle in self.timing_handles.into_inner().unwrap() {
            handle.abort();
        }
        self.dispatch_handle.abort();
        info!("scheduler stopped");
    }
}

/// The single consumer: pops one schedule at a time, runs its worker to
/// completion, then acknowledges that specific schedule. Being the only
/// place jobs execute is what serializes them.
async fn dispatch_loop(mut dispatch_rx: mpsc::Receiver<Arc<Schedule>>) {
    while let Some(schedule) = dispatch_rx.recv().await {
        debug!(job = %schedule.name(), "executing");
        let worker = schedule.worker();
        // Workers are synchronous and may block for a long time, so they
        // run on the blocking pool; awaiting the join keeps execution
        // serialized. A panic surfaces here as a join error.
        if let Err(e) = tokio::task::spawn_blocking(move || worker.perform_work()).await {
            warn!(job = %schedule.name(), "worker panicked: {e}");
        }
        if schedule.confirm().await.is_err() {
            debug!(job = %schedule.name(), "schedule gone before acknowledgment");
        }
    }
    debug!("dispatch channel closed, dispatch loop exiting");
}
