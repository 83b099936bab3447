//! End-to-end tests against the public scheduler surface, driven by the
//! real clock. Timing assertions use generous tolerances so they hold on
//! loaded machines.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use config::Config;
use ostinato_runtime::{JobSpec, Scheduler, SchedulerBuilder, Worker};

/// Worker that sleeps a scripted duration per run and records the
/// wall-clock window of every run into a shared log.
struct RecordingWorker {
    durations: Vec<Duration>,
    runs: Arc<Mutex<Vec<(Instant, Instant)>>>,
    counter: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: Arc<AtomicUsize>,
}

impl RecordingWorker {
    fn new(durations: Vec<Duration>, runs: Arc<Mutex<Vec<(Instant, Instant)>>>) -> Self {
        Self {
            durations,
            runs,
            counter: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn max_in_flight(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.max_in_flight)
    }
}

impl Worker for RecordingWorker {
    fn perform_work(&self) {
        let entered = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(entered, Ordering::SeqCst);

        let idx = self.counter.fetch_add(1, Ordering::SeqCst);
        let duration = self
            .durations
            .get(idx)
            .or_else(|| self.durations.last())
            .copied()
            .unwrap_or(Duration::ZERO);

        let start = Instant::now();
        std::thread::sleep(duration);
        self.runs.lock().unwrap().push((start, Instant::now()));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn wait_until<F>(cond: F, timeout: Duration, what: &str)
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}

fn starts(runs: &Arc<Mutex<Vec<(Instant, Instant)>>>) -> Vec<Instant> {
    runs.lock().unwrap().iter().map(|(s, _)| *s).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn first_run_fires_immediately_regardless_of_interval() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);

    let scheduler = Scheduler::new();
    scheduler.add_schedule(
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
        Duration::from_secs(3_600),
    );

    wait_until(
        || count.load(Ordering::SeqCst) == 1,
        Duration::from_secs(1),
        "first run of an hourly schedule",
    )
    .await;
    scheduler.shutdown();
}

/// With interval 300ms and run durations 75/150/15ms, the compensating
/// re-arm keeps the start-to-start spacing at one interval: the wait
/// shrinks by exactly what the previous cycle consumed. A fixed-delay
/// loop would space runs at interval + duration instead.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn start_to_start_spacing_holds_at_the_interval() {
    let interval = Duration::from_millis(300);
    let runs = Arc::new(Mutex::new(Vec::new()));
    let worker = RecordingWorker::new(
        vec![
            Duration::from_millis(75),
            Duration::from_millis(150),
            Duration::from_millis(15),
        ],
        Arc::clone(&runs),
    );

    let scheduler = Scheduler::new();
    scheduler.add_schedule(worker, interval);

    wait_until(
        || runs.lock().unwrap().len() >= 4,
        Duration::from_secs(3),
        "four compensated runs",
    )
    .await;
    scheduler.shutdown();

    let starts = starts(&runs);
    for pair in starts.windows(2).take(3) {
        let spacing = pair[1] - pair[0];
        let drift = if spacing > interval {
            spacing - interval
        } else {
            interval - spacing
        };
        assert!(
            drift <= Duration::from_millis(100),
            "start-to-start spacing {spacing:?} strayed from the {interval:?} interval"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn jobs_from_different_schedules_never_overlap() {
    let runs = Arc::new(Mutex::new(Vec::new()));

    let scheduler = Scheduler::new();
    for _ in 0..3 {
        scheduler.add_schedule(
            RecordingWorker::new(vec![Duration::from_millis(25)], Arc::clone(&runs)),
            Duration::from_millis(40),
        );
    }

    wait_until(
        || runs.lock().unwrap().len() >= 9,
        Duration::from_secs(3),
        "nine serialized runs",
    )
    .await;
    scheduler.shutdown();

    let mut windows = runs.lock().unwrap().clone();
    windows.sort_by_key(|(start, _)| *start);
    for pair in windows.windows(2) {
        let (_, prev_end) = pair[0];
        let (next_start, _) = pair[1];
        assert!(
            next_start >= prev_end,
            "two runs overlapped: one ended at {prev_end:?}, the next started at {next_start:?}"
        );
    }
}

/// Duration 300ms against a 50ms interval: the computed wait is negative
/// every cycle, so the clamp re-arms with the minimal wait and runs land
/// back-to-back. The same worker also proves a schedule never has two
/// runs in flight, however badly it overruns.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overrunning_job_reruns_back_to_back_without_duplicate_dispatch() {
    let runs = Arc::new(Mutex::new(Vec::new()));
    let worker = RecordingWorker::new(vec![Duration::from_millis(300)], Arc::clone(&runs));
    let max_in_flight = worker.max_in_flight();

    let scheduler = Scheduler::new();
    scheduler.add_schedule(worker, Duration::from_millis(50));

    wait_until(
        || runs.lock().unwrap().len() >= 3,
        Duration::from_secs(3),
        "three back-to-back runs",
    )
    .await;
    scheduler.shutdown();

    assert_eq!(
        max_in_flight.load(Ordering::SeqCst),
        1,
        "a single schedule had two runs in flight"
    );

    let starts = starts(&runs);
    for pair in starts.windows(2).take(2) {
        let spacing = pair[1] - pair[0];
        assert!(
            spacing >= Duration::from_millis(295),
            "runs overlapped or clocks ran backwards: spacing {spacing:?}"
        );
        // Well under duration + interval, which is where an uncompensated
        // fixed-delay loop would land.
        assert!(
            spacing <= Duration::from_millis(340),
            "overrunning job was not re-armed back-to-back: spacing {spacing:?}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn zero_interval_runs_at_clamp_speed() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);

    let scheduler = Scheduler::new();
    scheduler.add_schedule(
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
        Duration::ZERO,
    );

    wait_until(
        || count.load(Ordering::SeqCst) >= 5,
        Duration::from_secs(2),
        "five clamp-speed runs",
    )
    .await;
    scheduler.shutdown();
}

/// A job that does not return occupies the single consumer, so every
/// other schedule stops firing for as long as it runs. This is the
/// documented cost of strict serialization, reproduced on purpose.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stalled_job_starves_every_other_schedule() {
    let blocked = Arc::new(AtomicUsize::new(0));
    let b = Arc::clone(&blocked);
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);

    let scheduler = Scheduler::new();
    // Stand-in for a job that never returns: long enough to span the
    // whole observation window.
    scheduler.add_schedule(
        move || {
            b.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(1_500));
        },
        Duration::from_millis(25),
    );
    scheduler.add_schedule(
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
        Duration::from_millis(25),
    );

    tokio::time::sleep(Duration::from_millis(400)).await;
    let seen_early = count.load(Ordering::SeqCst);
    assert!(
        seen_early <= 2,
        "fast schedule kept firing while the consumer was stalled: {seen_early} runs"
    );

    tokio::time::sleep(Duration::from_millis(600)).await;
    let seen_late = count.load(Ordering::SeqCst);
    assert_eq!(
        seen_early, seen_late,
        "fast schedule fired during the stall window"
    );
    assert_eq!(blocked.load(Ordering::SeqCst), 1);

    scheduler.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn panicking_worker_keeps_its_schedule_and_the_dispatch_loop_alive() {
    let first = Arc::new(AtomicBool::new(true));
    let after_panic = Arc::new(AtomicUsize::new(0));
    let other = Arc::new(AtomicUsize::new(0));

    let f = Arc::clone(&first);
    let a = Arc::clone(&after_panic);
    let o = Arc::clone(&other);

    let scheduler = Scheduler::new();
    scheduler.add_schedule(
        move || {
            if f.swap(false, Ordering::SeqCst) {
                panic!("worker blew up on its first run");
            }
            a.fetch_add(1, Ordering::SeqCst);
        },
        Duration::from_millis(40),
    );
    scheduler.add_schedule(
        move || {
            o.fetch_add(1, Ordering::SeqCst);
        },
        Duration::from_millis(40),
    );

    wait_until(
        || after_panic.load(Ordering::SeqCst) >= 2 && other.load(Ordering::SeqCst) >= 2,
        Duration::from_secs(2),
        "both schedules running after the panic",
    )
    .await;
    scheduler.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn registration_from_multiple_tasks_is_safe() {
    let scheduler = Arc::new(Scheduler::new());

    let mut handles = Vec::new();
    for _ in 0..4 {
        let scheduler = Arc::clone(&scheduler);
        handles.push(tokio::spawn(async move {
            for _ in 0..5 {
                scheduler.add_schedule(|| {}, Duration::from_secs(3_600));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(scheduler.schedule_count(), 20);
    if let Ok(scheduler) = Arc::try_unwrap(scheduler) {
        scheduler.shutdown();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn builder_resolves_placeholders_and_config_overrides(
) -> Result<(), Box<dyn std::error::Error>> {
    let ticks = Arc::new(AtomicUsize::new(0));
    let muted = Arc::new(AtomicUsize::new(0));
    let t = Arc::clone(&ticks);
    let m = Arc::clone(&muted);

    let config = Config::builder()
        .set_override("app.tick", "80ms")?
        .set_override("jobs.muted.enabled", false)?
        .build()?;

    let scheduler = SchedulerBuilder::with_config(config)
        .job(
            JobSpec::builder("ticker", move || {
                t.fetch_add(1, Ordering::SeqCst);
            })
            .every("${app.tick:1s}")
            .build(),
        )
        .job(
            JobSpec::builder("muted", move || {
                m.fetch_add(1, Ordering::SeqCst);
            })
            .every("10ms")
            .build(),
        )
        .start()?;

    assert_eq!(scheduler.schedule_count(), 1);
    let names: Vec<String> = scheduler
        .schedules()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, vec!["ticker"]);

    wait_until(
        || ticks.load(Ordering::SeqCst) >= 3,
        Duration::from_secs(2),
        "three ticks at the config-resolved interval",
    )
    .await;
    assert_eq!(muted.load(Ordering::SeqCst), 0, "disabled job ran anyway");

    scheduler.shutdown();
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn builder_initial_delay_postpones_only_the_first_run(
) -> Result<(), Box<dyn std::error::Error>> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);

    let scheduler = SchedulerBuilder::new()
        .job(
            JobSpec::builder("delayed", move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .every("1h")
            .initial_delay("300ms")
            .build(),
        )
        .start()?;

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0, "first run ignored the delay");

    wait_until(
        || count.load(Ordering::SeqCst) == 1,
        Duration::from_secs(1),
        "delayed first run",
    )
    .await;
    scheduler.shutdown();
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn builder_rejects_malformed_interval_specs() {
    let result = SchedulerBuilder::new()
        .job(JobSpec::builder("bad-job", || {}).every("7 fortnights").build())
        .start();

    let err = result.err().expect("malformed spec was accepted");
    assert!(
        err.to_string().contains("bad-job"),
        "error does not name the offending job: {err}"
    );
}
