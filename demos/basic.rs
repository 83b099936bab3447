use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use ostinato::{Scheduler, Worker};

/// Pretends to sync something remote; takes a noticeable amount of time.
struct SyncJob {
    name: &'static str,
    runs: AtomicU32,
}

impl SyncJob {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            runs: AtomicU32::new(0),
        }
    }
}

impl Worker for SyncJob {
    fn perform_work(&self) {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[{}] run #{} starting", self.name, run);
        std::thread::sleep(Duration::from_millis(400));
        println!("[{}] run #{} done", self.name, run);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let scheduler = Scheduler::new();
    scheduler.add_schedule(SyncJob::new("inventory"), Duration::from_secs(2));
    scheduler.add_schedule(SyncJob::new("billing"), Duration::from_secs(3));
    scheduler.add_schedule(|| println!("[heartbeat] alive"), Duration::from_secs(1));

    println!("Three jobs registered; all execution is serialized.");
    println!("Press Ctrl+C to stop...\n");

    tokio::signal::ctrl_c().await?;
    scheduler.shutdown();
    Ok(())
}
