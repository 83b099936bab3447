//! # Ostinato - Serialized Recurring-Job Scheduling for Rust
//!
//! This library runs any number of independently configured recurring
//! jobs, each on its own fixed interval, while guaranteeing that no two
//! jobs ever execute at the same time: every run funnels through a single
//! serialized execution point.
//!
//! ## Features
//!
//! - **Self-adjusting intervals**: the wait before the next run shrinks by
//!   the time the previous cycle spent waiting and executing, so the
//!   start-to-start period converges on the configured interval
//! - **Serialized execution**: one capacity-1 dispatch channel with a
//!   single consumer; jobs from different schedules never overlap
//! - **Overrun clamping**: a job slower than its interval re-runs
//!   back-to-back instead of erroring or drifting further behind
//! - **Config support**: intervals like `"${app.interval:5s}"` resolve
//!   from TOML/YAML config files and `APP_`-prefixed environment variables
//! - **Enable/disable and initial delay** per job via code or config
//!
//! ## Quick Start
//!
//! The minimal contract is a [`Worker`] and an interval:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ostinato::{Scheduler, Worker};
//!
//! struct InventorySync;
//!
//! impl Worker for InventorySync {
//!     fn perform_work(&self) {
//!         // takes as long as it takes; the schedule compensates
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let scheduler = Scheduler::new();
//!     scheduler.add_schedule(InventorySync, Duration::from_secs(20));
//!     scheduler.add_schedule(|| println!("heartbeat"), Duration::from_secs(5));
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     scheduler.shutdown();
//! }
//! ```
//!
//! ## Config-driven setup
//!
//! ```rust,no_run
//! use ostinato::{JobSpec, SchedulerBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = SchedulerBuilder::with_toml("config/application.toml")
//!         .job(
//!             JobSpec::builder("cache-warm", || println!("warmed"))
//!                 .every("${cache.warm_every:10s}")
//!                 .build(),
//!         )
//!         .job(
//!             JobSpec::builder("reports", || println!("generated"))
//!                 .every("30s")
//!                 .initial_delay("5s")
//!                 .build(),
//!         )
//!         .start()?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     scheduler.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Create `config/application.toml`:
//!
//! ```toml
//! [cache]
//! warm_every = "3s"
//!
//! [jobs.reports]
//! enabled = false
//! ```
//!
//! Or the YAML equivalent:
//!
//! ```yaml
//! cache:
//!   warm_every: 3s
//! jobs:
//!   reports:
//!     enabled: false
//! ```
//!
//! Environment variables with the `APP_` prefix override file values:
//!
//! ```bash
//! export APP_CACHE_WARM_EVERY="1s"
//! ```
//!
//! ## Known limitation
//!
//! Serialization cuts both ways: a worker that never returns occupies the
//! single execution slot forever and every other schedule stops firing.
//! The scheduler imposes no timeout; if you need one, wrap it inside your
//! worker.

// Re-export core types
pub use ostinato_runtime::{
    load_toml_config, load_yaml_config, JobOverrides, JobSpec, JobSpecBuilder, Schedule,
    Scheduler, SchedulerBuilder, TimeUnit, Worker,
};

// Make the runtime crate itself available
pub use ostinato_runtime;
