//! Ostinato Runtime - serialized execution of recurring jobs
//!
//! This crate provides the scheduler core: per-job timing loops with
//! self-adjusting intervals, funneled through a single execution point.

mod builder;
mod config;
mod job_spec;
mod schedule;
mod scheduler;
mod time_unit;
mod worker;

// Re-export public API
pub use builder::SchedulerBuilder;
pub use config::{load_toml_config, load_yaml_config, JobOverrides};
pub use job_spec::{JobSpec, JobSpecBuilder};
pub use schedule::Schedule;
pub use scheduler::Scheduler;
pub use time_unit::TimeUnit;
pub use worker::Worker;
