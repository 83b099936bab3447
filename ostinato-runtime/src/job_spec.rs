use std::sync::Arc;

use crate::time_unit::TimeUnit;
use crate::worker::Worker;

/// Declarative description of one recurring job, consumed by
/// [`SchedulerBuilder`](crate::SchedulerBuilder).
///
/// `every` and `initial_delay` accept shorthand durations ("500ms",
/// "5s"), bare numbers scaled by the spec's time unit, or
/// `${key:default}` config placeholders. `enabled` accepts a boolean
/// string or a placeholder; anything other than "false" enables the job.
#[derive(Clone)]
pub struct JobSpec {
    pub(crate) name: String,
    pub(crate) every: String,
    pub(crate) initial_delay: String,
    pub(crate) enabled: String,
    pub(crate) time_unit: TimeUnit,
    pub(crate) worker: Arc<dyn Worker>,
}

impl JobSpec {
    /// Start building a spec for `worker`. Defaults: run every second, no
    /// initial delay, enabled, bare numbers read as milliseconds.
    pub fn builder<W>(name: impl Into<String>, worker: W) -> JobSpecBuilder
    where
        W: Worker + 'static,
    {
        JobSpecBuilder {
            name: name.into(),
            every: "1s".to_string(),
            initial_delay: "0".to_string(),
            enabled: "true".to_string(),
            time_unit: TimeUnit::Milliseconds,
            worker: Arc::new(worker),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`JobSpec`].
pub struct JobSpecBuilder {
    name: String,
    every: String,
    initial_delay: String,
    enabled: String,
    time_unit: TimeUnit,
    worker: Arc<dyn Worker>,
}

impl JobSpecBuilder {
    pub fn every(mut self, every: impl Into<String>) -> Self {
        self.every = every.into();
        self
    }

    pub fn initial_delay(mut self, initial_delay: impl Into<String>) -> Self {
        self.initial_delay = initial_delay.into();
        self
    }

    pub fn enabled(mut self, enabled: impl Into<String>) -> Self {
        self.enabled = enabled.into();
        self
    }

    pub fn time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.time_unit = time_unit;
        self
    }

    pub fn build(self) -> JobSpec {
        JobSpec {
            name: self.name,
            every: self.every,
            initial_delay: self.initial_delay,
            enabled: self.enabled,
            time_unit: self.time_unit,
            worker: self.worker,
        }
    }
}
