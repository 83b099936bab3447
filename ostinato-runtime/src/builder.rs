use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use tracing::info;

use crate::config::{job_overrides, load_toml_config, load_yaml_config, resolve_value};
use crate::job_spec::JobSpec;
use crate::scheduler::Scheduler;
use crate::time_unit::parse_interval;
use crate::worker::Worker;

/// Config-driven front door for assembling a running [`Scheduler`].
///
/// Queue [`JobSpec`]s with [`job`](Self::job), then call
/// [`start`](Self::start): every spec is resolved against the config
/// (placeholders, `jobs.<name>` overrides, enabled flags) and the
/// survivors are registered with a freshly started scheduler.
pub struct SchedulerBuilder {
    config: Arc<Config>,
    jobs: Vec<JobSpec>,
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerBuilder {
    /// Builder with an empty config; placeholders only resolve to their
    /// inline defaults.
    pub fn new() -> Self {
        Self {
            config: Arc::new(Config::default()),
            jobs: Vec::new(),
        }
    }

    /// Builder backed by a TOML config file.
    ///
    /// # Panics
    ///
    /// Panics if the config file cannot be loaded or parsed. Configuration
    /// errors should be caught at setup, not at the first resolved job.
    pub fn with_toml(path: &str) -> Self {
        let config = load_toml_config(path)
            .unwrap_or_else(|e| panic!("Failed to load TOML config from '{path}': {e}"));
        Self {
            config: Arc::new(config),
            jobs: Vec::new(),
        }
    }

    /// Builder backed by a YAML config file.
    ///
    /// # Panics
    ///
    /// Panics if the config file cannot be loaded or parsed.
    pub fn with_yaml(path: &str) -> Self {
        let config = load_yaml_config(path)
            .unwrap_or_else(|e| panic!("Failed to load YAML config from '{path}': {e}"));
        Self {
            config: Arc::new(config),
            jobs: Vec::new(),
        }
    }

    /// Builder over an already-built [`Config`].
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            jobs: Vec::new(),
        }
    }

    /// Queue a job spec for registration at [`start`](Self::start).
    pub fn job(mut self, spec: JobSpec) -> Self {
        self.jobs.push(spec);
        self
    }

    /// Resolve every queued spec and register the enabled ones with a
    /// running scheduler. Nothing is spawned if any spec fails to
    /// resolve.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> Result<Scheduler, Box<dyn Error>> {
        let mut resolved: Vec<(String, Arc<dyn Worker>, Duration, Duration)> = Vec::new();

        for spec in self.jobs {
            let overrides = job_overrides(&self.config, &spec.name);

            let enabled = match overrides.enabled {
                Some(value) => value.to_string(),
                None => resolve_value(&spec.enabled, &self.config)?,
            };
            if enabled.to_lowercase() == "false" {
                info!(job = %spec.name, "disabled via config, skipping");
                continue;
            }

            let time_unit = match overrides.time_unit {
                Some(ref name) => name
                    .parse()
                    .map_err(|e: String| format!("job '{}': {e}", spec.name))?,
                None => spec.time_unit,
            };

            let every = overrides.every.unwrap_or(spec.every);
            let every = resolve_value(&every, &self.config)?;
            let interval = parse_interval(&every, time_unit)
                .map_err(|e| format!("job '{}': {e}", spec.name))?;

            let initial_delay = overrides.initial_delay.unwrap_or(spec.initial_delay);
            let initial_delay = resolve_value(&initial_delay, &self.config)?;
            let initial_delay = parse_interval(&initial_delay, time_unit)
                .map_err(|e| format!("job '{}': {e}", spec.name))?;

            resolved.push((spec.name, spec.worker, interval, initial_delay));
        }

        let scheduler = Scheduler::new();
        for (name, worker, interval, initial_delay) in resolved {
            scheduler.spawn_schedule(Some(name), worker, interval, initial_delay);
        }
        Ok(scheduler)
    }
}
