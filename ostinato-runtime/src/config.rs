use std::error::Error;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Load configuration from a TOML file, with `APP_`-prefixed environment
/// variables layered on top.
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, Box<dyn Error>> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .add_source(Environment::with_prefix("APP").separator("_"))
        .build()?;
    Ok(config)
}

/// Load configuration from a YAML file, same environment layering.
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, Box<dyn Error>> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Yaml))
        .add_source(Environment::with_prefix("APP").separator("_"))
        .build()?;
    Ok(config)
}

/// Resolve a `${key}` or `${key:default}` placeholder against the config.
/// Anything that is not a placeholder passes through unchanged.
pub(crate) fn resolve_value(raw: &str, config: &Config) -> Result<String, Box<dyn Error>> {
    let Some(inner) = raw.strip_prefix("${").and_then(|r| r.strip_suffix('}')) else {
        return Ok(raw.to_string());
    };
    match inner.split_once(':') {
        Some((key, default)) => Ok(config
            .get_string(key)
            .unwrap_or_else(|_| default.to_string())),
        None => Ok(config.get_string(inner)?),
    }
}

/// Per-job settings under `jobs.<name>` in the config file. Anything set
/// here wins over the code-side [`JobSpec`](crate::JobSpec).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobOverrides {
    pub every: Option<String>,
    pub initial_delay: Option<String>,
    pub enabled: Option<bool>,
    pub time_unit: Option<String>,
}

pub(crate) fn job_overrides(config: &Config, name: &str) -> JobOverrides {
    config
        .get::<JobOverrides>(&format!("jobs.{name}"))
        .unwrap_or_default()
}
