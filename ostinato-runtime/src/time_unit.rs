use std::str::FromStr;
use std::time::Duration;

/// Unit applied to bare numeric interval values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn to_duration(self, value: u64) -> Duration {
        match self {
            TimeUnit::Milliseconds => Duration::from_millis(value),
            TimeUnit::Seconds => Duration::from_secs(value),
            TimeUnit::Minutes => Duration::from_secs(value * 60),
            TimeUnit::Hours => Duration::from_secs(value * 3_600),
            TimeUnit::Days => Duration::from_secs(value * 86_400),
        }
    }

    /// Shorthand suffixes are lowercase only; "5S" or "5 s" are rejected.
    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "ms" => Some(TimeUnit::Milliseconds),
            "s" => Some(TimeUnit::Seconds),
            "m" => Some(TimeUnit::Minutes),
            "h" => Some(TimeUnit::Hours),
            "d" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    /// Parse a full unit name: "milliseconds", "seconds", "minutes",
    /// "hours", "days". For shorthand like "5s" use [`parse_interval`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "milliseconds" => Ok(TimeUnit::Milliseconds),
            "seconds" => Ok(TimeUnit::Seconds),
            "minutes" => Ok(TimeUnit::Minutes),
            "hours" => Ok(TimeUnit::Hours),
            "days" => Ok(TimeUnit::Days),
            _ => Err(format!("invalid time unit: {s}")),
        }
    }
}

/// Parse an interval spec: shorthand like "500ms" / "5s" / "2m" / "1h" /
/// "1d", or a bare integer scaled by `default_unit`.
pub(crate) fn parse_interval(
    spec: &str,
    default_unit: TimeUnit,
) -> Result<Duration, Box<dyn std::error::Error>> {
    let spec = spec.trim();
    if let Ok(value) = spec.parse::<u64>() {
        return Ok(default_unit.to_duration(value));
    }
    let split = spec.find(|c: char| !c.is_ascii_digit()).unwrap_or(0);
    let (num, suffix) = spec.split_at(split);
    let value: u64 = num
        .parse()
        .map_err(|_| format!("invalid interval value: {spec}"))?;
    let unit = TimeUnit::from_suffix(suffix)
        .ok_or_else(|| format!("invalid interval unit in: {spec}"))?;
    Ok(unit.to_duration(value))
}
