use std::time::Duration;

/// Default seconds between ticks.
const DEFAULT_TICK_INTERVAL_SECS: u64 = 5;

/// Default return-leg duration when a fleet's outbound leg is not positive.
const DEFAULT_MIN_RETURN_SECS: i64 = 60;

/// Default field count of a freshly colonized planet.
const DEFAULT_COLONY_FIELDS_MAX: i32 = 163;

#[derive(Debug, thiserror::Error)]
#[error("{name} must be a valid {expected}, got '{value}'")]
pub struct ConfigError {
    pub name: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Tick engine configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    pub min_return: chrono::Duration,
    pub colony_fields_max: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(DEFAULT_TICK_INTERVAL_SECS),
            min_return: chrono::Duration::seconds(DEFAULT_MIN_RETURN_SECS),
            colony_fields_max: DEFAULT_COLONY_FIELDS_MAX,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `TICK_INTERVAL_SECS` | `5`     |
    /// | `MIN_RETURN_SECS`    | `60`    |
    /// | `COLONY_FIELDS_MAX`  | `163`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let tick_interval_secs: u64 =
            parse_var(&lookup, "TICK_INTERVAL_SECS", "u64", DEFAULT_TICK_INTERVAL_SECS)?;
        let min_return_secs: i64 =
            parse_var(&lookup, "MIN_RETURN_SECS", "i64", DEFAULT_MIN_RETURN_SECS)?;
        let colony_fields_max: i32 =
            parse_var(&lookup, "COLONY_FIELDS_MAX", "i32", DEFAULT_COLONY_FIELDS_MAX)?;

        Ok(Self {
            tick_interval: Duration::from_secs(tick_interval_secs.max(1)),
            min_return: chrono::Duration::seconds(min_return_secs.max(1)),
            colony_fields_max,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError {
            name,
            expected,
            value,
        }),
    }
}
