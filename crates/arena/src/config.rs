use std::env;
use std::path::PathBuf;

/// Shortest accepted tick. Anything smaller rounds to a zero-length interval.
pub const MIN_DELTA_TIME: f32 = 1e-3;

/// Arena settings, read from the environment.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Number of ticks to simulate.
    pub ticks: u64,
    /// Seconds per tick.
    pub delta_time: f32,
    /// JSON blueprint for the archer. A built-in preset is used when unset.
    pub behavior: Option<PathBuf>,
    /// Pace ticks in wall-clock time instead of running flat out.
    pub realtime: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            delta_time: 1.0 / 60.0,
            behavior: None,
            realtime: true,
        }
    }
}

impl ArenaConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_TICKS`: number of ticks (default: 600)
    /// - `ARENA_DELTA_TIME`: seconds per tick, at least [`MIN_DELTA_TIME`] (default: 1/60)
    /// - `ARENA_BEHAVIOR`: path to a JSON behavior blueprint
    /// - `ARENA_REALTIME`: pace ticks in wall-clock time (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u64>("ARENA_TICKS") {
            config.ticks = ticks;
        }
        if let Some(delta_time) = env::var("ARENA_DELTA_TIME")
            .ok()
            .and_then(|raw| parse_delta_time(&raw))
        {
            config.delta_time = delta_time;
        }
        if let Some(path) = read_env::<PathBuf>("ARENA_BEHAVIOR") {
            config.behavior = Some(path);
        }
        if let Some(realtime) = read_env_bool("ARENA_REALTIME") {
            config.realtime = realtime;
        }

        config
    }
}

fn parse_delta_time(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|dt| dt.is_finite() && *dt >= MIN_DELTA_TIME)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
