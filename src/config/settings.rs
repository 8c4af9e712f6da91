use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::tracking::{
    DEFAULT_ACTIVITY_WINDOW_SECONDS, DEFAULT_DATA_FILE, DEFAULT_HISTORY_CAP,
    DEFAULT_TICK_INTERVAL_SECONDS,
};

#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the JSON snapshot file.
    pub data_file: PathBuf,
    /// Presence tick interval in seconds.
    pub tick_interval_seconds: u64,
    /// Activity window in seconds; must stay below the tick interval.
    pub activity_window_seconds: u64,
    /// Per-key cap on mute history lists.
    pub history_cap: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let data_file = env::var("WARDEN_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));

        let tick_interval_seconds = env::var("WARDEN_TICK_INTERVAL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TICK_INTERVAL_SECONDS);

        let activity_window_seconds = env::var("WARDEN_ACTIVITY_WINDOW_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ACTIVITY_WINDOW_SECONDS);

        let history_cap = env::var("WARDEN_HISTORY_CAP")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HISTORY_CAP);

        if tick_interval_seconds == 0 {
            return Err("WARDEN_TICK_INTERVAL_SECONDS must be positive".into());
        }

        if activity_window_seconds >= tick_interval_seconds {
            return Err(format!(
                "WARDEN_ACTIVITY_WINDOW_SECONDS ({}) must be below the tick interval ({})",
                activity_window_seconds, tick_interval_seconds
            ));
        }

        Ok(Self {
            data_file,
            tick_interval_seconds,
            activity_window_seconds,
            history_cap,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_seconds)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            tick_interval_seconds: DEFAULT_TICK_INTERVAL_SECONDS,
            activity_window_seconds: DEFAULT_ACTIVITY_WINDOW_SECONDS,
            history_cap: DEFAULT_HISTORY_CAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_window_below_tick() {
        let settings = Settings::default();
        assert!(settings.activity_window_seconds < settings.tick_interval_seconds);
    }
}
