/// Presence tick interval (seconds). The external scheduler is expected to
/// call `PresenceTracker::tick` at this rate, and online counters advance by
/// exactly this amount per active tick.
pub const DEFAULT_TICK_INTERVAL_SECONDS: u64 = 60;

/// How recent a user's last message must be for them to count as online.
/// Kept deliberately below the tick interval so one late tick does not flap
/// a user between online and offline.
pub const DEFAULT_ACTIVITY_WINDOW_SECONDS: u64 = 53;

/// Counter reset thresholds, in elapsed whole days.
pub const DAILY_RESET_DAYS: i64 = 1;
pub const WEEKLY_RESET_DAYS: i64 = 7;
pub const MONTHLY_RESET_DAYS: i64 = 30;

/// Per-key cap on mute history lists. Oldest entries are dropped first.
pub const DEFAULT_HISTORY_CAP: usize = 1000;

/// Default location of the snapshot file.
pub const DEFAULT_DATA_FILE: &str = "warden_data.json";

/// Number of entries returned by leaderboard queries.
pub const LEADERBOARD_SIZE: usize = 10;
