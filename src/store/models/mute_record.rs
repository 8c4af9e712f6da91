use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// An active mute. Exists only while the user holds the mute role; the
/// lifecycle manager deletes it on manual or automatic unmute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuteRecord {
    pub moderator_id: UserId,
    pub reason: String,
    pub duration_seconds: u64,
    pub start_time: DateTime<Utc>,
    pub unmute_time: DateTime<Utc>,
}

impl MuteRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.unmute_time <= now
    }

    /// Time left until the scheduled unmute; zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.unmute_time - now).to_std().unwrap_or_default()
    }
}
