use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChannelId;

/// The most recent message observed from a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastMessage {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub channel_id: ChannelId,
}

/// Start timestamps of the current accounting window for each period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClock {
    pub daily: DateTime<Utc>,
    pub weekly: DateTime<Utc>,
    pub monthly: DateTime<Utc>,
}

impl ResetClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            daily: now,
            weekly: now,
            monthly: now,
        }
    }
}

/// Where a user currently sits in the presence state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    /// Record exists but has never been ticked.
    NeverSeen,
    Online,
    Offline,
}

/// Per-user presence and accounting state, created lazily on the first
/// observed message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub last_edit: Option<DateTime<Utc>>,
    /// Set while the user is online; mutually exclusive with `offline_start`
    /// once the record has been ticked.
    #[serde(default)]
    pub online_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offline_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_online_seconds: u64,
    #[serde(default)]
    pub daily_seconds: u64,
    #[serde(default)]
    pub weekly_seconds: u64,
    #[serde(default)]
    pub monthly_seconds: u64,
    pub last_reset: ResetClock,
}

impl UserRecord {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_message: None,
            last_edit: None,
            online_start: None,
            offline_start: None,
            total_online_seconds: 0,
            daily_seconds: 0,
            weekly_seconds: 0,
            monthly_seconds: 0,
            last_reset: ResetClock::new(now),
        }
    }

    pub fn presence(&self) -> PresenceState {
        if self.online_start.is_some() {
            PresenceState::Online
        } else if self.offline_start.is_some() {
            PresenceState::Offline
        } else {
            PresenceState::NeverSeen
        }
    }
}
