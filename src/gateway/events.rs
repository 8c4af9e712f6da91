use chrono::{DateTime, Utc};

use crate::store::models::{MuteRecord, UserId};

/// Direct notification to a single user. Suppressed entirely when the user
/// has opted out via the do-not-disturb registry.
#[derive(Debug, Clone)]
pub enum UserNotification {
    Muted {
        reason: String,
        duration_seconds: u64,
        moderator_id: UserId,
        unmute_time: DateTime<Utc>,
    },
    Unmuted {
        reason: String,
        moderator_id: UserId,
    },
}

/// Fire-and-forget event for the audit log channel.
#[derive(Debug, Clone)]
pub enum AuditEvent {
    UserOnline {
        user_id: UserId,
        last_message: Option<String>,
    },
    UserOffline {
        user_id: UserId,
    },
    UserMuted {
        user_id: UserId,
        moderator_id: UserId,
        reason: String,
        duration_seconds: u64,
        unmute_time: DateTime<Utc>,
    },
    UserUnmuted {
        user_id: UserId,
        moderator_id: UserId,
        reason: String,
        /// Seconds the mute was actually in effect; zero when no record was
        /// found for the user.
        elapsed_seconds: u64,
        /// Original mute context when a record existed.
        original: Option<MuteRecord>,
    },
    AutoUnmuted {
        user_id: UserId,
        original: Option<MuteRecord>,
    },
}
