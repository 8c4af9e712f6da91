use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Immutable audit entry written once per mute, indexed both by moderator and
/// by target user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuteHistoryEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub moderator_id: UserId,
    pub reason: String,
    pub duration_seconds: u64,
    pub muted_at: DateTime<Utc>,
}

impl MuteHistoryEntry {
    pub fn new(
        user_id: UserId,
        moderator_id: UserId,
        reason: &str,
        duration_seconds: u64,
        muted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            moderator_id,
            reason: reason.to_owned(),
            duration_seconds,
            muted_at,
        }
    }
}
