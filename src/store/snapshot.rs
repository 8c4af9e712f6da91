use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{MuteHistoryEntry, MuteRecord, UserId, UserRecord};

/// The single persisted document. `Store` owns the canonical copy; everything
/// else works through `Store::mutate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: HashMap<UserId, UserRecord>,
    #[serde(default)]
    pub mutes: HashMap<UserId, MuteRecord>,
    #[serde(default)]
    pub rmute_usage: HashMap<UserId, u64>,
    /// Mute history indexed by moderator.
    #[serde(default)]
    pub mute_history: HashMap<UserId, Vec<MuteHistoryEntry>>,
    /// Mute history indexed by target user.
    #[serde(default)]
    pub user_mute_history: HashMap<UserId, Vec<MuteHistoryEntry>>,
    /// Users who opted out of direct notifications.
    #[serde(default)]
    pub rdm_users: HashSet<UserId>,
}

impl Snapshot {
    /// Fetch a user record, creating it with fresh reset clocks if absent.
    pub fn user_mut(&mut self, user: UserId, now: DateTime<Utc>) -> &mut UserRecord {
        self.users
            .entry(user)
            .or_insert_with(|| UserRecord::new(now))
    }

    /// Append a history entry to both indexes, dropping oldest entries past
    /// the cap.
    pub fn push_history(&mut self, entry: MuteHistoryEntry, cap: usize) {
        push_capped(
            self.mute_history.entry(entry.moderator_id).or_default(),
            entry.clone(),
            cap,
        );
        push_capped(
            self.user_mute_history.entry(entry.user_id).or_default(),
            entry,
            cap,
        );
    }
}

fn push_capped(list: &mut Vec<MuteHistoryEntry>, entry: MuteHistoryEntry, cap: usize) {
    list.push(entry);
    if list.len() > cap {
        let excess = list.len() - cap;
        list.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_capped_oldest_first() {
        let mut snap = Snapshot::default();
        let now = Utc::now();
        for i in 0..5 {
            snap.push_history(
                MuteHistoryEntry::new(UserId(1), UserId(2), &format!("r{i}"), 60, now),
                3,
            );
        }

        let by_mod = &snap.mute_history[&UserId(2)];
        assert_eq!(by_mod.len(), 3);
        assert_eq!(by_mod[0].reason, "r2");
        assert_eq!(by_mod[2].reason, "r4");

        let by_user = &snap.user_mute_history[&UserId(1)];
        assert_eq!(by_user.len(), 3);
    }
}
