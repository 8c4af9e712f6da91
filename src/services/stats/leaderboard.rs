use chrono::{DateTime, Utc};

use crate::gateway::RoleProvider;
use crate::store::models::{LastMessage, MuteHistoryEntry, PresenceState, UserId};
use crate::store::Store;

/// Aggregated moderation counts for a single user.
#[derive(Debug, Clone, Default)]
pub struct UserStats {
    pub mutes_received: usize,
    pub mutes_given: usize,
    pub rmute_usage: u64,
}

/// Presence status plus accounting counters, for the timetrack command.
#[derive(Debug, Clone)]
pub struct PresenceSummary {
    pub state: PresenceState,
    /// Seconds spent in the current online or offline stretch.
    pub state_seconds: u64,
    pub last_message: Option<LastMessage>,
    pub last_edit: Option<DateTime<Utc>>,
    pub total_online_seconds: u64,
    pub daily_seconds: u64,
    pub weekly_seconds: u64,
    pub monthly_seconds: u64,
}

/// Top moderators by cumulative users muted, descending. Ties break on the
/// lower user id so the ordering is stable.
pub async fn rmute_leaderboard(store: &Store, limit: usize) -> Vec<(UserId, u64)> {
    let mut rows: Vec<(UserId, u64)> = store
        .read(|s| s.rmute_usage.iter().map(|(k, v)| (*k, *v)).collect())
        .await;
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    rows.truncate(limit);
    rows
}

/// Top users by daily online seconds, split by whether they hold a tracked
/// role. `tracked = false` gives the leaderboard of untracked users.
pub async fn presence_leaderboard<R: RoleProvider>(
    store: &Store,
    roles: &R,
    tracked: bool,
    limit: usize,
) -> Vec<(UserId, u64)> {
    let all: Vec<(UserId, u64)> = store
        .read(|s| {
            s.users
                .iter()
                .map(|(id, record)| (*id, record.daily_seconds))
                .collect()
        })
        .await;

    let mut rows = Vec::with_capacity(all.len());
    for (id, seconds) in all {
        if roles.has_tracked_role(id).await == tracked {
            rows.push((id, seconds));
        }
    }
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    rows.truncate(limit);
    rows
}

pub async fn history_for_user(store: &Store, user: UserId) -> Vec<MuteHistoryEntry> {
    store
        .read(|s| s.user_mute_history.get(&user).cloned().unwrap_or_default())
        .await
}

pub async fn history_by_moderator(store: &Store, moderator: UserId) -> Vec<MuteHistoryEntry> {
    store
        .read(|s| s.mute_history.get(&moderator).cloned().unwrap_or_default())
        .await
}

pub async fn user_stats(store: &Store, user: UserId) -> UserStats {
    store
        .read(|s| UserStats {
            mutes_received: s.user_mute_history.get(&user).map_or(0, Vec::len),
            mutes_given: s.mute_history.get(&user).map_or(0, Vec::len),
            rmute_usage: s.rmute_usage.get(&user).copied().unwrap_or(0),
        })
        .await
}

/// Presence summary for a user, or None when the user has never been seen.
pub async fn timetrack(store: &Store, user: UserId, now: DateTime<Utc>) -> Option<PresenceSummary> {
    store
        .read(|s| {
            s.users.get(&user).map(|record| {
                let state = record.presence();
                let since = match state {
                    PresenceState::Online => record.online_start,
                    PresenceState::Offline => record.offline_start,
                    PresenceState::NeverSeen => None,
                };
                PresenceSummary {
                    state,
                    state_seconds: since
                        .map(|t| (now - t).num_seconds().max(0) as u64)
                        .unwrap_or(0),
                    last_message: record.last_message.clone(),
                    last_edit: record.last_edit,
                    total_online_seconds: record.total_online_seconds,
                    daily_seconds: record.daily_seconds,
                    weekly_seconds: record.weekly_seconds,
                    monthly_seconds: record.monthly_seconds,
                }
            })
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticRoles;
    use std::sync::Arc;

    async fn seeded_store() -> (Arc<Store>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("data.json")).await.unwrap());
        let now = Utc::now();
        store
            .mutate(|snap| {
                snap.rmute_usage.insert(UserId(1), 5);
                snap.rmute_usage.insert(UserId(2), 9);
                snap.rmute_usage.insert(UserId(3), 5);

                snap.user_mut(UserId(10), now).daily_seconds = 300;
                snap.user_mut(UserId(11), now).daily_seconds = 600;
                snap.user_mut(UserId(12), now).daily_seconds = 100;
            })
            .await
            .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn rmute_leaderboard_sorts_descending_with_stable_ties() {
        let (store, _dir) = seeded_store().await;
        let rows = rmute_leaderboard(&store, 10).await;
        assert_eq!(
            rows,
            vec![(UserId(2), 9), (UserId(1), 5), (UserId(3), 5)]
        );

        let top_one = rmute_leaderboard(&store, 1).await;
        assert_eq!(top_one, vec![(UserId(2), 9)]);
    }

    #[tokio::test]
    async fn presence_leaderboard_splits_on_tracked_role() {
        let (store, _dir) = seeded_store().await;
        let roles = StaticRoles::new(&[UserId(10), UserId(11)], &[]);

        let tracked = presence_leaderboard(&store, &roles, true, 10).await;
        assert_eq!(tracked, vec![(UserId(11), 600), (UserId(10), 300)]);

        let untracked = presence_leaderboard(&store, &roles, false, 10).await;
        assert_eq!(untracked, vec![(UserId(12), 100)]);
    }

    #[tokio::test]
    async fn timetrack_reports_never_seen_user_as_none() {
        let (store, _dir) = seeded_store().await;
        assert!(timetrack(&store, UserId(99), Utc::now()).await.is_none());

        let summary = timetrack(&store, UserId(10), Utc::now()).await.unwrap();
        assert_eq!(summary.state, PresenceState::NeverSeen);
        assert_eq!(summary.daily_seconds, 300);
    }
}
