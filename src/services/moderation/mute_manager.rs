use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::gateway::{
    AuditEvent, EnforcementGateway, NotificationGateway, RoleProvider, UserNotification,
};
use crate::services::moderation::{dnd, duration::parse_duration};
use crate::store::models::{MuteHistoryEntry, MuteRecord, UserId};
use crate::store::Store;
use crate::utils::formatting::format_duration;

/// Result of a multi-target mute. Targets whose enforcement call failed are
/// reported rather than aborting the rest.
#[derive(Debug, Clone)]
pub struct MuteOutcome {
    pub muted: Vec<UserId>,
    pub failed: Vec<UserId>,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct UnmuteOutcome {
    pub user: UserId,
    /// How long the mute was actually in effect; zero when no record existed.
    pub elapsed_seconds: u64,
    pub original: Option<MuteRecord>,
}

/// What startup recovery did with the persisted mute records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryReport {
    pub expired: usize,
    pub rearmed: usize,
}

enum ReleaseOutcome {
    /// Role, timeout and record are gone; carries the record if one existed.
    Released(Option<MuteRecord>),
    /// Nothing to do; another actor already unmuted this user.
    AlreadyUnmuted,
}

/// Timed-mute lifecycle: durable records, deferred auto-unmute timers,
/// manual early release, and idempotent restart recovery.
///
/// Mutations for one user are serialized through a per-user lock; the guard
/// that decides between "release now" and "already unmuted" runs under that
/// lock, so a manual unmute racing an expiring timer resolves to exactly one
/// release.
pub struct MuteManager<R, E, N> {
    store: Arc<Store>,
    roles: Arc<R>,
    enforcement: Arc<E>,
    notifier: Arc<N>,
    /// Pending auto-unmute tasks, keyed by target. Manual unmute aborts the
    /// entry; a timer that fires anyway is stopped by the release guard.
    pending: DashMap<UserId, JoinHandle<()>>,
    locks: DashMap<UserId, Arc<Mutex<()>>>,
    history_cap: usize,
}

impl<R, E, N> MuteManager<R, E, N>
where
    R: RoleProvider + 'static,
    E: EnforcementGateway + 'static,
    N: NotificationGateway + 'static,
{
    pub fn new(
        store: Arc<Store>,
        roles: Arc<R>,
        enforcement: Arc<E>,
        notifier: Arc<N>,
        history_cap: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            roles,
            enforcement,
            notifier,
            pending: DashMap::new(),
            locks: DashMap::new(),
            history_cap,
        })
    }

    /// Mute each target for the parsed duration. Enforcement failures are
    /// isolated per target; the remaining targets still get processed.
    pub async fn mute(
        self: &Arc<Self>,
        targets: &[UserId],
        duration: &str,
        reason: &str,
        moderator: UserId,
    ) -> Result<MuteOutcome, Error> {
        if !self.roles.has_moderator_role(moderator).await {
            return Err(Error::PermissionDenied(moderator));
        }

        let duration_seconds = parse_duration(duration);
        if duration_seconds == 0 {
            return Err(Error::InvalidDuration(duration.to_owned()));
        }

        if !self.enforcement.mute_role_available().await {
            return Err(Error::MissingMuteRole);
        }

        let mut outcome = MuteOutcome {
            muted: Vec::new(),
            failed: Vec::new(),
            duration_seconds,
        };

        for &target in targets {
            match self
                .mute_one(target, duration_seconds, reason, moderator)
                .await
            {
                Ok(()) => outcome.muted.push(target),
                Err(e) => {
                    warn!(user = %target, "mute failed, continuing with remaining targets: {e}");
                    outcome.failed.push(target);
                }
            }
        }

        info!(
            moderator = %moderator,
            muted = outcome.muted.len(),
            failed = outcome.failed.len(),
            duration = %format_duration(duration_seconds),
            "mute command processed"
        );
        Ok(outcome)
    }

    async fn mute_one(
        self: &Arc<Self>,
        target: UserId,
        duration_seconds: u64,
        reason: &str,
        moderator: UserId,
    ) -> Result<(), Error> {
        let lock = self.user_lock(target);
        let _guard = lock.lock().await;

        // The role is the authoritative enforcement bit; if it cannot be
        // assigned the target is skipped entirely.
        self.enforcement.add_mute_role(target, reason).await?;

        // The timeout is a second layer and failing to set it must not undo
        // the role mute.
        if let Err(e) = self
            .enforcement
            .set_timeout(target, Duration::from_secs(duration_seconds), reason)
            .await
        {
            warn!(user = %target, "timeout call failed, role mute stands: {e}");
        }

        let now = Utc::now();
        // Parsed durations saturate to u64::MAX, which must clamp rather
        // than wrap when narrowed for the date arithmetic.
        let unmute_time = now
            .checked_add_signed(
                chrono::Duration::try_seconds(i64::try_from(duration_seconds).unwrap_or(i64::MAX))
                    .unwrap_or(chrono::Duration::MAX),
            )
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let record = MuteRecord {
            moderator_id: moderator,
            reason: reason.to_owned(),
            duration_seconds,
            start_time: now,
            unmute_time,
        };

        let cap = self.history_cap;
        let stored = record.clone();
        self.store
            .mutate(move |snap| {
                snap.mutes.insert(target, stored);
                snap.push_history(
                    MuteHistoryEntry::new(target, moderator, reason, duration_seconds, now),
                    cap,
                );
                *snap.rmute_usage.entry(moderator).or_insert(0) += 1;
            })
            .await?;

        drop(_guard);

        self.notify(
            target,
            &UserNotification::Muted {
                reason: reason.to_owned(),
                duration_seconds,
                moderator_id: moderator,
                unmute_time,
            },
        )
        .await;
        self.log(&AuditEvent::UserMuted {
            user_id: target,
            moderator_id: moderator,
            reason: reason.to_owned(),
            duration_seconds,
            unmute_time,
        })
        .await;

        self.arm_timer(target, Duration::from_secs(duration_seconds));
        Ok(())
    }

    /// Manually release a mute ahead of schedule. Cancels the pending timer
    /// and returns `NotMuted` when there is nothing to release.
    pub async fn unmute(
        self: &Arc<Self>,
        user: UserId,
        reason: &str,
        moderator: UserId,
    ) -> Result<UnmuteOutcome, Error> {
        if !self.roles.has_moderator_role(moderator).await {
            return Err(Error::PermissionDenied(moderator));
        }

        self.cancel_timer(user);

        match self.release(user, reason).await? {
            ReleaseOutcome::AlreadyUnmuted => Err(Error::NotMuted(user)),
            ReleaseOutcome::Released(original) => {
                let now = Utc::now();
                let elapsed_seconds = original
                    .as_ref()
                    .map(|r| (now - r.start_time).num_seconds().max(0) as u64)
                    .unwrap_or(0);

                self.log(&AuditEvent::UserUnmuted {
                    user_id: user,
                    moderator_id: moderator,
                    reason: reason.to_owned(),
                    elapsed_seconds,
                    original: original.clone(),
                })
                .await;
                self.notify(
                    user,
                    &UserNotification::Unmuted {
                        reason: reason.to_owned(),
                        moderator_id: moderator,
                    },
                )
                .await;

                info!(
                    user = %user,
                    moderator = %moderator,
                    elapsed = %format_duration(elapsed_seconds),
                    "user unmuted"
                );
                Ok(UnmuteOutcome {
                    user,
                    elapsed_seconds,
                    original,
                })
            }
        }
    }

    /// Re-arm or immediately expire persisted mutes after a restart. Without
    /// this, a restart during an active mute would silently drop the
    /// scheduled expiry.
    pub async fn recover(self: &Arc<Self>, now: DateTime<Utc>) -> Result<RecoveryReport, Error> {
        let mutes: Vec<(UserId, MuteRecord)> = self
            .store
            .read(|s| s.mutes.iter().map(|(k, v)| (*k, v.clone())).collect())
            .await;

        let mut report = RecoveryReport::default();
        for (user, record) in mutes {
            if record.is_expired(now) {
                if let Err(e) = self.fire_auto_unmute(user).await {
                    error!(user = %user, "recovery unmute failed: {e}");
                } else {
                    report.expired += 1;
                }
            } else {
                self.arm_timer(user, record.remaining(now));
                report.rearmed += 1;
            }
        }

        info!(
            expired = report.expired,
            rearmed = report.rearmed,
            "mute recovery complete"
        );
        Ok(report)
    }

    /// Flip the caller's do-not-disturb opt-out. Returns true when the user
    /// is now opted out.
    pub async fn toggle_dnd(&self, user: UserId) -> Result<bool, Error> {
        dnd::toggle(&self.store, user).await
    }

    /// Active mute for a user, if any.
    pub async fn active_mute(&self, user: UserId) -> Option<MuteRecord> {
        self.store.read(|s| s.mutes.get(&user).cloned()).await
    }

    /// Deferred expiry. The guard inside `release` makes this a no-op when a
    /// manual unmute got there first.
    async fn fire_auto_unmute(self: &Arc<Self>, user: UserId) -> Result<(), Error> {
        self.pending.remove(&user);

        match self.release(user, "auto-unmute").await? {
            ReleaseOutcome::AlreadyUnmuted => {
                debug!(user = %user, "auto-unmute fired for already-unmuted user");
                Ok(())
            }
            ReleaseOutcome::Released(original) => {
                self.log(&AuditEvent::AutoUnmuted {
                    user_id: user,
                    original: original.clone(),
                })
                .await;
                info!(
                    user = %user,
                    duration = %format_duration(
                        original.as_ref().map(|r| r.duration_seconds).unwrap_or(0)
                    ),
                    "auto-unmute complete"
                );
                Ok(())
            }
        }
    }

    /// Remove the enforcement state and the stored record for `user`.
    ///
    /// Runs entirely under the per-user lock: the presence check and the
    /// record deletion cannot interleave with another release of the same
    /// user, which is what keeps manual unmute and timer fire idempotent
    /// against each other.
    async fn release(&self, user: UserId, reason: &str) -> Result<ReleaseOutcome, Error> {
        let lock = self.user_lock(user);
        let _guard = lock.lock().await;

        let role_present = self.enforcement.has_mute_role(user).await;
        let timeout_present = self.enforcement.has_active_timeout(user).await;
        let record = self.store.read(|s| s.mutes.get(&user).cloned()).await;

        if !role_present && !timeout_present && record.is_none() {
            return Ok(ReleaseOutcome::AlreadyUnmuted);
        }

        // Role and timeout removal are attempted independently; neither
        // failure blocks the other or the record cleanup.
        if role_present {
            if let Err(e) = self.enforcement.remove_mute_role(user, reason).await {
                warn!(user = %user, "mute role removal failed: {e}");
            }
        }
        if timeout_present {
            if let Err(e) = self.enforcement.clear_timeout(user, reason).await {
                warn!(user = %user, "timeout clear failed: {e}");
            }
        }

        if record.is_some() {
            self.store
                .mutate(|snap| {
                    snap.mutes.remove(&user);
                })
                .await?;
        }

        Ok(ReleaseOutcome::Released(record))
    }

    fn arm_timer(self: &Arc<Self>, user: UserId, sleep: Duration) {
        let manager = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(sleep).await;
            if let Err(e) = manager.fire_auto_unmute(user).await {
                error!(user = %user, "auto-unmute failed: {e}");
            }
        });

        if let Some(old) = self.pending.insert(user, handle) {
            old.abort();
        }
    }

    fn cancel_timer(&self, user: UserId) {
        if let Some((_, handle)) = self.pending.remove(&user) {
            handle.abort();
        }
    }

    fn user_lock(&self, user: UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn notify(&self, user: UserId, event: &UserNotification) {
        if dnd::is_opted_out(&self.store, user).await {
            return;
        }
        if let Err(e) = self.notifier.notify_user(user, event).await {
            debug!(user = %user, "user notification failed: {e}");
        }
    }

    async fn log(&self, event: &AuditEvent) {
        if let Err(e) = self.notifier.log_event(event).await {
            warn!("audit log delivery failed: {e}");
        }
    }
}
