use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::error::Error;
use crate::gateway::{AuditEvent, NotificationGateway, RoleProvider};
use crate::services::presence::rollover;
use crate::store::models::{ChannelId, LastMessage, UserId};
use crate::store::Store;

/// Per-user online/offline state machine driven by a periodic tick.
///
/// A user counts as online when their last observed message is at most
/// `activity_window_seconds` old at tick time. The window sits below the tick
/// interval so a single late tick cannot flap the state. While a user stays
/// online, every counter advances by exactly one tick interval; the counters
/// are tick-count-accurate, not wall-clock-accurate, and a missed tick
/// under-counts.
pub struct PresenceTracker<R, N> {
    store: Arc<Store>,
    roles: Arc<R>,
    notifier: Arc<N>,
    tick_interval_seconds: u64,
    activity_window_seconds: i64,
}

impl<R, N> PresenceTracker<R, N>
where
    R: RoleProvider,
    N: NotificationGateway,
{
    pub fn new(store: Arc<Store>, roles: Arc<R>, notifier: Arc<N>, settings: &Settings) -> Self {
        Self {
            store,
            roles,
            notifier,
            tick_interval_seconds: settings.tick_interval_seconds,
            activity_window_seconds: settings.activity_window_seconds as i64,
        }
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.tick_interval_seconds)
    }

    /// Record an observed message. Creates the user record on first contact.
    pub async fn observe_message(
        &self,
        user: UserId,
        content: &str,
        channel: ChannelId,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let content = content.to_owned();
        self.store
            .mutate(|snap| {
                snap.user_mut(user, now).last_message = Some(LastMessage {
                    content,
                    timestamp: now,
                    channel_id: channel,
                });
            })
            .await
    }

    /// Record an observed message edit.
    pub async fn observe_edit(&self, user: UserId, now: DateTime<Utc>) -> Result<(), Error> {
        self.store
            .mutate(|snap| {
                snap.user_mut(user, now).last_edit = Some(now);
            })
            .await
    }

    /// Re-evaluate every tracked user's online state, advance counters, and
    /// run rollover accounting over all records. One persist per tick;
    /// transition events are emitted after the store lock is released.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<(), Error> {
        // Role checks go to the platform, so resolve them before taking the
        // store lock.
        let user_ids: Vec<UserId> = self.store.read(|s| s.users.keys().copied().collect()).await;
        let mut tracked = Vec::with_capacity(user_ids.len());
        for id in user_ids {
            if self.roles.has_tracked_role(id).await {
                tracked.push(id);
            }
        }

        let window = self.activity_window_seconds;
        let increment = self.tick_interval_seconds;
        let events = self
            .store
            .mutate(|snap| {
                let mut events = Vec::new();
                for id in &tracked {
                    let Some(record) = snap.users.get_mut(id) else {
                        continue;
                    };

                    let recently_active = record
                        .last_message
                        .as_ref()
                        .map(|m| (now - m.timestamp).num_seconds() <= window)
                        .unwrap_or(false);

                    if recently_active {
                        if record.online_start.is_some() {
                            record.total_online_seconds += increment;
                            record.daily_seconds += increment;
                            record.weekly_seconds += increment;
                            record.monthly_seconds += increment;
                        } else {
                            record.online_start = Some(now);
                            record.offline_start = None;
                            events.push(AuditEvent::UserOnline {
                                user_id: *id,
                                last_message: record
                                    .last_message
                                    .as_ref()
                                    .map(|m| m.content.clone()),
                            });
                        }
                    } else if record.online_start.is_some() {
                        record.online_start = None;
                        record.offline_start = Some(now);
                        events.push(AuditEvent::UserOffline { user_id: *id });
                    } else if record.offline_start.is_none() {
                        // First tick for a never-seen record settles it as
                        // offline without an announcement.
                        record.offline_start = Some(now);
                    }
                }

                rollover::apply(snap, now);
                events
            })
            .await?;

        for event in &events {
            if let Err(e) = self.notifier.log_event(event).await {
                debug!("presence event delivery failed: {e}");
            }
        }

        if !events.is_empty() {
            info!(transitions = events.len(), "presence tick complete");
        }
        Ok(())
    }
}

/// Start the periodic presence tick as a background task.
pub fn spawn_tick_loop<R, N>(tracker: Arc<PresenceTracker<R, N>>) -> JoinHandle<()>
where
    R: RoleProvider + 'static,
    N: NotificationGateway + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(tracker.tick_interval());
        loop {
            ticker.tick().await;
            if let Err(e) = tracker.tick(Utc::now()).await {
                error!("presence tick failed: {e:?}");
            }
        }
    })
}
