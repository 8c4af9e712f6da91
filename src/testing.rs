//! Shared in-memory fakes for the gateway traits.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::gateway::{
    AuditEvent, EnforcementGateway, GatewayError, NotificationGateway, RoleProvider,
    UserNotification,
};
use crate::store::models::UserId;

/// Role provider with fixed tracked/moderator sets.
pub struct StaticRoles {
    tracked: HashSet<UserId>,
    moderators: HashSet<UserId>,
}

impl StaticRoles {
    pub fn new(tracked: &[UserId], moderators: &[UserId]) -> Self {
        Self {
            tracked: tracked.iter().copied().collect(),
            moderators: moderators.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl RoleProvider for StaticRoles {
    async fn has_tracked_role(&self, user: UserId) -> bool {
        self.tracked.contains(&user)
    }

    async fn has_moderator_role(&self, user: UserId) -> bool {
        self.moderators.contains(&user)
    }
}

/// Enforcement gateway that tracks role/timeout state in memory and can be
/// told to fail specific calls.
#[derive(Default)]
pub struct FakeEnforcement {
    role_unavailable: AtomicBool,
    role_holders: Mutex<HashSet<UserId>>,
    timed_out: Mutex<HashSet<UserId>>,
    fail_role: Mutex<HashSet<UserId>>,
    fail_timeout: Mutex<HashSet<UserId>>,
}

impl FakeEnforcement {
    pub fn set_role_available(&self, available: bool) {
        self.role_unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn fail_role_for(&self, user: UserId) {
        self.fail_role.lock().unwrap().insert(user);
    }

    pub fn fail_timeout_for(&self, user: UserId) {
        self.fail_timeout.lock().unwrap().insert(user);
    }

    /// Assign the mute role directly, bypassing the manager.
    pub fn hold_role(&self, user: UserId) {
        self.role_holders.lock().unwrap().insert(user);
    }

    pub fn is_role_held(&self, user: UserId) -> bool {
        self.role_holders.lock().unwrap().contains(&user)
    }

    pub fn is_timed_out(&self, user: UserId) -> bool {
        self.timed_out.lock().unwrap().contains(&user)
    }
}

#[async_trait]
impl EnforcementGateway for FakeEnforcement {
    async fn mute_role_available(&self) -> bool {
        !self.role_unavailable.load(Ordering::SeqCst)
    }

    async fn add_mute_role(&self, user: UserId, _reason: &str) -> Result<(), GatewayError> {
        if self.fail_role.lock().unwrap().contains(&user) {
            return Err(GatewayError::Enforcement(format!(
                "role assignment rejected for {user}"
            )));
        }
        self.role_holders.lock().unwrap().insert(user);
        Ok(())
    }

    async fn remove_mute_role(&self, user: UserId, _reason: &str) -> Result<(), GatewayError> {
        self.role_holders.lock().unwrap().remove(&user);
        Ok(())
    }

    async fn set_timeout(
        &self,
        user: UserId,
        _duration: Duration,
        _reason: &str,
    ) -> Result<(), GatewayError> {
        if self.fail_timeout.lock().unwrap().contains(&user) {
            return Err(GatewayError::Enforcement(format!(
                "timeout rejected for {user}"
            )));
        }
        self.timed_out.lock().unwrap().insert(user);
        Ok(())
    }

    async fn clear_timeout(&self, user: UserId, _reason: &str) -> Result<(), GatewayError> {
        self.timed_out.lock().unwrap().remove(&user);
        Ok(())
    }

    async fn has_mute_role(&self, user: UserId) -> bool {
        self.is_role_held(user)
    }

    async fn has_active_timeout(&self, user: UserId) -> bool {
        self.is_timed_out(user)
    }
}

/// Notification gateway that records everything it is asked to deliver.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<(UserId, UserNotification)>>,
    pub events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl NotificationGateway for RecordingNotifier {
    async fn notify_user(
        &self,
        user: UserId,
        event: &UserNotification,
    ) -> Result<(), GatewayError> {
        self.notifications.lock().unwrap().push((user, event.clone()));
        Ok(())
    }

    async fn log_event(&self, event: &AuditEvent) -> Result<(), GatewayError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
