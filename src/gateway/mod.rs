mod events;

pub use events::{AuditEvent, UserNotification};

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::store::models::UserId;

/// Failure in an external platform call. Always treated as best-effort by the
/// core: enforcement failures are isolated per target, notification failures
/// are logged and swallowed.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("enforcement action failed: {0}")]
    Enforcement(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Answers role-membership questions for the guild.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Whether the user holds at least one role eligible for presence
    /// tracking.
    async fn has_tracked_role(&self, user: UserId) -> bool;

    /// Whether the user may run moderation operations.
    async fn has_moderator_role(&self, user: UserId) -> bool;
}

/// Applies and clears the platform-side mute state. Role and timeout are
/// separate mechanisms and the core attempts them independently.
#[async_trait]
pub trait EnforcementGateway: Send + Sync {
    /// Whether the mute role exists at all. False means the guild is
    /// misconfigured and mute operations are refused up front.
    async fn mute_role_available(&self) -> bool;

    async fn add_mute_role(&self, user: UserId, reason: &str) -> Result<(), GatewayError>;

    async fn remove_mute_role(&self, user: UserId, reason: &str) -> Result<(), GatewayError>;

    async fn set_timeout(
        &self,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<(), GatewayError>;

    async fn clear_timeout(&self, user: UserId, reason: &str) -> Result<(), GatewayError>;

    async fn has_mute_role(&self, user: UserId) -> bool;

    async fn has_active_timeout(&self, user: UserId) -> bool;
}

/// Delivers structured events to users (DMs) and to the audit log channel.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn notify_user(&self, user: UserId, event: &UserNotification)
        -> Result<(), GatewayError>;

    async fn log_event(&self, event: &AuditEvent) -> Result<(), GatewayError>;
}
