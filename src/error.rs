use thiserror::Error;

use crate::gateway::GatewayError;
use crate::store::models::UserId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    #[error("mute role is not available")]
    MissingMuteRole,

    #[error("user {0} is not muted")]
    NotMuted(UserId),

    #[error("user {0} lacks the moderator role")]
    PermissionDenied(UserId),

    #[error("enforcement gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
