pub mod moderation;
pub mod presence;
pub mod stats;
