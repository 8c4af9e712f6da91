pub mod dnd;
pub mod duration;
pub mod mute_manager;

pub use mute_manager::{MuteManager, MuteOutcome, RecoveryReport, UnmuteOutcome};
