pub mod rollover;
pub mod tracker;

pub use tracker::{spawn_tick_loop, PresenceTracker};
