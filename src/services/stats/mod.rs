pub mod leaderboard;

pub use leaderboard::{PresenceSummary, UserStats};
