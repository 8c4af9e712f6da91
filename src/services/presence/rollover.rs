use chrono::{DateTime, Utc};

use crate::constants::tracking::{DAILY_RESET_DAYS, MONTHLY_RESET_DAYS, WEEKLY_RESET_DAYS};
use crate::store::Snapshot;

/// Reset daily/weekly/monthly counters whose accounting window has elapsed.
/// Runs over every record regardless of role eligibility, and each period
/// resets independently.
///
/// The boundary check counts elapsed whole days (floored), so a reset fires
/// once the threshold day-count is crossed rather than on a rolling window.
pub(crate) fn apply(snapshot: &mut Snapshot, now: DateTime<Utc>) {
    for record in snapshot.users.values_mut() {
        if (now - record.last_reset.daily).num_days() >= DAILY_RESET_DAYS {
            record.daily_seconds = 0;
            record.last_reset.daily = now;
        }
        if (now - record.last_reset.weekly).num_days() >= WEEKLY_RESET_DAYS {
            record.weekly_seconds = 0;
            record.last_reset.weekly = now;
        }
        if (now - record.last_reset.monthly).num_days() >= MONTHLY_RESET_DAYS {
            record.monthly_seconds = 0;
            record.last_reset.monthly = now;
        }
    }
}
