use crate::domain::models::{DeprecationPolicy, Lifecycle, LifecycleState};
use chrono::NaiveDate;

const SOON_WINDOW_DAYS: i64 = 30;

/// Buckets a policy against `today`. Pure; the caller owns the clock.
pub fn calculate(policy: &DeprecationPolicy, today: NaiveDate) -> Lifecycle {
    let days_left = (policy.removal_date - today).num_days();
    let state = if days_left > SOON_WINDOW_DAYS {
        LifecycleState::ScheduledFar
    } else if days_left >= 1 {
        LifecycleState::ScheduledSoon
    } else if days_left == 0 {
        LifecycleState::DueToday
    } else {
        LifecycleState::Overdue
    };
    Lifecycle { state, days_left }
}
