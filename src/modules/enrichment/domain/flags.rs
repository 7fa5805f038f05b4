//! Activity flags derived from fetched data. Pure functions, no hidden state.

use crate::modules::provider::GithubEvent;
use crate::modules::results::UserFlags;
use chrono::{DateTime, Months, Utc};

/// More than this many events or followers marks a real user
const REAL_USER_THRESHOLD: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Activity {
    pub event_count: usize,
    pub followers: u64,
    pub most_recent_event: Option<DateTime<Utc>>,
}

impl Activity {
    pub fn from_events(followers: u64, events: &[GithubEvent]) -> Self {
        Self {
            event_count: events.len(),
            followers,
            most_recent_event: events.iter().filter_map(|event| event.created_at).max(),
        }
    }
}

pub fn derive_flags(activity: &Activity, now: DateTime<Utc>) -> UserFlags {
    let is_real_user = activity.event_count as u64 > REAL_USER_THRESHOLD
        || activity.followers > REAL_USER_THRESHOLD;

    let one_year_ago = now.checked_sub_months(Months::new(12)).unwrap_or(now);
    let is_active_user = activity.event_count > 0
        && activity
            .most_recent_event
            .is_some_and(|latest| latest > one_year_ago);

    UserFlags {
        event_count: activity.event_count,
        is_real_user,
        is_active_user,
    }
}
