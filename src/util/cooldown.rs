use chrono::{NaiveDateTime, TimeDelta};
use indexmap::IndexMap;

use crate::util::timestamp::Timestamp;

/// Per-user cooldown windows, anchored at the last counted message.
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    anchors: IndexMap<String, Timestamp>,
    duration: TimeDelta,
}

impl CooldownTracker {
    pub fn new(duration: TimeDelta) -> Self {
        Self::with_anchors(IndexMap::new(), duration)
    }

    pub fn with_anchors(anchors: IndexMap<String, Timestamp>, duration: TimeDelta) -> Self {
        Self { anchors, duration }
    }

    pub fn is_in_cooldown(&self, user_id: &str, now: NaiveDateTime) -> bool {
        self.window_end(user_id).is_some_and(|end| now < end)
    }

    /// Minutes left in the window, rounded to one decimal place with ties to
    /// even. Zero once expired.
    pub fn remaining_minutes(&self, user_id: &str, now: NaiveDateTime) -> f64 {
        let Some(end) = self.window_end(user_id) else {
            return 0.0;
        };
        if now >= end {
            return 0.0;
        }

        let remaining_seconds = (end - now).num_milliseconds() as f64 / 1000.0;
        (remaining_seconds / 60.0 * 10.0).round_ties_even() / 10.0
    }

    pub fn start(&mut self, user_id: &str, now: NaiveDateTime) {
        self.anchors.insert(user_id.to_string(), Timestamp::at(now));
    }

    pub fn anchors(&self) -> &IndexMap<String, Timestamp> {
        &self.anchors
    }

    fn window_end(&self, user_id: &str) -> Option<NaiveDateTime> {
        self.anchors
            .get(user_id)
            .map(|anchor| anchor.as_naive() + self.duration)
    }
}
