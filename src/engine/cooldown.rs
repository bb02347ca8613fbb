use crate::events::Kind;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_played: HashMap<Kind, DateTime<Utc>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cooling_down(&self, kind: Kind, cooldown_ms: u64, now: DateTime<Utc>) -> bool {
        if cooldown_ms == 0 {
            return false;
        }

        match self.last_played.get(&kind) {
            Some(last) => {
                let elapsed = now.signed_duration_since(*last).num_milliseconds();
                elapsed < cooldown_ms as i64
            }
            None => false,
        }
    }

    pub fn record_played(&mut self, kind: Kind, now: DateTime<Utc>) {
        self.last_played.insert(kind, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn suppresses_inside_window_only() {
        let mut tracker = CooldownTracker::new();
        tracker.record_played(Kind::Error, t0());

        assert!(tracker.is_cooling_down(Kind::Error, 5000, t0() + Duration::milliseconds(2000)));
        assert!(!tracker.is_cooling_down(Kind::Error, 5000, t0() + Duration::milliseconds(6000)));
        assert!(!tracker.is_cooling_down(Kind::Error, 5000, t0() + Duration::milliseconds(5000)));
    }

    #[test]
    fn kinds_have_separate_buckets() {
        let mut tracker = CooldownTracker::new();
        tracker.record_played(Kind::Error, t0());

        assert!(!tracker.is_cooling_down(Kind::Warning, 5000, t0()));
        assert!(!tracker.is_cooling_down(Kind::Victory, 5000, t0()));
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let mut tracker = CooldownTracker::new();
        tracker.record_played(Kind::Error, t0());
        assert!(!tracker.is_cooling_down(Kind::Error, 0, t0()));
    }
}
