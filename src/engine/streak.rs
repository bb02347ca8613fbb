use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct StreakTracker {
    streak: u32,
    notified: HashSet<u32>,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.streak
    }

    pub fn on_new_error_batch(&mut self) -> u32 {
        self.streak = self.streak.saturating_add(1);
        self.streak
    }

    /// Returns the streak length the first time it reaches `threshold` in the
    /// current streak. A threshold of zero never fires.
    pub fn check_threshold(&mut self, threshold: u32) -> Option<u32> {
        if threshold == 0 || self.streak < threshold {
            return None;
        }

        if self.notified.insert(threshold) {
            Some(self.streak)
        } else {
            None
        }
    }

    pub fn on_fix(&mut self) {
        self.streak = 0;
        self.notified.clear();
    }
}

pub fn shame_message(streak: u32) -> String {
    format!("{streak} errors and counting. Are you okay?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_streak() {
        let mut tracker = StreakTracker::new();
        let mut fired = Vec::new();
        for _ in 0..5 {
            tracker.on_new_error_batch();
            fired.push(tracker.check_threshold(3));
        }
        assert_eq!(fired, vec![None, None, Some(3), None, None]);
    }

    #[test]
    fn fix_rearms_the_threshold() {
        let mut tracker = StreakTracker::new();
        for _ in 0..3 {
            tracker.on_new_error_batch();
        }
        assert_eq!(tracker.check_threshold(3), Some(3));

        tracker.on_fix();
        assert_eq!(tracker.current(), 0);

        for _ in 0..2 {
            tracker.on_new_error_batch();
            assert_eq!(tracker.check_threshold(3), None);
        }
        tracker.on_new_error_batch();
        assert_eq!(tracker.check_threshold(3), Some(3));
    }

    #[test]
    fn zero_threshold_is_off() {
        let mut tracker = StreakTracker::new();
        tracker.on_new_error_batch();
        assert_eq!(tracker.check_threshold(0), None);
    }

    #[test]
    fn message_text() {
        assert_eq!(shame_message(10), "10 errors and counting. Are you okay?");
    }
}
