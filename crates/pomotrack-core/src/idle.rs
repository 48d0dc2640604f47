use chrono::{DateTime, Duration, Utc};

/// Tracks the last user action so an idle timer can be nudged.
#[derive(Debug, Clone)]
pub struct IdleMonitor {
    last_action: DateTime<Utc>,
    threshold: Duration,
}

impl IdleMonitor {
    pub fn new(threshold_min: u32, now: DateTime<Utc>) -> Self {
        Self {
            last_action: now,
            threshold: Duration::minutes(i64::from(threshold_min)),
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_action = now;
    }

    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_action).max(Duration::zero())
    }

    /// True when nothing is counting down and the user has been inactive
    /// for at least the threshold.
    pub fn should_nudge(&self, now: DateTime<Utc>, running: bool) -> bool {
        !running && self.idle_for(now) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudges_only_when_idle_long_enough() {
        let t0 = Utc::now();
        let mut m = IdleMonitor::new(5, t0);
        assert!(!m.should_nudge(t0 + Duration::minutes(4), false));
        assert!(m.should_nudge(t0 + Duration::minutes(5), false));
        assert!(!m.should_nudge(t0 + Duration::minutes(10), true));

        m.touch(t0 + Duration::minutes(10));
        assert!(!m.should_nudge(t0 + Duration::minutes(12), false));
    }

    #[test]
    fn clock_going_backwards_counts_as_active() {
        let t0 = Utc::now();
        let m = IdleMonitor::new(5, t0);
        assert_eq!(m.idle_for(t0 - Duration::minutes(3)), Duration::zero());
    }
}
