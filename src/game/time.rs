//! Frame-accumulated interval timer
//!
//! Counts simulated seconds, never wall-clock time.

/// Fires once every `interval` simulated seconds
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    /// Total elapsed time in seconds
    elapsed: f64,
    interval: f64,
    /// Time since the last tick
    since_last_tick: f64,
}

impl IntervalTimer {
    pub fn new(interval: f64) -> Self {
        Self {
            elapsed: 0.0,
            interval: interval.max(f64::EPSILON),
            since_last_tick: 0.0,
        }
    }

    /// Advance the timer and return true if an interval elapsed. Negative
    /// deltas are ignored; several elapsed intervals still fire only once.
    pub fn update(&mut self, dt: f64) -> bool {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.since_last_tick += dt;

        if self.since_last_tick >= self.interval {
            self.since_last_tick %= self.interval;
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.since_last_tick = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_every_interval() {
        let mut timer = IntervalTimer::new(30.0);
        assert!(!timer.update(29.0));
        assert!(timer.update(1.5));
        assert!(!timer.update(28.0));
        assert!(timer.update(0.5));
        assert_eq!(timer.elapsed(), 59.0);
    }

    #[test]
    fn test_negative_and_huge_deltas() {
        let mut timer = IntervalTimer::new(30.0);
        assert!(!timer.update(-100.0));
        assert_eq!(timer.elapsed(), 0.0);

        assert!(timer.update(95.0));
        // 5 s carried over
        assert!(!timer.update(24.0));
        assert!(timer.update(1.0));

        timer.reset();
        assert_eq!(timer.elapsed(), 0.0);
    }
}
