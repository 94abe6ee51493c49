//! Bookkeeping for one nominal physics tick that collisions may split into
//! several sub-steps.

/// Remaining time at or below this counts as a finished tick.
pub const FINISHED_EPSILON: f64 = 1.0e-12;

/// Tracks elapsed vs. remaining time within one tick.
/// `elapsed + remaining == dt` after every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStep {
    dt: f64,
    elapsed: f64,
    remaining: f64,
}

impl TimeStep {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            elapsed: 0.0,
            remaining: dt,
        }
    }

    /// Move `t` from remaining into elapsed.
    pub fn update(&mut self, t: f64) {
        self.elapsed += t;
        self.remaining -= t;
    }

    /// Start a fresh tick.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.remaining = self.dt;
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= FINISHED_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_consumption_keeps_total() {
        let mut ts = TimeStep::new(1.0);
        assert!(!ts.is_finished());
        ts.update(0.25);
        ts.update(0.5);
        assert!((ts.elapsed() - 0.75).abs() < 1e-15);
        assert!((ts.remaining() - 0.25).abs() < 1e-15);
        assert!((ts.elapsed() + ts.remaining() - ts.dt()).abs() < 1e-15);
        assert!(!ts.is_finished());

        ts.update(ts.remaining());
        assert!(ts.is_finished());
    }

    #[test]
    fn reset_restores_full_step() {
        let mut ts = TimeStep::new(0.01);
        ts.update(0.01);
        assert!(ts.is_finished());
        ts.reset();
        assert_eq!(ts.elapsed(), 0.0);
        assert_eq!(ts.remaining(), 0.01);
    }
}
