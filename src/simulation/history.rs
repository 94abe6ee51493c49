//! Short per-body history of committed kinematic states
//!
//! The integrators read `a_n` (and Verlet also `v_n`) from the most recent
//! entry, and the collision detector uses it as the start of the current
//! sub-step when estimating straight-line motion.

use super::vector::NVec3;

/// Number of snapshots kept per body.
pub const HISTORY_LENGTH: usize = 2;

/// One committed snapshot. `NVec3` is `Copy`, so a snapshot never aliases
/// the body's live vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: NVec3,
    pub velocity: NVec3,
    pub acceleration: NVec3,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: NVec3::zeros(),
            velocity: NVec3::zeros(),
            acceleration: NVec3::zeros(),
        }
    }
}

/// Fixed-capacity ring buffer of [`BodyState`], most recent first.
#[derive(Debug, Clone, Default)]
pub struct BodyHistory {
    entries: [BodyState; HISTORY_LENGTH],
    head: usize, // slot of the most recent entry
    len: usize,  // valid entries, saturates at HISTORY_LENGTH
}

impl BodyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recent snapshot, if any has been recorded.
    pub fn latest(&self) -> Option<&BodyState> {
        self.get(0)
    }

    /// Snapshot `steps` commits ago (0 is the most recent).
    pub fn get(&self, steps: usize) -> Option<&BodyState> {
        if steps >= self.len {
            return None;
        }
        let index = (self.head + HISTORY_LENGTH - steps) % HISTORY_LENGTH;
        Some(&self.entries[index])
    }

    /// Push a copy of the given state, overwriting the oldest slot when full.
    pub fn record(&mut self, position: &NVec3, velocity: &NVec3, acceleration: &NVec3) {
        if self.len < HISTORY_LENGTH {
            self.len += 1;
        }
        self.head = (self.head + 1) % HISTORY_LENGTH;
        self.entries[self.head] = BodyState {
            position: *position,
            velocity: *velocity,
            acceleration: *acceleration,
        };
    }

    /// Average velocity needed to get from the latest snapshot to `position`
    /// over `interval`. `None` until something has been recorded.
    pub fn linear_velocity(&self, position: &NVec3, interval: f64) -> Option<NVec3> {
        self.latest()
            .map(|prev| (position - prev.position) / interval)
    }
}
