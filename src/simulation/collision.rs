//! Continuous sphere-sphere collision detection and merge resolution
//!
//! Detection runs after every body has been predicted across the remaining
//! part of the tick. Each body's motion over that interval is treated as a
//! straight line from its sub-step origin (the last committed position) to
//! its predicted position, and every unordered pair is tested once:
//!
//! - broad phase: a per-axis rejection that never discards a pair the exact
//!   solve would accept
//! - narrow phase: the earliest root of |Δx + Δv t|² = (r_a + r_b)²
//!
//! Impact times are relative to the start of the current sub-step and are
//! accepted in `[-elapsed, remaining)`. Pairs already overlapping at the
//! sub-step origin whose contact began before that window are reported at
//! `t = 0`, so they merge instead of passing through each other.

use std::cmp::Ordering;

use log::info;

use super::states::{Body, BodyId};
use super::time_step::TimeStep;
use super::vector::NVec3;

/// A pair of bodies that touch `t` after the start of the current sub-step.
///
/// `first`/`second` index the body slice the event was detected on and are
/// only meaningful until that slice changes.
#[derive(Debug, Clone, Copy)]
pub struct CollisionEvent {
    pub first: usize,
    pub second: usize,
    pub first_id: BodyId,
    pub second_id: BodyId,
    pub t: f64,
}

impl CollisionEvent {
    pub fn involves(&self, id: BodyId) -> bool {
        self.first_id == id || self.second_id == id
    }

    /// Ascending impact time; equal times fall back to the id pair so the
    /// choice of event is deterministic.
    pub fn cmp_time(&self, other: &Self) -> Ordering {
        self.t
            .total_cmp(&other.t)
            .then_with(|| self.id_pair().cmp(&other.id_pair()))
    }

    fn id_pair(&self) -> (BodyId, BodyId) {
        if self.first_id <= self.second_id {
            (self.first_id, self.second_id)
        } else {
            (self.second_id, self.first_id)
        }
    }

    /// Merge the lighter body into the heavier one (equal masses keep the
    /// lower id) and remove it from `bodies`. Returns the removed body.
    ///
    /// The caller must already have rolled every body back to the impact
    /// instant.
    pub fn resolve(&self, bodies: &mut Vec<Body>) -> Body {
        let (keep, destroy) = {
            let a = &bodies[self.first];
            let b = &bodies[self.second];
            let a_survives = match a.mass().total_cmp(&b.mass()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => a.id() < b.id(),
            };
            if a_survives {
                (self.first, self.second)
            } else {
                (self.second, self.first)
            }
        };

        let destroyed = bodies.remove(destroy);
        let keep = if destroy < keep { keep - 1 } else { keep };
        bodies[keep].merge(&destroyed);

        info!(
            "{} absorbed {}: mass {:.6e}, radius {:.6e}",
            bodies[keep],
            destroyed,
            bodies[keep].mass(),
            bodies[keep].radius()
        );
        destroyed
    }
}

/// Order-independent in the pair; the impact time is not part of identity.
impl PartialEq for CollisionEvent {
    fn eq(&self, other: &Self) -> bool {
        self.id_pair() == other.id_pair()
    }
}

impl Eq for CollisionEvent {}

/// Earliest event in `events`, if any.
pub fn earliest(events: &[CollisionEvent]) -> Option<&CollisionEvent> {
    events.iter().min_by(|a, b| a.cmp_time(b))
}

/// Conservative per-axis rejection test.
///
/// `rel_pos`/`rel_vel` describe body b relative to body a at the start of the
/// sub-step; `threshold` is the sum of radii. Returns `false` only if the pair
/// cannot touch anywhere in `[-lookback, lookahead]`.
pub fn broad_phase(
    rel_pos: &NVec3,
    rel_vel: &NVec3,
    threshold: f64,
    lookback: f64,
    lookahead: f64,
) -> bool {
    for k in 0..3 {
        let dx = rel_pos[k];
        let dv = rel_vel[k];
        let gap = dx.abs() - threshold;
        if gap <= 0.0 {
            continue; // already overlapping on this axis
        }
        // approaching pairs can only close the gap going forward,
        // separating ones only going back
        let window = if dx * dv < 0.0 { lookahead } else { lookback };
        if gap > dv.abs() * window {
            return false;
        }
    }
    true
}

/// Earliest time at which two spheres moving in straight lines touch.
///
/// Solves `qa t² + qb t + qc = 0` with `qa = Δv·Δv`, `qb = 2 Δx·Δv`,
/// `qc = Δx·Δx − R²`. `None` if there is no relative motion or no real root.
pub fn time_of_impact(rel_pos: &NVec3, rel_vel: &NVec3, threshold: f64) -> Option<f64> {
    let qa = rel_vel.dot(rel_vel);
    if qa <= f64::EPSILON * threshold * threshold {
        return None;
    }
    let qb = 2.0 * rel_pos.dot(rel_vel);
    let qc = rel_pos.dot(rel_pos) - threshold * threshold;

    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        None
    } else if discriminant == 0.0 {
        Some(-qb / (2.0 * qa))
    } else {
        Some((-qb - discriminant.sqrt()) / (2.0 * qa))
    }
}

/// Finds every pair that makes contact within the current sub-step window.
/// The event buffer is reused between calls.
#[derive(Debug, Default)]
pub struct CollisionDetector {
    collisions: Vec<CollisionEvent>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `bodies` must hold their predicted positions for `time_step.remaining()`.
    pub fn detect_collisions(&mut self, bodies: &[Body], time_step: &TimeStep) -> &[CollisionEvent] {
        self.collisions.clear();

        let lookback = time_step.elapsed();
        let lookahead = time_step.remaining();

        // straight-line motion over the sub-step, once per body
        let origins: Vec<NVec3> = bodies.iter().map(Body::sub_step_origin).collect();
        let velocities: Vec<NVec3> = bodies
            .iter()
            .map(|b| b.find_linear_velocity(lookahead))
            .collect();

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let rel_pos = origins[j] - origins[i];
                let rel_vel = velocities[j] - velocities[i];
                let threshold = bodies[i].radius() + bodies[j].radius();

                if !broad_phase(&rel_pos, &rel_vel, threshold, lookback, lookahead) {
                    continue;
                }

                let overlapping = rel_pos.norm_squared() <= threshold * threshold;
                let t = match time_of_impact(&rel_pos, &rel_vel, threshold) {
                    Some(t) if t >= -lookback && t < lookahead => t,
                    // already touching at the sub-step origin, contact began earlier
                    _ if overlapping => 0.0,
                    _ => continue,
                };

                info!(
                    "collision detected between {} and {} at t = {:.6e}",
                    bodies[i], bodies[j], t
                );
                self.collisions.push(CollisionEvent {
                    first: i,
                    second: j,
                    first_id: bodies[i].id(),
                    second_id: bodies[j].id(),
                    t,
                });
            }
        }
        &self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_on_impact_time() {
        // D = 10, R = 2, closing speed 2 -> t = (D - R) / v = 4
        let rel_pos = NVec3::new(10.0, 0.0, 0.0);
        let rel_vel = NVec3::new(-2.0, 0.0, 0.0);
        let t = time_of_impact(&rel_pos, &rel_vel, 2.0);
        assert!(t.is_some_and(|t| (t - 4.0).abs() < 1e-12));
    }

    #[test]
    fn miss_has_no_root() {
        let rel_pos = NVec3::new(10.0, 5.0, 0.0);
        let rel_vel = NVec3::new(-2.0, 0.0, 0.0);
        assert!(time_of_impact(&rel_pos, &rel_vel, 2.0).is_none());
    }

    #[test]
    fn no_relative_motion_has_no_impact() {
        let rel_pos = NVec3::new(1.0, 0.0, 0.0);
        assert!(time_of_impact(&rel_pos, &NVec3::zeros(), 2.0).is_none());
    }

    #[test]
    fn broad_phase_rejects_separating_and_slow_pairs() {
        let rel_pos = NVec3::new(10.0, 0.0, 0.0);
        // moving apart, no lookback
        assert!(!broad_phase(&rel_pos, &NVec3::new(1.0, 0.0, 0.0), 2.0, 0.0, 100.0));
        // approaching but too slow to close 8 units in 1
        assert!(!broad_phase(&rel_pos, &NVec3::new(-1.0, 0.0, 0.0), 2.0, 0.0, 1.0));
        // approaching fast enough
        assert!(broad_phase(&rel_pos, &NVec3::new(-8.0, 0.0, 0.0), 2.0, 0.0, 1.0));
        // separating, but the lookback window reaches the contact
        assert!(broad_phase(&rel_pos, &NVec3::new(8.0, 0.0, 0.0), 2.0, 1.0, 1.0));
    }

    #[test]
    fn events_compare_by_pair_and_sort_by_time() {
        let e1 = CollisionEvent {
            first: 0,
            second: 1,
            first_id: BodyId(7),
            second_id: BodyId(9),
            t: 0.5,
        };
        let e2 = CollisionEvent {
            first: 1,
            second: 0,
            first_id: BodyId(9),
            second_id: BodyId(7),
            t: 0.2,
        };
        let e3 = CollisionEvent {
            first_id: BodyId(7),
            second_id: BodyId(8),
            t: 0.3,
            ..e1
        };
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
        assert!(e1.involves(BodyId(9)));

        let events = [e1, e3, e2];
        assert_eq!(earliest(&events).map(|e| e.t), Some(0.2));
        assert!(earliest(&[]).is_none());
    }
}
