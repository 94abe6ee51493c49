//! Core state types for the N-body simulation.
//!
//! - `Body`: one massive sphere (kinematics, mass/density/radius, identity,
//!   committed history and render trail)
//! - `BodyBuilder`: validated construction of a `Body`
//! - `BodySnapshot`: owned, read-only copy handed to renderers / reporters

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;

use super::history::BodyHistory;
use super::vector::{NVec3, VectorExt};
use crate::error::{Error, Result};

/// Ids are handed out in creation order and never reused.
static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(0);

/// Stable body identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u64);

impl BodyId {
    fn next() -> Self {
        BodyId(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RGB render color, opaque to the physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::new(r, g, b)
    }
}

/// Radius of a homogeneous sphere: r = cbrt(3 m / (4 π ρ))
pub fn sphere_radius(mass: f64, density: f64) -> f64 {
    ((3.0 * (mass / density)) / (4.0 * PI)).cbrt()
}

#[derive(Debug)]
pub struct Body {
    id: BodyId,
    name: String,
    color: Color,
    mass: f64,    // > 0, grows on merge
    density: f64, // > 0, mass-weighted on merge
    radius: f64,  // always sphere_radius(mass, density)

    pub(crate) position: NVec3,
    pub(crate) velocity: NVec3,
    pub(crate) history: BodyHistory,

    trail: VecDeque<NVec3>, // most recent first
    prev_trail_direction: NVec3,
}

impl Body {
    pub fn builder() -> BodyBuilder {
        BodyBuilder::default()
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn position(&self) -> &NVec3 {
        &self.position
    }

    pub fn velocity(&self) -> &NVec3 {
        &self.velocity
    }

    pub fn history(&self) -> &BodyHistory {
        &self.history
    }

    /// Past positions, most recent first.
    pub fn trail(&self) -> &VecDeque<NVec3> {
        &self.trail
    }

    /// Acceleration of the last committed state (zero before the first commit).
    pub fn acceleration(&self) -> NVec3 {
        self.history
            .latest()
            .map(|s| s.acceleration)
            .unwrap_or_else(NVec3::zeros)
    }

    /// Commit the live position/velocity together with `acceleration`.
    pub fn record_history(&mut self, acceleration: &NVec3) {
        self.history
            .record(&self.position, &self.velocity, acceleration);
    }

    /// Position at the start of the current sub-step: the last committed
    /// position, or the live one if nothing has been committed yet.
    pub fn sub_step_origin(&self) -> NVec3 {
        self.history
            .latest()
            .map(|s| s.position)
            .unwrap_or(self.position)
    }

    /// Straight-line velocity that carries the body from its sub-step origin
    /// to its current (predicted) position over `interval`.
    pub fn find_linear_velocity(&self, interval: f64) -> NVec3 {
        self.history
            .linear_velocity(&self.position, interval)
            .unwrap_or(self.velocity)
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    pub fn momentum(&self) -> NVec3 {
        self.velocity * self.mass
    }

    /// Absorb `other`: mass-weighted position, momentum-conserving velocity,
    /// mass-weighted density, summed mass, recomputed radius.
    ///
    /// The merged state is committed to history with the mass-weighted
    /// acceleration of both bodies, so `Σ m·a` over the system is unchanged
    /// until forces are next evaluated.
    pub fn merge(&mut self, other: &Body) {
        let total = self.mass + other.mass;
        let weight = other.mass / total;
        let acceleration =
            self.acceleration() * (self.mass / total) + other.acceleration() * weight;

        self.position.interpolate_in_place(&other.position, weight);
        self.velocity = self.velocity * (self.mass / total) + other.velocity * weight;
        self.density = (self.mass * self.density + other.mass * other.density) / total;
        self.mass = total;
        self.update_radius();
        self.record_history(&acceleration);
    }

    fn update_radius(&mut self) {
        self.radius = sphere_radius(self.mass, self.density);
    }

    /// Append the current position to the trail if the heading turned by
    /// more than `resolution_deg` or the body moved further than
    /// `min_distance` since the last trail point. Keeps at most `max_points`.
    pub fn update_trail(&mut self, resolution_deg: f64, max_points: usize, min_distance: f64) {
        let direction = self.velocity.normalized_or_zero();
        let turned = direction.distance_to(&self.prev_trail_direction) > resolution_deg.to_radians();
        let moved = self
            .trail
            .front()
            .map_or(true, |last| self.position.distance_to(last) > min_distance);

        if turned || moved {
            self.trail.push_front(self.position);
            while self.trail.len() > max_points.max(1) {
                self.trail.pop_back();
            }
            self.prev_trail_direction = direction;
        }
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            name: self.name.clone(),
            color: self.color,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
            mass: self.mass,
            trail: self.trail.iter().copied().collect(),
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Read-only copy of a body for consumers outside the physics lock.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub name: String,
    pub color: Color,
    pub position: NVec3,
    pub velocity: NVec3,
    pub radius: f64,
    pub mass: f64,
    pub trail: Vec<NVec3>,
}

/// Builder for [`Body`]. Unset fields default to: zero position/velocity,
/// mass 1, density 1, name "Unnamed", white.
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    position: NVec3,
    velocity: NVec3,
    mass: f64,
    density: f64,
    name: String,
    color: Color,
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self {
            position: NVec3::zeros(),
            velocity: NVec3::zeros(),
            mass: 1.0,
            density: 1.0,
            name: "Unnamed".to_string(),
            color: Color::WHITE,
        }
    }
}

impl BodyBuilder {
    pub fn position(mut self, position: NVec3) -> Self {
        self.position = position;
        self
    }

    pub fn velocity(mut self, velocity: NVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Validate and create the body. A fresh id is taken only on success.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if mass or density is non-positive or
    ///   non-finite, or any position/velocity component is non-finite.
    pub fn build(self) -> Result<Body> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "mass of '{}' must be finite and > 0, got {}",
                self.name, self.mass
            )));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "density of '{}' must be finite and > 0, got {}",
                self.name, self.density
            )));
        }
        if !self.position.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam(format!(
                "position of '{}' must be finite",
                self.name
            )));
        }
        if !self.velocity.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam(format!(
                "velocity of '{}' must be finite",
                self.name
            )));
        }

        let mut trail = VecDeque::new();
        trail.push_front(self.position);

        Ok(Body {
            id: BodyId::next(),
            radius: sphere_radius(self.mass, self.density),
            name: self.name,
            color: self.color,
            mass: self.mass,
            density: self.density,
            position: self.position,
            velocity: self.velocity,
            history: BodyHistory::new(),
            trail,
            prev_trail_direction: self.velocity.normalized_or_zero(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_follows_mass_and_density() -> Result<()> {
        // m = 4/3 π, ρ = 1 gives a unit sphere
        let b = Body::builder().mass(4.0 / 3.0 * PI).density(1.0).build()?;
        assert!((b.radius() - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn ids_increase_in_creation_order() -> Result<()> {
        let a = Body::builder().build()?;
        let b = Body::builder().build()?;
        assert!(b.id() > a.id());
        Ok(())
    }

    #[test]
    fn rejects_non_positive_mass_and_density() {
        let err = Body::builder().mass(0.0).build().unwrap_err();
        assert!(err.to_string().contains("mass"));
        let err = Body::builder().mass(-3.0).build().unwrap_err();
        assert!(err.to_string().contains("mass"));
        let err = Body::builder().density(0.0).build().unwrap_err();
        assert!(err.to_string().contains("density"));
        let err = Body::builder()
            .position(NVec3::new(f64::NAN, 0.0, 0.0))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("position"));
    }

    #[test]
    fn merge_conserves_mass_and_momentum() -> Result<()> {
        let mut a = Body::builder()
            .mass(10.0)
            .density(2.0)
            .position(NVec3::new(0.0, 0.0, 0.0))
            .velocity(NVec3::new(1.0, 0.0, 0.0))
            .build()?;
        let mut b = Body::builder()
            .mass(5.0)
            .density(5.0)
            .position(NVec3::new(3.0, 0.0, 0.0))
            .velocity(NVec3::new(0.0, 1.0, 0.0))
            .build()?;
        a.record_history(&NVec3::new(1.0, 0.0, 0.0));
        b.record_history(&NVec3::new(0.0, -2.0, 0.0));

        let p_before = a.momentum() + b.momentum();
        let ma_before = a.acceleration() * a.mass() + b.acceleration() * b.mass();
        a.merge(&b);

        assert!((a.mass() - 15.0).abs() < 1e-12);
        assert!((a.velocity().x - 2.0 / 3.0).abs() < 1e-12);
        assert!((a.velocity().y - 1.0 / 3.0).abs() < 1e-12);
        assert!((a.momentum() - p_before).norm() < 1e-12);
        // position weighted by the absorbed mass fraction
        assert!((a.position().x - 1.0).abs() < 1e-12);
        // density: (10*2 + 5*5) / 15 = 3
        assert!((a.density() - 3.0).abs() < 1e-12);
        assert!((a.radius() - sphere_radius(15.0, 3.0)).abs() < 1e-12);
        // carried acceleration keeps the total force: (2/3, -2/3, 0)
        assert!((a.acceleration() - NVec3::new(2.0 / 3.0, -2.0 / 3.0, 0.0)).norm() < 1e-12);
        assert!((a.acceleration() * a.mass() - ma_before).norm() < 1e-12);
        assert_eq!(a.history().latest().map(|s| s.position), Some(*a.position()));
        Ok(())
    }

    #[test]
    fn trail_is_bounded_and_most_recent_first() -> Result<()> {
        let mut b = Body::builder().velocity(NVec3::new(1.0, 0.0, 0.0)).build()?;
        for i in 1..=10 {
            b.position = NVec3::new(i as f64, 0.0, 0.0);
            b.update_trail(1.0, 4, 0.5);
        }
        assert_eq!(b.trail().len(), 4);
        assert_eq!(b.trail().front().map(|p| p.x), Some(10.0));
        assert_eq!(b.trail().back().map(|p| p.x), Some(7.0));
        Ok(())
    }

    #[test]
    fn trail_ignores_small_straight_moves() -> Result<()> {
        let mut b = Body::builder().velocity(NVec3::new(1.0, 0.0, 0.0)).build()?;
        b.position = NVec3::new(0.1, 0.0, 0.0);
        b.update_trail(1.0, 100, 1.0);
        assert_eq!(b.trail().len(), 1);

        // a sharp turn adds a point even without much travel
        b.velocity = NVec3::new(0.0, 1.0, 0.0);
        b.update_trail(1.0, 100, 1.0);
        assert_eq!(b.trail().len(), 2);
        Ok(())
    }
}
