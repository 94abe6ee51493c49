//! 3D vector type used throughout the engine
//!
//! Positions, velocities, accelerations and forces are all `NVec3`
//! (nalgebra `Vector3<f64>`), so the usual operators (`+`, `-`, `*`, unary
//! `-`, `dot`, `norm`) never mutate their operands. `VectorExt` adds the
//! in-place variants the integrators chain together, plus the zero-safe
//! normalization, distance and interpolation the rest of the engine needs.

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

/// Magnitudes below this are treated as the zero vector by normalization.
pub const NORMALIZE_EPSILON: f64 = 1.0e-12;

/// Extra vector operations on [`NVec3`].
///
/// Every `*_in_place` method mutates the receiver and hands it back so calls
/// can be chained; every other method returns a fresh vector.
pub trait VectorExt {
    fn add_in_place(&mut self, other: &NVec3) -> &mut Self;
    fn subtract_in_place(&mut self, other: &NVec3) -> &mut Self;
    fn scale_in_place(&mut self, factor: f64) -> &mut Self;
    fn negate_in_place(&mut self) -> &mut Self;

    /// `self += other * factor`
    fn add_scaled_in_place(&mut self, other: &NVec3, factor: f64) -> &mut Self;

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    fn normalized_or_zero(&self) -> NVec3;
    fn normalize_in_place(&mut self) -> &mut Self;

    /// Euclidean distance between two points.
    fn distance_to(&self, other: &NVec3) -> f64;

    /// Linear interpolation: `p = 0` gives `self`, `p = 1` gives `other`.
    fn interpolate(&self, other: &NVec3, p: f64) -> NVec3;
    fn interpolate_in_place(&mut self, other: &NVec3, p: f64) -> &mut Self;
}

impl VectorExt for NVec3 {
    #[inline]
    fn add_in_place(&mut self, other: &NVec3) -> &mut Self {
        *self += other;
        self
    }

    #[inline]
    fn subtract_in_place(&mut self, other: &NVec3) -> &mut Self {
        *self -= other;
        self
    }

    #[inline]
    fn scale_in_place(&mut self, factor: f64) -> &mut Self {
        *self *= factor;
        self
    }

    #[inline]
    fn negate_in_place(&mut self) -> &mut Self {
        *self = -*self;
        self
    }

    #[inline]
    fn add_scaled_in_place(&mut self, other: &NVec3, factor: f64) -> &mut Self {
        *self += other * factor;
        self
    }

    fn normalized_or_zero(&self) -> NVec3 {
        let mag = self.norm();
        if mag < NORMALIZE_EPSILON {
            NVec3::zeros()
        } else {
            self / mag
        }
    }

    fn normalize_in_place(&mut self) -> &mut Self {
        *self = self.normalized_or_zero();
        self
    }

    #[inline]
    fn distance_to(&self, other: &NVec3) -> f64 {
        (other - self).norm()
    }

    #[inline]
    fn interpolate(&self, other: &NVec3, p: f64) -> NVec3 {
        self + (other - self) * p
    }

    #[inline]
    fn interpolate_in_place(&mut self, other: &NVec3, p: f64) -> &mut Self {
        let delta = (other - *self) * p;
        *self += delta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_vector_is_zero() {
        let v = NVec3::zeros();
        assert_eq!(v.normalized_or_zero(), NVec3::zeros());

        let mut tiny = NVec3::new(1e-14, 0.0, 0.0);
        tiny.normalize_in_place();
        assert_eq!(tiny, NVec3::zeros());
    }

    #[test]
    fn normalize_gives_unit_length() {
        let v = NVec3::new(3.0, 4.0, 0.0);
        let n = v.normalized_or_zero();
        assert!((n.norm() - 1.0).abs() < 1e-15);
        assert!((n.x - 0.6).abs() < 1e-15);
        // operand untouched
        assert_eq!(v, NVec3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn in_place_ops_chain_and_mutate() {
        let a = NVec3::new(1.0, 2.0, 3.0);
        let mut v = NVec3::new(1.0, 1.0, 1.0);
        v.add_in_place(&a).scale_in_place(2.0).subtract_in_place(&a);
        assert_eq!(v, NVec3::new(3.0, 4.0, 5.0));

        v.negate_in_place().add_scaled_in_place(&a, 0.5);
        assert_eq!(v, NVec3::new(-2.5, -3.0, -3.5));
    }

    #[test]
    fn interpolate_and_distance() {
        let a = NVec3::new(0.0, 0.0, 0.0);
        let b = NVec3::new(10.0, -4.0, 2.0);
        assert_eq!(a.interpolate(&b, 0.25), NVec3::new(2.5, -1.0, 0.5));
        assert_eq!(a, NVec3::zeros());

        let mut c = a;
        c.interpolate_in_place(&b, 1.0);
        assert_eq!(c, b);

        assert!((NVec3::new(1.0, 1.0, 1.0).distance_to(&NVec3::new(4.0, 5.0, 1.0)) - 5.0).abs() < 1e-15);
    }
}
