//! Force contributors for the n-body engine
//!
//! `ForceSet` sums every registered [`ForceCalculator`] into one force vector
//! per body. The only term the engine registers is exact pairwise
//! [`NewtonianGravity`]; output slots are indexed like the body slice.

use crate::simulation::states::Body;
use crate::simulation::vector::NVec3;

/// A source of force acting on the bodies.
/// Implementations add their contribution into `out[i]` for body `i`.
pub trait ForceCalculator {
    fn accumulate_forces(&self, bodies: &[Body], out: &mut [NVec3]);
}

/// Collection of force terms summed into a single force per body
pub struct ForceSet {
    terms: Vec<Box<dyn ForceCalculator + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with(mut self, term: impl ForceCalculator + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total forces on `bodies`.
    /// `out` is resized to `bodies.len()` and overwritten.
    pub fn compute(&self, bodies: &[Body], out: &mut Vec<NVec3>) {
        out.clear();
        out.resize(bodies.len(), NVec3::zeros());
        for term in &self.terms {
            term.accumulate_forces(bodies, out);
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Direct O(n²) Newtonian gravity, no softening.
pub struct NewtonianGravity {
    pub gravity: f64, // gravitational constant G
}

impl NewtonianGravity {
    /// Force on the body at `xi` (mass `mi`) from the body at `xj` (mass `mj`).
    /// `None` for coincident bodies, which have no defined direction.
    #[inline]
    pub fn pair_force(&self, xi: &NVec3, mi: f64, xj: &NVec3, mj: f64) -> Option<NVec3> {
        // r points from i to j, so i is pulled along +r
        let r = xj - xi;
        let d2 = r.norm_squared();
        if d2 == 0.0 {
            return None;
        }
        let d = d2.sqrt();

        // F = G m_i m_j / d^2 * (r / d), folded into a single 1/d^3 factor
        Some(r * (self.gravity * mi * mj / (d2 * d)))
    }
}

impl ForceCalculator for NewtonianGravity {
    fn accumulate_forces(&self, bodies: &[Body], out: &mut [NVec3]) {
        let n = bodies.len();

        // each unordered pair exactly once; Newton's third law gives j's share
        for i in 0..n {
            let bi = &bodies[i];
            for j in (i + 1)..n {
                let bj = &bodies[j];
                let Some(f) = self.pair_force(bi.position(), bi.mass(), bj.position(), bj.mass())
                else {
                    continue;
                };
                out[i] += f;
                out[j] -= f;
            }
        }
    }
}

/// Gravitational potential energy of the whole system: -Σ G m_i m_j / d_ij
pub fn potential_energy(gravity: f64, bodies: &[Body]) -> f64 {
    let mut total = 0.0;
    for (i, bi) in bodies.iter().enumerate() {
        for bj in &bodies[i + 1..] {
            let d = (bj.position() - bi.position()).norm();
            if d > 0.0 {
                total -= gravity * bi.mass() * bj.mass() / d;
            }
        }
    }
    total
}
