//! Fixed-step time integrators for the N-body system
//!
//! Every integrator follows the same three-step protocol so the physics loop
//! does not care which one is active:
//!
//! 1. `predict` advances one body's position/velocity by `dt` using only the
//!    acceleration `a_n` already in its history (no force evaluation)
//! 2. `roll_back` undoes a `predict` of the same `dt` by replaying its
//!    operations inverted and in reverse order
//! 3. `update` takes the force at the predicted position, derives
//!    `a_n+1 = F / m` and commits the step to history
//!
//! Integrators only touch the body they are given; coupling between bodies
//! comes in through the force vector.

use super::states::Body;
use super::vector::{NVec3, VectorExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// x_n+1 = x_n + v_n dt, v_n+1 = v_n + a_n dt. Not energy conserving.
    ExplicitEuler,
    /// v_n+1 = v_n + a_n dt, x_n+1 = x_n + v_n+1 dt. Bounded energy error.
    #[default]
    SymplecticEuler,
    /// Velocity Verlet. Second order, time reversible.
    Verlet,
}

impl Integrator {
    pub fn name(&self) -> &'static str {
        match self {
            Integrator::ExplicitEuler => "explicit_euler",
            Integrator::SymplecticEuler => "symplectic_euler",
            Integrator::Verlet => "verlet",
        }
    }

    /// Advance `body` tentatively by `dt`.
    pub fn predict(&self, body: &mut Body, dt: f64) {
        let a = body.acceleration(); // a_n
        match self {
            Integrator::ExplicitEuler => {
                // x_n+1 = x_n + v_n dt
                body.position.add_scaled_in_place(&body.velocity, dt);
                // v_n+1 = v_n + a_n dt
                body.velocity.add_scaled_in_place(&a, dt);
            }
            Integrator::SymplecticEuler => {
                // Kick: v_n+1 = v_n + a_n dt
                body.velocity.add_scaled_in_place(&a, dt);
                // Drift with the new velocity: x_n+1 = x_n + v_n+1 dt
                body.position.add_scaled_in_place(&body.velocity, dt);
            }
            Integrator::Verlet => {
                // x_n+1 = x_n + v_n dt + 1/2 a_n dt^2
                body.position
                    .add_scaled_in_place(&body.velocity, dt)
                    .add_scaled_in_place(&a, 0.5 * dt * dt);
                // provisional v_n+1 = v_n + a_n dt, corrected in `update`
                body.velocity.add_scaled_in_place(&a, dt);
            }
        }
    }

    /// Undo a `predict(body, dt)`.
    pub fn roll_back(&self, body: &mut Body, dt: f64) {
        let a = body.acceleration();
        match self {
            Integrator::ExplicitEuler => {
                // v_n = v_n+1 - a_n dt
                body.velocity.add_scaled_in_place(&a, -dt);
                // x_n = x_n+1 - v_n dt
                body.position.add_scaled_in_place(&body.velocity, -dt);
            }
            Integrator::SymplecticEuler => {
                // x_n = x_n+1 - v_n+1 dt
                body.position.add_scaled_in_place(&body.velocity, -dt);
                // v_n = v_n+1 - a_n dt
                body.velocity.add_scaled_in_place(&a, -dt);
            }
            Integrator::Verlet => {
                // v_n = v_n+1 - a_n dt
                body.velocity.add_scaled_in_place(&a, -dt);
                // x_n = x_n+1 - v_n dt - 1/2 a_n dt^2
                body.position
                    .add_scaled_in_place(&body.velocity, -dt)
                    .add_scaled_in_place(&a, -0.5 * dt * dt);
            }
        }
    }

    /// Finish a step of length `dt` given the force at the predicted position.
    pub fn update(&self, body: &mut Body, force: &NVec3, dt: f64) {
        // a_n+1 = F(x_n+1) / m
        let a_new = force / body.mass();
        match self {
            Integrator::ExplicitEuler | Integrator::SymplecticEuler => {}
            Integrator::Verlet => {
                // v_n+1 = v_n + 1/2 (a_n + a_n+1) dt
                if let Some(prev) = body.history().latest().copied() {
                    body.velocity = prev.velocity;
                    body.velocity
                        .add_scaled_in_place(&(prev.acceleration + a_new), 0.5 * dt);
                }
            }
        }
        body.record_history(&a_new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    const ALL: [Integrator; 3] = [
        Integrator::ExplicitEuler,
        Integrator::SymplecticEuler,
        Integrator::Verlet,
    ];

    fn body_with_accel(a: NVec3) -> Result<Body> {
        let mut b = Body::builder()
            .position(NVec3::new(1.0, 2.0, 3.0))
            .velocity(NVec3::new(0.5, -1.0, 2.0))
            .build()?;
        b.record_history(&a);
        Ok(b)
    }

    #[test]
    fn predict_rules_match_each_scheme() -> Result<()> {
        let a = NVec3::new(0.0, 0.0, -2.0);
        let dt = 0.5;

        let mut b = body_with_accel(a)?;
        Integrator::ExplicitEuler.predict(&mut b, dt);
        // old velocity moves the position
        assert!((b.position().z - (3.0 + 2.0 * dt)).abs() < 1e-15);
        assert!((b.velocity().z - (2.0 - 2.0 * dt)).abs() < 1e-15);

        let mut b = body_with_accel(a)?;
        Integrator::SymplecticEuler.predict(&mut b, dt);
        // new velocity moves the position
        assert!((b.position().z - (3.0 + (2.0 - 2.0 * dt) * dt)).abs() < 1e-15);

        let mut b = body_with_accel(a)?;
        Integrator::Verlet.predict(&mut b, dt);
        assert!((b.position().z - (3.0 + 2.0 * dt - dt * dt)).abs() < 1e-15);
        Ok(())
    }

    #[test]
    fn verlet_update_averages_accelerations() -> Result<()> {
        let a0 = NVec3::new(1.0, 0.0, 0.0);
        let mut b = body_with_accel(a0)?;
        let dt = 0.1;
        Integrator::Verlet.predict(&mut b, dt);

        let force = NVec3::new(3.0, 0.0, 0.0); // mass 1 -> a1 = 3
        Integrator::Verlet.update(&mut b, &force, dt);
        assert!((b.velocity().x - (0.5 + 0.5 * (1.0 + 3.0) * dt)).abs() < 1e-15);
        assert_eq!(b.acceleration(), NVec3::new(3.0, 0.0, 0.0));
        assert_eq!(b.history().len(), 2);
        Ok(())
    }

    #[test]
    fn update_commits_new_acceleration() -> Result<()> {
        for integrator in ALL {
            let mut b = body_with_accel(NVec3::zeros())?;
            integrator.predict(&mut b, 1.0);
            integrator.update(&mut b, &NVec3::new(0.0, 4.0, 0.0), 1.0);
            assert_eq!(b.acceleration(), NVec3::new(0.0, 4.0, 0.0));
            assert_eq!(b.history().latest().map(|s| s.position), Some(*b.position()));
        }
        Ok(())
    }
}
