//! Per-tick physics loop
//!
//! `Physics` owns the live body list and advances it one nominal tick per
//! [`Physics::update_bodies`] call. A tick is a fixed-point loop over
//! sub-steps:
//!
//! 1. predict every body across the remaining part of the tick
//! 2. detect collisions inside that window
//! 3. if there are any, roll every body back to the earliest impact, merge
//!    the pair, consume only the time up to the impact and go back to 1
//!    (a merge invalidates every other predicted impact)
//! 4. otherwise consume the rest of the tick, evaluate gravity at the
//!    predicted positions and finalize every body
//!
//! A merge that lands within rounding of the end of the tick is followed by
//! a zero-length finalize so no body leaves the tick with the pull of the
//! destroyed body still in its acceleration.
//!
//! Every resolved collision removes a body, so a tick runs at most
//! `bodies.len()` resolving sub-steps plus one finalizing sub-step.
//!
//! [`SharedPhysics`] puts the engine behind a single mutex held for whole
//! ticks so readers only ever see fully advanced states.

use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use super::collision::{self, CollisionDetector};
use super::forces::{self, ForceSet, NewtonianGravity};
use super::params::Parameters;
use super::states::{Body, BodySnapshot};
use super::time_step::TimeStep;
use super::vector::NVec3;
use crate::error::{Error, Result};

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub sub_steps: usize,
    pub merges: usize,
}

pub struct Physics {
    bodies: Vec<Body>,
    parameters: Parameters,
    forces: ForceSet,
    force_buffer: Vec<NVec3>, // indexed like `bodies`
    detector: CollisionDetector,
    time_step: TimeStep,
    duration: f64, // simulated seconds
    ticks: u64,
    init_bounds: f64, // largest initial distance from the origin
}

impl Physics {
    /// Take ownership of the initial bodies and seed every body's history
    /// with the acceleration at its starting position.
    pub fn new(bodies: Vec<Body>, parameters: Parameters) -> Result<Self> {
        parameters.validate()?;

        let forces = ForceSet::new().with(NewtonianGravity {
            gravity: parameters.gravity,
        });
        let init_bounds = bodies
            .iter()
            .map(|b| b.position().norm())
            .fold(0.0, f64::max);

        let mut physics = Self {
            bodies,
            time_step: TimeStep::new(parameters.dt),
            parameters,
            forces,
            force_buffer: Vec::new(),
            detector: CollisionDetector::new(),
            duration: 0.0,
            ticks: 0,
            init_bounds,
        };
        physics.seed_history();
        Ok(physics)
    }

    fn seed_history(&mut self) {
        self.forces.compute(&self.bodies, &mut self.force_buffer);
        for (body, force) in self.bodies.iter_mut().zip(&self.force_buffer) {
            let a = force / body.mass();
            body.record_history(&a);
        }
    }

    /// Advance the system by one nominal tick.
    pub fn update_bodies(&mut self) -> TickSummary {
        let integrator = self.parameters.integrator;
        let mut summary = TickSummary::default();
        self.time_step.reset();

        while !self.time_step.is_finished() {
            summary.sub_steps += 1;
            let remaining = self.time_step.remaining();

            for body in self.bodies.iter_mut() {
                integrator.predict(body, remaining);
            }

            let events = self.detector.detect_collisions(&self.bodies, &self.time_step);
            let first = collision::earliest(events).copied();

            match first {
                Some(event) => {
                    // undo the part of the prediction past the impact
                    let overshoot = remaining - event.t;
                    for body in self.bodies.iter_mut() {
                        integrator.roll_back(body, overshoot);
                    }

                    // the survivor commits the mass-weighted acceleration
                    event.resolve(&mut self.bodies);
                    summary.merges += 1;

                    // the impact instant becomes the next sub-step origin;
                    // accelerations are carried over, not re-evaluated
                    for body in self.bodies.iter_mut() {
                        let a = body.acceleration();
                        body.record_history(&a);
                    }
                    self.time_step.update(event.t);

                    // impact at the very end of the tick: no sub-step is
                    // left to refresh the forces, so finalize in place
                    if self.time_step.is_finished() {
                        self.finalize(0.0);
                    }
                }
                None => {
                    self.time_step.update(remaining);
                    self.finalize(remaining);
                }
            }
        }

        self.duration += self.time_step.dt();
        self.ticks += 1;

        let max_points = self.parameters.trail_points();
        let min_distance = self.init_bounds / 10.0;
        for body in self.bodies.iter_mut() {
            body.update_trail(self.parameters.trail_resolution, max_points, min_distance);
        }

        debug!(
            "tick {}: {} sub-steps, {} merges, {} bodies",
            self.ticks,
            summary.sub_steps,
            summary.merges,
            self.bodies.len()
        );
        summary
    }

    /// Evaluate forces at the current positions and commit a step of
    /// length `dt` for every body.
    fn finalize(&mut self, dt: f64) {
        let integrator = self.parameters.integrator;
        self.forces.compute(&self.bodies, &mut self.force_buffer);
        for (body, force) in self.bodies.iter_mut().zip(&self.force_buffer) {
            integrator.update(body, force, dt);
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn time_step(&self) -> &TimeStep {
        &self.time_step
    }

    /// Simulated time covered so far.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn init_bounds(&self) -> f64 {
        self.init_bounds
    }

    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(Body::snapshot).collect()
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.bodies
            .iter()
            .fold(NVec3::zeros(), |acc, b| acc + b.momentum())
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn potential_energy(&self) -> f64 {
        forces::potential_energy(self.parameters.gravity, &self.bodies)
    }

    pub fn total_energy(&self) -> f64 {
        self.total_kinetic_energy() + self.potential_energy()
    }
}

/// Physics engine shared between the thread that ticks it and readers.
#[derive(Clone)]
pub struct SharedPhysics {
    inner: Arc<Mutex<Physics>>,
}

impl SharedPhysics {
    pub fn new(physics: Physics) -> Self {
        Self {
            inner: Arc::new(Mutex::new(physics)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Physics>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Run one full tick under the lock.
    pub fn tick(&self) -> Result<TickSummary> {
        Ok(self.lock()?.update_bodies())
    }

    /// Consistent copy of every body between ticks.
    pub fn snapshot(&self) -> Result<Vec<BodySnapshot>> {
        Ok(self.lock()?.snapshot())
    }

    /// Read anything else off the engine under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Physics) -> R) -> Result<R> {
        Ok(f(&*self.lock()?))
    }
}
