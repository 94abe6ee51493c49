//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – physical constant, tick length, integrator, trail settings
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A star with one satellite:
//!
//! ```yaml
//! parameters:
//!   gravity: 1.0                  # gravitational constant G
//!   dt: 0.01                      # nominal tick length
//!   integrator: "symplectic_euler" # or "explicit_euler", "verlet"
//!   trail_length: 180             # optional, degrees
//!   trail_resolution: 1.0         # optional, degrees per trail point
//!
//! bodies:
//!   - name: "Star"
//!     x: [ 0.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, 0.0 ]
//!     m: 1000000.0
//!     density: 1.0
//!     color: [ 255, 255, 255 ]
//!   - name: "Satellite"
//!     x: [ 1000.0, 0.0, 0.0 ]
//!     v: [ 0.0, 30.0, 0.0 ]
//!     m: 1000.0
//! ```
//!
//! Validation (positive mass/density, positive dt) happens when the
//! configuration is turned into runtime types by `Scenario`.

use serde::Deserialize;

use crate::simulation::integrator::Integrator;
use crate::simulation::states::Color;

/// Which integrator the engine uses
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[serde(rename = "explicit_euler")] // First order, drifts in energy; reference only
    ExplicitEuler,

    #[default]
    #[serde(rename = "symplectic_euler")] // Semi-implicit Euler, bounded energy error for orbits
    SymplecticEuler,

    #[serde(rename = "verlet")] // Velocity Verlet, second order and time reversible
    Verlet,
}

impl From<IntegratorConfig> for Integrator {
    fn from(cfg: IntegratorConfig) -> Self {
        match cfg {
            IntegratorConfig::ExplicitEuler => Integrator::ExplicitEuler,
            IntegratorConfig::SymplecticEuler => Integrator::SymplecticEuler,
            IntegratorConfig::Verlet => Integrator::Verlet,
        }
    }
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub gravity: f64, // gravitational constant
    pub dt: f64,      // nominal tick length
    #[serde(default)]
    pub integrator: IntegratorConfig,
    pub trail_length: Option<f64>,     // degrees of trail kept behind each body
    pub trail_resolution: Option<f64>, // degrees of heading change per trail point
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: Option<String>,
    pub x: [f64; 3], // initial position
    pub v: [f64; 3], // initial velocity
    pub m: f64,      // mass
    #[serde(default = "default_density")]
    pub density: f64, // sets the radius together with the mass
    #[serde(default)]
    pub color: Color,
}

fn default_density() -> f64 {
    1.0
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    pub bodies: Vec<BodyConfig>,      // Initial state of every body
}
