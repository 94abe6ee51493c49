//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! (`Scenario`) containing the validated `Parameters` and the initial
//! `Body` list, ready to be handed to `Physics`.
//!
//! Also provides the built-in systems used when no scenario file is
//! available.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::error::{Error, Result};
use crate::simulation::params::{Parameters, DEFAULT_TRAIL_LENGTH, DEFAULT_TRAIL_RESOLUTION};
use crate::simulation::physics::Physics;
use crate::simulation::states::{Body, Color};
use crate::simulation::vector::NVec3;

/// Initial conditions for one simulation run
#[derive(Debug)]
pub struct Scenario {
    pub parameters: Parameters,
    pub bodies: Vec<Body>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        if cfg.bodies.is_empty() {
            return Err(Error::InvalidParam(
                "scenario must contain at least one body".into(),
            ));
        }

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            gravity: p_cfg.gravity,
            dt: p_cfg.dt,
            integrator: p_cfg.integrator.into(),
            trail_length: p_cfg.trail_length.unwrap_or(DEFAULT_TRAIL_LENGTH),
            trail_resolution: p_cfg.trail_resolution.unwrap_or(DEFAULT_TRAIL_RESOLUTION),
        };
        parameters.validate()?;

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies = cfg
            .bodies
            .into_iter()
            .enumerate()
            .map(|(i, bc): (usize, BodyConfig)| {
                Body::builder()
                    .name(bc.name.unwrap_or_else(|| format!("Body {i}")))
                    .position(NVec3::from(bc.x))
                    .velocity(NVec3::from(bc.v))
                    .mass(bc.m)
                    .density(bc.density)
                    .color(bc.color)
                    .build()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { parameters, bodies })
    }

    /// Parse a YAML scenario from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
        Self::build_scenario(cfg)
    }

    /// Load a YAML scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// A heavy star with a single satellite, G = 1.
    pub fn default_system() -> Result<Self> {
        let star = Body::builder()
            .name("Star")
            .mass(1_000_000.0)
            .density(1.0)
            .build()?;
        let satellite = Body::builder()
            .name("Satellite")
            .position(NVec3::new(1000.0, 0.0, 0.0))
            .velocity(NVec3::new(0.0, 30.0, 0.0))
            .mass(1000.0)
            .density(1.0)
            .color(Color::new(127, 127, 127))
            .build()?;

        Ok(Self {
            parameters: Parameters::new(1.0, 0.01)?,
            bodies: vec![star, satellite],
        })
    }

    /// Sun-like star with an inner and an outer planet, G = 1.
    pub fn demo_system() -> Result<Self> {
        Ok(Self {
            parameters: Parameters::new(1.0, 0.01)?,
            bodies: vec![
                default_star()?,
                default_inner_planet()?,
                default_outer_planet()?,
            ],
        })
    }

    pub fn into_physics(self) -> Result<Physics> {
        Physics::new(self.bodies, self.parameters)
    }
}

pub fn default_star() -> Result<Body> {
    Body::builder()
        .name("Sun")
        .mass(1_000_000.0)
        .density(1.4)
        .color(Color::new(255, 220, 0))
        .build()
}

pub fn default_inner_planet() -> Result<Body> {
    Body::builder()
        .name("Inner Planet")
        .position(NVec3::new(800.0, 0.0, 50.0))
        .velocity(NVec3::new(0.0, 35.0, 0.0))
        .mass(1000.0)
        .density(5.4)
        .color(Color::new(180, 180, 180))
        .build()
}

pub fn default_outer_planet() -> Result<Body> {
    Body::builder()
        .name("Outer Planet")
        .position(NVec3::new(1500.0, 0.0, 0.0))
        .velocity(NVec3::new(0.0, 25.0, -5.0))
        .mass(5000.0)
        .density(5.5)
        .color(Color::new(0, 100, 255))
        .build()
}
