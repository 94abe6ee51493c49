//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant and nominal tick length,
//! - the integrator driving every body,
//! - trail length/resolution handed through to renderers

use super::integrator::Integrator;
use crate::error::{Error, Result};

pub const DEFAULT_TRAIL_LENGTH: f64 = 180.0;
pub const DEFAULT_TRAIL_RESOLUTION: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub gravity: f64,          // gravitational constant G
    pub dt: f64,               // nominal tick length
    pub integrator: Integrator,
    pub trail_length: f64,     // angular trail length in degrees
    pub trail_resolution: f64, // degrees of heading change per trail point
}

impl Parameters {
    /// Parameters with default integrator and trail settings.
    pub fn new(gravity: f64, dt: f64) -> Result<Self> {
        let params = Self {
            gravity,
            dt,
            integrator: Integrator::default(),
            trail_length: DEFAULT_TRAIL_LENGTH,
            trail_resolution: DEFAULT_TRAIL_RESOLUTION,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(Error::InvalidParam(format!(
                "gravity must be finite and >= 0, got {}",
                self.gravity
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        if !self.trail_resolution.is_finite() || self.trail_resolution <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "trail_resolution must be finite and > 0, got {}",
                self.trail_resolution
            )));
        }
        if !self.trail_length.is_finite() || self.trail_length < 0.0 {
            return Err(Error::InvalidParam(format!(
                "trail_length must be finite and >= 0, got {}",
                self.trail_length
            )));
        }
        Ok(())
    }

    /// Maximum number of points kept in a body's trail.
    pub fn trail_points(&self) -> usize {
        (self.trail_length / self.trail_resolution).floor() as usize
    }
}
