pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Error, Result};

pub use simulation::vector::{NVec3, VectorExt};
pub use simulation::history::{BodyHistory, BodyState, HISTORY_LENGTH};
pub use simulation::states::{Body, BodyBuilder, BodyId, BodySnapshot, Color};
pub use simulation::forces::{ForceCalculator, ForceSet, NewtonianGravity};
pub use simulation::integrator::Integrator;
pub use simulation::time_step::TimeStep;
pub use simulation::collision::{CollisionDetector, CollisionEvent};
pub use simulation::physics::{Physics, SharedPhysics, TickSummary};
pub use simulation::params::Parameters;
pub use simulation::scenario::Scenario;

pub use configuration::config::{IntegratorConfig, ParametersConfig, BodyConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_gravity, bench_tick};
