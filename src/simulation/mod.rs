pub mod vector;
pub mod history;
pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod time_step;
pub mod collision;
pub mod physics;
pub mod scenario;
