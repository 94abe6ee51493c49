use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the simulation core and its configuration layer.
///
/// Running out of collisions is never an error; detection reports an empty
/// set instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid body descriptor or simulation parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A thread panicked while holding the shared physics lock.
    #[error("physics lock poisoned by a panicked holder")]
    LockPoisoned,

    /// Scenario file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Scenario file could not be parsed.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
