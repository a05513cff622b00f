use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("a string needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("timestep length must be positive, got {0}")]
    NonPositiveTimestep(f64),

    #[error("parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("driven index {index} is out of range for {n} points")]
    DrivenIndexOutOfRange { index: usize, n: usize },

    #[error("impulse index {index} is out of range for {n} points")]
    ImpulseIndexOutOfRange { index: usize, n: usize },

    #[error("initial displacements have length {got}, expected {expected}")]
    InitialLengthMismatch { got: usize, expected: usize },

    #[error("forcing duration must be positive, got {0}")]
    NonPositiveForcingDuration(f64),

    #[error("forcing settle time must be non-negative, got {0}")]
    NegativeSettle(f64),

    #[error("driven index {index} is on a clamped end and would never move")]
    DrivenIndexOnFixedBoundary { index: usize },
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}
