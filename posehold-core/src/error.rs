//! Errors in the library.
use thiserror::Error;

/// List of errors in the library.
#[derive(Error, Debug)]
pub enum PoseholdError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: expected {0}")]
    RecordValueTypeError(String),

    /// No environment was registered with the given name.
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// A config override names a field the configuration does not have.
    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    /// A configuration value is out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Parameters of a tolerance curve are out of range.
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),

    /// A model description failed validation.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// The length of an action does not match the number of actuators.
    #[error("Action dimension mismatch: expected {expected}, got {actual}")]
    ActionDimension {
        /// Number of actuators of the model.
        expected: usize,
        /// Length of the given action.
        actual: usize,
    },
}
