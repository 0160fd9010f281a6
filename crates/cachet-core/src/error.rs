use thiserror::Error;

/// Core error type for cache manager assembly and lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Resolved configuration rejected its inputs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Two distinct service instances of the same concrete type were registered
    #[error("Duplicate service: {0}")]
    DuplicateService(String),

    /// A required service is not present in the locator
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// A service failed to start during manager initialization
    #[error("Service start error: {0}")]
    ServiceStart(String),

    /// Lifecycle operation invoked in the wrong state
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// A manager handle was asked for a capability the manager does not have
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Persistence directory handling failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Input/output error
    #[error("Input/output error: {0}")]
    IOError(String),

    /// Settings could not be parsed or validated
    #[error("Settings error: {0}")]
    Settings(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result alias used throughout the crate
pub type CoreResult<T> = Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::IOError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::Settings(err.to_string())
    }
}
