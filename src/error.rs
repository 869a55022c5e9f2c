use indicatif::style::TemplateError;
use thiserror::Error;

pub type GymResult<T> = Result<T, GymError>;

#[derive(Debug, Error)]
pub enum GymError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Coarse error category, for callers that only branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Index or window outside the series bounds.
    Range,
    /// Stepping a terminated environment without an intervening reset.
    InvalidState,
    /// Non-finite action or malformed configuration.
    InvalidInput,
    /// Malformed or missing input data.
    Data,
    /// Failure raised inside a policy.
    Policy,
    /// File system or serialization failure.
    Io,
}

impl GymError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Data(DataError::IndexOutOfRange { .. } | DataError::WindowOutOfRange { .. }) => {
                ErrorKind::Range
            }
            Self::Data(_) => ErrorKind::Data,
            Self::Env(EnvError::InvalidState(_)) => ErrorKind::InvalidState,
            Self::Env(EnvError::InvalidAction(_) | EnvError::InvalidConfig(_)) => {
                ErrorKind::InvalidInput
            }
            Self::Env(_) => ErrorKind::Io,
            Self::Policy(_) => ErrorKind::Policy,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Errors occurring within policy logic.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Policy logic error: {0}")]
    Logic(String),

    #[error("Invalid input to policy: {0}")]
    InvalidInput(String),
}

/// Errors related to market data access and construction.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Window of size {size} ending at {end} out of range for series of length {len}")]
    WindowOutOfRange { end: usize, size: usize, len: usize },

    #[error("Invalid price bar at row {row}: {msg}")]
    InvalidBar { row: usize, msg: String },

    #[error("Market series is empty: {0}")]
    EmptySeries(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Data frame error: {0}")]
    DataFrame(String),
}

/// Errors related to environment configuration and the step loop.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Invalid environment state: {0}")]
    InvalidState(String),

    #[error("Invalid action: {0} is not a finite number")]
    InvalidAction(f64),

    #[error("Invalid environment configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to encode EnvConfig")]
    Encoding(#[from] postcard::Error),

    #[error("Progress bar error")]
    ProgressBar(#[from] TemplateError),
}

/// Errors related to file I/O and serialization.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),
}
