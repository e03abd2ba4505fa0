use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Failures of a single backend request.
///
/// These never reach the user verbatim: loaders log them and render a
/// generic message in the affected panel.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network failure: {message}")]
    Network { message: String },

    #[error("Unexpected status: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Parse failure: {message}")]
    Parse { message: String },
}

/// Coarse classification of a [`FetchError`], used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// Request could not complete.
    Network,
    /// Non-success response.
    Status,
    /// Body not in the expected shape.
    Parse,
}

impl FetchFailureKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchFailureKind::Network => "network",
            FetchFailureKind::Status => "status",
            FetchFailureKind::Parse => "parse",
        }
    }
}

impl std::fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FetchError {
    /// Which part of the taxonomy this failure belongs to.
    pub fn kind(&self) -> FetchFailureKind {
        match self {
            FetchError::Network { .. } => FetchFailureKind::Network,
            FetchError::Status { .. } => FetchFailureKind::Status,
            FetchError::Parse { .. } => FetchFailureKind::Parse,
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for backend fetches
pub type FetchResult<T> = Result<T, FetchError>;
