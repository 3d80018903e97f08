use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{target} returned {actual}, expected {expected}")]
    UnexpectedStatus {
        target: String,
        expected: u16,
        actual: u16,
    },

    #[error("{target} content is not as expected (missing {marker:?})")]
    UnexpectedBody { target: String, marker: String },

    #[error("Rate limiting not triggered (no {limit_status}), status codes: {statuses:?}")]
    RateLimitNotTriggered {
        limit_status: u16,
        statuses: Vec<u16>,
    },

    #[error("Rate limit worker failed: {reason}")]
    WorkerFailed { reason: String },

    #[error("Request to {url} failed: {source}")]
    ConnectionError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Assertion,
    Transport,
    Configuration,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::UnexpectedStatus { .. }
            | CheckError::UnexpectedBody { .. }
            | CheckError::RateLimitNotTriggered { .. } => ErrorCategory::Assertion,
            CheckError::WorkerFailed { .. } | CheckError::ConnectionError { .. } => {
                ErrorCategory::Transport
            }
            CheckError::IoError(_)
            | CheckError::ConfigError { .. }
            | CheckError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Process exit code when this error stops the run before any check starts.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Assertion | ErrorCategory::Transport => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CheckError::UnexpectedStatus { .. } | CheckError::UnexpectedBody { .. } => {
                "Check the nginx server blocks for the content and error ports"
            }
            CheckError::RateLimitNotTriggered { .. } => {
                "Check limit_req_zone / limit_req settings, or raise --burst-requests"
            }
            CheckError::ConnectionError { .. } | CheckError::WorkerFailed { .. } => {
                "Make sure the target is reachable, or raise --startup-delay-secs"
            }
            CheckError::IoError(_)
            | CheckError::ConfigError { .. }
            | CheckError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
