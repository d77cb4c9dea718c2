//! Error types for libsnoo

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnooError>;

#[derive(Error, Debug)]
pub enum SnooError {
    /// The operation needs a logged-in session
    #[error("Authentication required: log in or load a session first")]
    AuthenticationRequired,

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Path template expects {expected} argument(s), got {given}")]
    PathArguments { expected: usize, given: usize },

    /// The request did not produce a usable HTTP response. `status` is the
    /// status line for non-success answers, or `network error: ...` when no
    /// response arrived at all.
    #[error("HTTP request failed: {status}")]
    Transport { status: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("API error: {0}")]
    Api(ErrorList),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(ErrorList),

    #[error("Session file is corrupt: {0}")]
    SessionCorrupt(String),

    #[error("No session file path configured")]
    MissingPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SnooError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SnooError::AuthenticationRequired | SnooError::InvalidCredentials(_) => 2,
            SnooError::InvalidInput(_)
            | SnooError::UnknownOperation(_)
            | SnooError::PathArguments { .. } => 3,
            _ => 1,
        }
    }

    /// A transport failure with no HTTP status (connect, timeout, TLS, ...)
    pub fn network(cause: impl fmt::Display) -> Self {
        SnooError::Transport {
            status: format!("network error: {}", cause),
        }
    }

    /// The service-reported error list, if this error carries one
    pub fn api_errors(&self) -> Option<&ErrorList> {
        match self {
            SnooError::Api(errors) | SnooError::InvalidCredentials(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SnooError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => SnooError::Transport {
                status: status.to_string(),
            },
            None => SnooError::network(error),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// One `[code, message, field]` entry from a `json.errors` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorEntry {
    pub code: String,
    pub message: String,
    pub field: Option<String>,
}

/// Service-level errors reported inside an otherwise successful response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(pub Vec<ApiErrorEntry>);

impl ErrorList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn entries(&self) -> &[ApiErrorEntry] {
        &self.0
    }

    /// The human-readable messages, in the order the service sent them
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|entry| entry.message.as_str()).collect()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.0.iter().map(|entry| entry.code.as_str()).collect()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.0.iter().any(|entry| entry.code == code)
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}
