use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Analytics forwarding failed: {message}")]
    ForwardError { message: String },

    #[error("Enrichment failed for item {item_id}: {message}")]
    EnrichmentError { item_id: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Persistence,
    Forward,
    Enrichment,
    Configuration,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::ValidationError { .. } => ErrorCategory::Validation,
            RelayError::IoError(_) | RelayError::SerializationError(_) => {
                ErrorCategory::Persistence
            }
            RelayError::ApiError(_) | RelayError::ForwardError { .. } => ErrorCategory::Forward,
            RelayError::EnrichmentError { .. } => ErrorCategory::Enrichment,
            RelayError::UrlError(_)
            | RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Only caller input problems are the caller's fault.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
