use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("Backend rejected credentials (status {status})")]
    AuthError { status: u16 },

    #[error("Unexpected response body: {message}")]
    ResponseParseError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Data,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LookupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::ApiError(_) => ErrorCategory::Network,
            LookupError::ApiStatusError { .. } | LookupError::AuthError { .. } => {
                ErrorCategory::Backend
            }
            LookupError::ResponseParseError { .. }
            | LookupError::SerializationError(_)
            | LookupError::CsvError(_) => ErrorCategory::Data,
            LookupError::IoError(_) => ErrorCategory::Io,
            LookupError::ConfigError { .. }
            | LookupError::MissingConfigError { .. }
            | LookupError::InvalidConfigValueError { .. }
            | LookupError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LookupError::ApiError(_) => ErrorSeverity::Medium,
            LookupError::ApiStatusError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            LookupError::ApiStatusError { .. } => ErrorSeverity::High,
            LookupError::AuthError { .. } => ErrorSeverity::High,
            LookupError::ResponseParseError { .. }
            | LookupError::SerializationError(_)
            | LookupError::CsvError(_) => ErrorSeverity::High,
            LookupError::IoError(_) => ErrorSeverity::High,
            LookupError::ConfigError { .. }
            | LookupError::MissingConfigError { .. }
            | LookupError::InvalidConfigValueError { .. }
            | LookupError::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LookupError::ApiError(e) if e.is_timeout() => {
                "The filter backend did not answer in time".to_string()
            }
            LookupError::ApiError(_) => "Could not reach the filter backend".to_string(),
            LookupError::ApiStatusError { status, .. } => {
                format!("The filter backend answered with HTTP {}", status)
            }
            LookupError::AuthError { .. } => "The filter backend refused the API key".to_string(),
            LookupError::ResponseParseError { .. } | LookupError::SerializationError(_) => {
                "Filter records could not be read".to_string()
            }
            LookupError::CsvError(_) => "Could not render the results as CSV".to_string(),
            LookupError::IoError(e) => format!("File access failed: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the --base-url value",
            ErrorCategory::Backend => match self {
                LookupError::AuthError { .. } => {
                    "Set a valid key with --api-key or FILTER_LOOKUP_API_KEY"
                }
                _ => "Verify the table and column names exposed by the backend",
            },
            ErrorCategory::Data => "Make sure the records carry an id and an integer array column",
            ErrorCategory::Io => "Check that the fixture path exists and is readable",
            ErrorCategory::Configuration => "Review the command line flags and the TOML config file",
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
