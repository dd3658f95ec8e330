use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Base64 decoding error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error("{service} responded with status {status}: {body}")]
    UpstreamError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    NotFound,
    Network,
    Upstream,
    Storage,
    Data,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::HttpError(_) => ErrorCategory::Network,
            AppError::CsvError(_) | AppError::SerializationError(_) => ErrorCategory::Data,
            AppError::DecodeError(_) => ErrorCategory::Validation,
            AppError::IoError(_) | AppError::StorageError { .. } => ErrorCategory::Storage,
            AppError::ConfigError { .. }
            | AppError::MissingConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            AppError::ValidationError { .. } => ErrorCategory::Validation,
            AppError::NotFound { .. } => ErrorCategory::NotFound,
            AppError::UpstreamError { .. } => ErrorCategory::Upstream,
            AppError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// Message safe to show to the end user. Only validation errors carry their
    /// own text; everything else collapses to a static message per category.
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::ValidationError { message, .. } => message.clone(),
            AppError::DecodeError(_) => "The uploaded file could not be read".to_string(),
            AppError::NotFound { entity, .. } => format!("{} not found", entity),
            _ => match self.category() {
                ErrorCategory::Network | ErrorCategory::Upstream => {
                    "A partner service is unavailable, please try again".to_string()
                }
                ErrorCategory::Storage => "The file could not be stored".to_string(),
                ErrorCategory::Configuration => "The service is misconfigured".to_string(),
                _ => "Something went wrong, please try again".to_string(),
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file and the required environment variables"
            }
            ErrorCategory::Validation => "Fix the highlighted field and submit the form again",
            ErrorCategory::NotFound => "Refresh the page; the record may have been removed",
            ErrorCategory::Network | ErrorCategory::Upstream => {
                "Retry the submission; the remote service may be temporarily down"
            }
            ErrorCategory::Storage => "Check the storage bucket permissions and retry",
            ErrorCategory::Data | ErrorCategory::Internal => {
                "Retry, and report the request id if it keeps failing"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
