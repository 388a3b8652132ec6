use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Provisioning API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Billing database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Database,
    Provisioning,
    Data,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ConfigError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::TomlError(_)
            | SyncError::IoError(_) => ErrorCategory::Configuration,
            SyncError::DatabaseError(_) => ErrorCategory::Database,
            SyncError::ApiError(_) => ErrorCategory::Provisioning,
            SyncError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the environment variables (or the config file) and try again"
            }
            ErrorCategory::Database => {
                "Check DB_HOST/DB_NAME/DB_USER/DB_PASSWORD and that the billing database is reachable"
            }
            ErrorCategory::Provisioning => {
                "Check PTERO_URL and PTERO_API_KEY and that the panel API is reachable"
            }
            ErrorCategory::Data => "The panel returned an unexpected response body",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
