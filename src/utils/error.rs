use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Storage error for key '{key}': {message}")]
    StorageError { key: String, message: String },

    #[error("Import error in '{source_name}': {message}")]
    ImportError { source_name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChecklistError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChecklistError::CsvError(_) | ChecklistError::ImportError { .. } => {
                ErrorCategory::Input
            }
            ChecklistError::ConfigError { .. }
            | ChecklistError::ConfigValidationError { .. }
            | ChecklistError::InvalidConfigValueError { .. }
            | ChecklistError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ChecklistError::IoError(_) | ChecklistError::StorageError { .. } => {
                ErrorCategory::Storage
            }
            ChecklistError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一檔案匯入失敗不影響其他資料
            ChecklistError::CsvError(_) | ChecklistError::ImportError { .. } => ErrorSeverity::Low,
            ChecklistError::SerializationError(_) => ErrorSeverity::Medium,
            ChecklistError::ConfigError { .. }
            | ChecklistError::ConfigValidationError { .. }
            | ChecklistError::InvalidConfigValueError { .. }
            | ChecklistError::MissingConfigError { .. } => ErrorSeverity::High,
            ChecklistError::IoError(_) | ChecklistError::StorageError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ChecklistError::CsvError(e) => format!("Could not read the CSV file: {}", e),
            ChecklistError::IoError(e) => format!("A file could not be read or written: {}", e),
            ChecklistError::SerializationError(_) => {
                "Saved checklist data could not be encoded".to_string()
            }
            ChecklistError::ConfigError { message } => {
                format!("Configuration problem: {}", message)
            }
            ChecklistError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            ChecklistError::InvalidConfigValueError { field, value, reason } => {
                format!("Setting '{}' has an invalid value '{}': {}", field, value, reason)
            }
            ChecklistError::MissingConfigError { field } => {
                format!("Required configuration is missing: {}", field)
            }
            ChecklistError::StorageError { key, .. } => {
                format!("Checklist data under '{}' could not be saved", key)
            }
            ChecklistError::ImportError { source_name, message } => {
                format!("'{}' could not be imported: {}", source_name, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check that the file is a CSV export with a header row",
            ErrorCategory::Configuration => {
                "Review the configuration file and command-line overrides"
            }
            ErrorCategory::Storage => {
                "Make sure the data directory exists and is writable, then retry"
            }
            ErrorCategory::Data => "Run `remove-all` to reset the saved checklist if it persists",
        }
    }
}

pub type Result<T> = std::result::Result<T, ChecklistError>;
