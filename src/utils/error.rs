use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeetingError {
    #[error("Participant source not found: {path}")]
    SourceNotFound { path: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Time conversion failed: {message}")]
    ConversionError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Input,
    Conversion,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl MeetingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        MeetingError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        MeetingError::ConversionError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MeetingError::SourceNotFound { .. } => ErrorCategory::Source,
            MeetingError::InvalidInput { .. } => ErrorCategory::Input,
            MeetingError::ConversionError { .. } => ErrorCategory::Conversion,
            MeetingError::IoError(_)
            | MeetingError::CsvError(_)
            | MeetingError::SerializationError(_) => ErrorCategory::Storage,
            MeetingError::ConfigError { .. } | MeetingError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Conversion => ErrorSeverity::Medium,
            ErrorCategory::Source | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MeetingError::SourceNotFound { path } => format!(
                "Check that '{}' exists and contains one `name offset` pair per line",
                path
            ),
            MeetingError::InvalidInput { .. } => {
                "Use the yyyy-MM-dd HH:mm:ss format for the meeting date and give every participant a name and a timezone".to_string()
            }
            MeetingError::ConversionError { .. } => {
                "Use a GMT offset such as GMT+5 or GMT-03:30, or an IANA zone such as Europe/Warsaw".to_string()
            }
            MeetingError::IoError(_) | MeetingError::CsvError(_) => {
                "Check that the output directory is writable".to_string()
            }
            MeetingError::SerializationError(_) => {
                "The session state file is corrupt; remove it to start a fresh history".to_string()
            }
            MeetingError::ConfigError { field, .. }
            | MeetingError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration", field)
            }
        }
    }

    /// Message meant for the person running the tool, without internal detail.
    pub fn user_friendly_message(&self) -> String {
        match self {
            MeetingError::SourceNotFound { path } => {
                format!("Could not read the participant file '{}'", path)
            }
            MeetingError::InvalidInput { message } => message.clone(),
            MeetingError::ConversionError { message } => message.clone(),
            MeetingError::IoError(_) | MeetingError::CsvError(_) => {
                "Could not write the meeting tables".to_string()
            }
            MeetingError::SerializationError(_) => "Could not read the session state".to_string(),
            MeetingError::ConfigError { .. } | MeetingError::InvalidConfigValueError { .. } => {
                self.to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MeetingError>;
