use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElectionError {
    #[error("Missing required {entity} record ({reference})")]
    MissingRecordError { entity: String, reference: String },

    #[error("Organisation {organisation} has no boundary geometry")]
    MissingGeometryError { organisation: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Notification failed: {message}")]
    NotificationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Parsing,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ElectionError {
    pub fn missing_record(entity: &str, reference: impl Into<String>) -> Self {
        ElectionError::MissingRecordError {
            entity: entity.to_string(),
            reference: reference.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ElectionError::ParseError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ElectionError::MissingRecordError { .. }
            | ElectionError::MissingGeometryError { .. }
            | ElectionError::SerializationError(_) => ErrorCategory::Data,
            ElectionError::ParseError { .. } => ErrorCategory::Parsing,
            ElectionError::ApiError(_)
            | ElectionError::HttpStatusError { .. }
            | ElectionError::NotificationError { .. } => ErrorCategory::Network,
            ElectionError::ConfigError { .. }
            | ElectionError::ConfigValidationError { .. }
            | ElectionError::InvalidConfigValueError { .. }
            | ElectionError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ElectionError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 通知失敗也會中斷本次 snoop，不能當成功
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Parsing | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ElectionError::MissingRecordError { .. } => {
                "Check that every required association (type, organisation, division) exists in the record source"
            }
            ElectionError::MissingGeometryError { .. } => {
                "Import a boundary for the organisation before requesting the geographic projection"
            }
            ElectionError::ParseError { .. } => {
                "The listing page layout may have changed; inspect the page and update the snooper"
            }
            ElectionError::ApiError(_) | ElectionError::HttpStatusError { .. } => {
                "Check network connectivity and that the source site is reachable, then retry"
            }
            ElectionError::NotificationError { .. } => {
                "Check the Slack webhook URL; the record was stored and will not be re-announced"
            }
            ElectionError::IoError(_) => "Check file permissions and available disk space",
            ElectionError::SerializationError(_) => {
                "Check that the input file is valid JSON with the expected record layout"
            }
            ElectionError::ConfigError { .. }
            | ElectionError::ConfigValidationError { .. }
            | ElectionError::InvalidConfigValueError { .. }
            | ElectionError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ElectionError::MissingRecordError { entity, .. } => {
                format!("A required {} record could not be found", entity)
            }
            ElectionError::MissingGeometryError { organisation } => {
                format!("No boundary is available for {}", organisation)
            }
            ElectionError::ParseError { .. } => {
                "The by-election listing could not be read".to_string()
            }
            ElectionError::ApiError(_) | ElectionError::HttpStatusError { .. } => {
                "The source site could not be reached".to_string()
            }
            ElectionError::NotificationError { .. } => {
                "A new election was stored but the notification was not delivered".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ErrorSeverity {
    /// CLI 退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ElectionError>;
