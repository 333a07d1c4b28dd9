use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Invalid value for '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Inference failed: {message}")]
    InferenceError { message: String },

    #[error("Explanation service request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Explanation service error: {message}")]
    ExplanationError { message: String },

    #[error("Failed to load model artifact '{path}': {message}")]
    ModelLoadError { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Inference,
    Explanation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PredictorError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::InferenceError {
            message: message.into(),
        }
    }

    pub fn explanation(message: impl Into<String>) -> Self {
        Self::ExplanationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::InferenceError { .. } => ErrorCategory::Inference,
            Self::TransportError(_) | Self::ExplanationError { .. } => ErrorCategory::Explanation,
            Self::ModelLoadError { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Explanation => ErrorSeverity::Low,
            ErrorCategory::Inference => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether the error belongs in a request-level error payload rather than
    /// aborting the process.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Inference
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, message } => {
                format!("Field '{}' is invalid: {}", field, message)
            }
            Self::InferenceError { .. } => {
                "The model could not produce a prediction for this passenger".to_string()
            }
            Self::TransportError(_) | Self::ExplanationError { .. } => {
                "The explanation service is currently unavailable".to_string()
            }
            Self::ModelLoadError { path, .. } => {
                format!("Could not load the model artifact at '{}'", path)
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            Self::IoError(e) => format!("File system error: {}", e),
            Self::SerializationError(e) => format!("Malformed JSON: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Send Pclass as an integer, Sex as a string and Age as a non-negative number"
            }
            Self::InferenceError { .. } => "Check that the model artifact matches the feature layout [Pclass, Sex, Age]",
            Self::TransportError(_) | Self::ExplanationError { .. } => {
                "Check the explanation endpoint, API key and network connectivity"
            }
            Self::ModelLoadError { .. } => "Check the [model] path and that the file is a valid model artifact",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file and command line flags",
            Self::IoError(_) => "Check file permissions and that the path exists",
            Self::SerializationError(_) => "Check that the JSON document is well formed",
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
