use crate::error::*;
use tracing::{error, info, warn};

pub const MISSING_API_KEY_MESSAGE: &str =
    "API key not configured. Please set your API key in the extension settings.";

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Llm(e) => {
                error!("LLM error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            CoreError::Extraction(e) => {
                error!("Extraction error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Llm(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Extraction(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network error. Please check your internet connection and try again.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid request: {}", message),
            CoreError::Serialization(e) => format!("Invalid request: {}", e),
            _ => "Failed to generate reply".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Llm(_) => "LLM".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Extraction(_) => "EXTRACTION".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for LlmError {
    fn log_error(&self) -> &Self {
        error!("LlmError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("LlmError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LlmError::UnsupportedProvider { .. } => "Unsupported API provider".to_string(),
            // Provider messages are passed through untouched.
            LlmError::ProviderApi { message, .. } => message.clone(),
            LlmError::RequestFailed { provider, .. } => {
                format!("{} API request failed", provider)
            }
            LlmError::InvalidResponseFormat { provider } => {
                format!("Unexpected response format from {}", provider)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            LlmError::UnsupportedProvider { .. } => "LLM_UNSUPPORTED_PROVIDER".to_string(),
            LlmError::ProviderApi { .. } => "LLM_PROVIDER_API".to_string(),
            LlmError::RequestFailed { .. } => "LLM_REQUEST_FAILED".to_string(),
            LlmError::InvalidResponseFormat { .. } => "LLM_INVALID_RESPONSE".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::MissingApiKey => MISSING_API_KEY_MESSAGE.to_string(),
            ConfigError::InvalidValue { field, value } => {
                format!("Invalid value '{}' for setting '{}'.", value, field)
            }
            ConfigError::Parse(_) | ConfigError::Encode(_) => {
                "Settings file format is invalid. Please check your settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::MissingApiKey => "CONFIG_MISSING_API_KEY".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
            ConfigError::Encode(_) => "CONFIG_ENCODE_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ExtractionError {
    fn log_error(&self) -> &Self {
        error!("ExtractionError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ExtractionError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        "Unable to extract post content. Please refresh the page and try again.".to_string()
    }

    fn error_code(&self) -> String {
        match self {
            ExtractionError::InvalidSelector { .. } => "EXTRACTION_INVALID_SELECTOR".to_string(),
        }
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
