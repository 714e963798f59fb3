use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("Unsupported API provider: {provider}")]
    UnsupportedProvider { provider: String },

    /// The provider answered with a non-success status and a readable error envelope.
    #[error("{provider} API error ({status}): {message}")]
    ProviderApi {
        provider: String,
        status: u16,
        message: String,
    },

    /// Non-success status whose body was not a recognizable error envelope.
    #[error("{provider} API request failed with status {status}")]
    RequestFailed { provider: String, status: u16 },

    #[error("Invalid response format from {provider}")]
    InvalidResponseFormat { provider: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration encoding error: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}
