use tapreply_core::{
    ConfigError, CoreError, ErrorExt, ErrorReporter, ExtractionError, LlmError,
    MISSING_API_KEY_MESSAGE,
};

#[test]
fn test_error_codes() {
    let llm_error = CoreError::Llm(LlmError::UnsupportedProvider {
        provider: "bogus".to_string(),
    });
    assert_eq!(llm_error.error_code(), "LLM");

    let config_error = CoreError::Config(ConfigError::MissingApiKey);
    assert_eq!(config_error.error_code(), "CONFIG");

    let extraction_error = CoreError::Extraction(ExtractionError::InvalidSelector {
        selector: "[".to_string(),
        reason: "unexpected end".to_string(),
    });
    assert_eq!(extraction_error.error_code(), "EXTRACTION");

    let internal = CoreError::Internal {
        message: "boom".to_string(),
    };
    assert_eq!(internal.error_code(), "INTERNAL");
}

#[test]
fn test_missing_key_message_calls_for_settings() {
    let error = CoreError::Config(ConfigError::MissingApiKey);
    let message = error.user_friendly_message();
    assert_eq!(message, MISSING_API_KEY_MESSAGE);
    assert!(message.starts_with("API key not configured"));
    assert!(message.contains("settings"));
}

#[test]
fn test_provider_message_is_passed_through_verbatim() {
    let error = CoreError::Llm(LlmError::ProviderApi {
        provider: "OpenAI".to_string(),
        status: 401,
        message: "Incorrect API key provided: sk-xxxx.".to_string(),
    });
    assert_eq!(
        error.user_friendly_message(),
        "Incorrect API key provided: sk-xxxx."
    );
}

#[test]
fn test_generic_provider_fallback_message() {
    let error = CoreError::Llm(LlmError::RequestFailed {
        provider: "Gemini".to_string(),
        status: 502,
    });
    assert_eq!(error.user_friendly_message(), "Gemini API request failed");
}

#[test]
fn test_unsupported_provider_message() {
    let error = CoreError::Llm(LlmError::UnsupportedProvider {
        provider: "bogus".to_string(),
    });
    assert_eq!(error.user_friendly_message(), "Unsupported API provider");
    assert!(error.to_string().contains("bogus"));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::Config(ConfigError::MissingApiKey);

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}
