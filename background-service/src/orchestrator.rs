use crate::messages::{ActionResponse, BackgroundMessage, GenerateReplyRequest, TestConnectionRequest};
use llm_interface::{PromptBuilder, ProviderClient};
use tapreply_core::{
    ConfigError, CoreError, ErrorExt, ErrorReporter, ReplyRequest, SettingsStore, Tone,
};
use tracing::{debug, info, warn};

pub const NO_CONTENT_MESSAGE: &str =
    "No post content available. Please refresh the page and try again.";
pub const NO_API_KEY_MESSAGE: &str = "No API key provided";
pub const CONNECTION_PASSED_MESSAGE: &str = "API connection test passed";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from API";

const TEST_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Respond with exactly what the user asks for.";
const TEST_USER_PROMPT: &str =
    "Generate a simple test response. Just say 'API connection successful!'";
const TEST_SUCCESS_MARKER: &str = "successful";

/// Handles UI requests: reads settings, builds prompts and calls the
/// configured provider. Every outcome is returned as an [`ActionResponse`];
/// nothing here returns an error to the caller.
pub struct RequestOrchestrator<S: SettingsStore> {
    settings: S,
    client: ProviderClient,
    reporter: ErrorReporter,
}

impl<S: SettingsStore> RequestOrchestrator<S> {
    pub fn new(settings: S, client: ProviderClient) -> Self {
        Self {
            settings,
            client,
            reporter: ErrorReporter::new(),
        }
    }

    /// Stores `tone` as the preferred tone, as picking a tone in the popup does.
    pub fn select_tone(&self, tone: Tone) -> Result<(), CoreError> {
        let mut settings = self.settings.load()?;
        if settings.preferred_tone != tone {
            settings.preferred_tone = tone;
            self.settings.save(&settings)?;
            debug!("Preferred tone set to {}", tone);
        }
        Ok(())
    }

    pub async fn handle_message(&self, message: BackgroundMessage) -> ActionResponse {
        match message {
            BackgroundMessage::GenerateReply { data } => self.generate_reply(data).await,
            BackgroundMessage::TestApiConnection { data } => self.test_api_connection(data).await,
            BackgroundMessage::SettingsUpdated { .. } => self.settings_updated(),
        }
    }

    /// Parses a raw JSON message and dispatches it.
    pub async fn handle_json(&self, raw: &str) -> ActionResponse {
        match serde_json::from_str::<BackgroundMessage>(raw) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                let error = CoreError::from(e);
                self.reporter.report_warning(&error);
                ActionResponse::failure(error.user_friendly_message())
            }
        }
    }

    pub async fn generate_reply(&self, request: GenerateReplyRequest) -> ActionResponse {
        let content = match request.content.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                warn!("generateReply called without post content");
                return ActionResponse::failure(NO_CONTENT_MESSAGE);
            }
        };

        match self.try_generate(&content, &request).await {
            Ok(reply) => {
                info!("Generated {} reply ({} chars)", request.platform, reply.len());
                ActionResponse::reply(reply)
            }
            Err(e) => {
                self.reporter.report_error(&e);
                ActionResponse::failure(failure_message(&e, "Failed to generate reply"))
            }
        }
    }

    async fn try_generate(
        &self,
        content: &str,
        request: &GenerateReplyRequest,
    ) -> Result<String, CoreError> {
        let settings = self.settings.load()?;
        if !settings.has_api_key() {
            return Err(ConfigError::MissingApiKey.into());
        }

        let reply_request = ReplyRequest::new(request.tone.unwrap_or(settings.preferred_tone))
            .with_length(settings.reply_length)
            .with_user_knowledge(settings.user_knowledge.clone())
            .with_all_lowercase(settings.all_lowercase);

        let prompt = PromptBuilder::build(
            content,
            request.metadata.as_ref(),
            request.platform,
            &reply_request,
        )?;

        let config = settings.provider_config();
        debug!("Using provider config {:?}", config);
        self.client
            .call(
                &prompt.system_prompt,
                &prompt.user_prompt,
                config.api_key.trim(),
                &config.provider,
            )
            .await
    }

    /// Sends a canned prompt with the supplied key. Success is judged by the
    /// reply mentioning the word "successful".
    pub async fn test_api_connection(&self, request: TestConnectionRequest) -> ActionResponse {
        let api_key = request.api_key.trim();
        if api_key.is_empty() {
            return ActionResponse::failure(NO_API_KEY_MESSAGE);
        }

        info!("Testing connection to provider '{}'", request.provider);
        match self
            .client
            .call(TEST_SYSTEM_PROMPT, TEST_USER_PROMPT, api_key, &request.provider)
            .await
        {
            Ok(reply) if reply.contains(TEST_SUCCESS_MARKER) => {
                ActionResponse::message(CONNECTION_PASSED_MESSAGE)
            }
            Ok(reply) => {
                warn!("Connection test got unexpected reply: {}", reply);
                ActionResponse::failure(UNEXPECTED_RESPONSE_MESSAGE)
            }
            Err(e) => {
                self.reporter.report_error(&e);
                ActionResponse::failure(failure_message(&e, "API test failed"))
            }
        }
    }

    pub fn settings_updated(&self) -> ActionResponse {
        info!("Settings updated");
        ActionResponse::ack()
    }
}

/// User-facing text for a failed action. Errors without a specific message
/// of their own fall back to `fallback`.
fn failure_message(error: &CoreError, fallback: &str) -> String {
    match error {
        CoreError::Io(_) | CoreError::Internal { .. } => fallback.to_string(),
        _ => error.user_friendly_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapreply_core::{LlmError, MemorySettingsStore, Platform, Settings};

    fn orchestrator(settings: Settings) -> RequestOrchestrator<MemorySettingsStore> {
        // Unroutable base URLs: none of these tests may reach the network.
        let client = ProviderClient::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9")
            .unwrap();
        RequestOrchestrator::new(MemorySettingsStore::new(settings), client)
    }

    fn request(content: Option<&str>) -> GenerateReplyRequest {
        GenerateReplyRequest {
            content: content.map(str::to_string),
            metadata: None,
            tone: None,
            platform: Platform::Twitter,
        }
    }

    #[tokio::test]
    async fn test_blank_content_is_rejected() {
        let orchestrator = orchestrator(Settings::default());

        for content in [None, Some(""), Some("   \n")] {
            let response = orchestrator.generate_reply(request(content)).await;
            assert_eq!(response, ActionResponse::failure(NO_CONTENT_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let orchestrator = orchestrator(Settings::default());
        let response = orchestrator.generate_reply(request(Some("hello world"))).await;

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("API key not configured. Please set your API key in the extension settings.")
        );
    }

    #[tokio::test]
    async fn test_unsupported_platform() {
        let settings = Settings {
            api_key: "sk-test".to_string(),
            ..Settings::default()
        };
        let orchestrator = orchestrator(settings);
        let mut req = request(Some("hello world"));
        req.platform = Platform::Unsupported;

        let response = orchestrator.generate_reply(req).await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("Invalid request:"));
    }

    #[tokio::test]
    async fn test_connection_requires_key() {
        let orchestrator = orchestrator(Settings::default());
        let response = orchestrator
            .test_api_connection(TestConnectionRequest {
                provider: "openai".to_string(),
                api_key: "  ".to_string(),
            })
            .await;

        assert_eq!(response, ActionResponse::failure(NO_API_KEY_MESSAGE));
    }

    #[tokio::test]
    async fn test_settings_updated_acknowledges() {
        let orchestrator = orchestrator(Settings::default());
        let response = orchestrator
            .handle_json(r#"{"action":"settingsUpdated","settings":{"apiProvider":"gemini"}}"#)
            .await;
        assert_eq!(response, ActionResponse::ack());
    }

    #[tokio::test]
    async fn test_malformed_message() {
        let orchestrator = orchestrator(Settings::default());

        let response = orchestrator.handle_json("{not json").await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("Invalid request:"));

        let response = orchestrator
            .handle_json(r#"{"action":"generateReply","data":{"content":"hi","platform":"myspace"}}"#)
            .await;
        assert!(response.error.unwrap().starts_with("Invalid request:"));
    }

    #[test]
    fn test_select_tone_persists_preference() {
        let orchestrator = orchestrator(Settings::default());

        orchestrator.select_tone(Tone::Witty).unwrap();
        let saved = orchestrator.settings.load().unwrap();
        assert_eq!(saved.preferred_tone, Tone::Witty);
        assert_eq!(saved.reply_length, Settings::default().reply_length);
    }

    #[test]
    fn test_failure_message_fallback() {
        let internal = CoreError::Internal {
            message: "settings lock poisoned".to_string(),
        };
        assert_eq!(failure_message(&internal, "API test failed"), "API test failed");

        let unsupported = CoreError::Llm(LlmError::UnsupportedProvider {
            provider: "bogus".to_string(),
        });
        assert_eq!(
            failure_message(&unsupported, "API test failed"),
            "Unsupported API provider"
        );
    }
}
