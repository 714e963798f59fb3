use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tapreply_core::{ApiProvider, CoreError, LlmError, PromptPair};
use tracing::{debug, error, info};

/// Fixed sampling temperature for every binding.
pub const TEMPERATURE: f32 = 1.0;

const USER_AGENT: &str = concat!("tapreply/", env!("CARGO_PKG_VERSION"));

/// One external LLM API. A binding performs a single request per call:
/// no retries, no streaming.
pub trait LlmProvider {
    async fn complete(&self, prompt: &PromptPair, api_key: &str) -> Result<String, CoreError>;
}

/// Routes a prompt to the binding named by the provider identifier.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    openai: OpenAiProvider,
    gemini: GeminiProvider,
}

impl ProviderClient {
    pub fn new() -> Result<Self, CoreError> {
        let http = build_http_client()?;
        Ok(Self {
            openai: OpenAiProvider::new(http.clone()),
            gemini: GeminiProvider::new(http),
        })
    }

    /// Points both bindings at alternate API roots, e.g. a local mock server.
    pub fn with_base_urls(openai_base: &str, gemini_base: &str) -> Result<Self, CoreError> {
        let http = build_http_client()?;
        Ok(Self {
            openai: OpenAiProvider::with_base_url(http.clone(), openai_base),
            gemini: GeminiProvider::with_base_url(http, gemini_base),
        })
    }

    pub async fn call(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        api_key: &str,
        provider: &str,
    ) -> Result<String, CoreError> {
        let provider: ApiProvider = provider.parse()?;
        let prompt = PromptPair {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        };
        self.call_provider(provider, &prompt, api_key).await
    }

    pub async fn call_provider(
        &self,
        provider: ApiProvider,
        prompt: &PromptPair,
        api_key: &str,
    ) -> Result<String, CoreError> {
        info!("Requesting reply from {}", provider.display_name());
        let reply = match provider {
            ApiProvider::OpenAi => self.openai.complete(prompt, api_key).await?,
            ApiProvider::Gemini => self.gemini.complete(prompt, api_key).await?,
        };
        debug!("Received {} characters from {}", reply.len(), provider);
        Ok(reply)
    }
}

fn build_http_client() -> Result<Client, CoreError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Reads a provider response. Non-success statuses become `ProviderApi` when
/// the body carries `{"error": {"message": ...}}`, otherwise `RequestFailed`.
pub(crate) async fn read_response<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, CoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("{} request failed with status {}", provider, status);
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .filter(|message| !message.trim().is_empty());

        return Err(match message {
            Some(message) => LlmError::ProviderApi {
                provider: provider.to_string(),
                status: status.as_u16(),
                message,
            },
            None => LlmError::RequestFailed {
                provider: provider.to_string(),
                status: status.as_u16(),
            },
        }
        .into());
    }

    serde_json::from_str(&body).map_err(|e| {
        error!("Failed to parse {} response: {}", provider, e);
        CoreError::Llm(LlmError::InvalidResponseFormat {
            provider: provider.to_string(),
        })
    })
}

/// Trimmed reply text, or `InvalidResponseFormat` when the expected path is
/// missing from an otherwise successful response.
pub(crate) fn reply_text(provider: &str, text: Option<String>) -> Result<String, CoreError> {
    text.map(|t| t.trim().to_string()).ok_or_else(|| {
        CoreError::Llm(LlmError::InvalidResponseFormat {
            provider: provider.to_string(),
        })
    })
}
