use crate::provider::{read_response, reply_text, LlmProvider, TEMPERATURE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tapreply_core::{CoreError, PromptPair};
use tracing::debug;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-4.1";
const PROVIDER_NAME: &str = "OpenAI";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions binding. The system prompt becomes a `system` message
/// ahead of the single `user` message.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http: Client,
    endpoint: String,
    model: &'static str,
}

impl OpenAiProvider {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, OPENAI_API_BASE)
    }

    pub fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: OPENAI_MODEL,
        }
    }

    fn build_request<'a>(&'a self, prompt: &'a PromptPair) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &prompt.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user_prompt,
        });

        ChatCompletionRequest {
            model: self.model,
            messages,
            temperature: TEMPERATURE,
        }
    }
}

impl LlmProvider for OpenAiProvider {
    async fn complete(&self, prompt: &PromptPair, api_key: &str) -> Result<String, CoreError> {
        let request = self.build_request(prompt);
        debug!(
            "POST {} model={} messages={}",
            self.endpoint,
            request.model,
            request.messages.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let completion: ChatCompletionResponse = read_response(PROVIDER_NAME, response).await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        reply_text(PROVIDER_NAME, text)
    }
}
