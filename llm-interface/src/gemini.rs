use crate::provider::{read_response, reply_text, LlmProvider, TEMPERATURE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tapreply_core::{CoreError, PromptPair};
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";
const PROVIDER_NAME: &str = "Gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// generateContent binding. There is no system role here, so both prompts
/// travel as one text part separated by a blank line. Thinking is disabled
/// to keep latency down.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    http: Client,
    endpoint: String,
}

impl GeminiProvider {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, GEMINI_API_BASE)
    }

    pub fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                GEMINI_MODEL
            ),
        }
    }

    fn build_request(&self, prompt: &PromptPair) -> GenerateContentRequest {
        let mut text = String::new();
        if !prompt.system_prompt.is_empty() {
            text.push_str(&prompt.system_prompt);
            text.push_str("\n\n");
        }
        text.push_str(&prompt.user_prompt);

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    async fn complete(&self, prompt: &PromptPair, api_key: &str) -> Result<String, CoreError> {
        let request = self.build_request(prompt);
        debug!("POST {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let generated: GenerateContentResponse = read_response(PROVIDER_NAME, response).await?;
        let text = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);
        reply_text(PROVIDER_NAME, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tapreply_core::LlmError;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn prompt(system: &str, user: &str) -> PromptPair {
        PromptPair {
            system_prompt: system.to_string(),
            user_prompt: user.to_string(),
        }
    }

    #[test]
    fn test_request_shape() {
        let provider = GeminiProvider::new(Client::new());
        let body = serde_json::to_value(provider.build_request(&prompt("be brief", "say hi"))).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "be brief\n\nsay hi" }] }],
                "generationConfig": {
                    "temperature": 1.0,
                    "thinkingConfig": { "thinkingBudget": 0 }
                }
            })
        );
    }

    #[test]
    fn test_empty_system_prompt_is_not_prefixed() {
        let provider = GeminiProvider::new(Client::new());
        let request = provider.build_request(&prompt("", "say hi"));
        assert_eq!(request.contents[0].parts[0].text, "say hi");
    }

    #[test]
    fn test_default_endpoint() {
        let provider = GeminiProvider::new(Client::new());
        assert_eq!(
            provider.endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        let response_body = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "\nfair point tbh  " }] },
                "finishReason": "STOP"
            }]
        });

        Mock::given(matchers::method("POST"))
            .and(matchers::path(GENERATE_PATH))
            .and(matchers::header("x-goog-api-key", "AIza-test"))
            .and(matchers::body_partial_json(json!({
                "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::with_base_url(Client::new(), &mock_server.uri());
        let reply = provider
            .complete(&prompt("sys", "user"), "AIza-test")
            .await
            .unwrap();
        assert_eq!(reply, "fair point tbh");
    }

    #[tokio::test]
    async fn test_complete_error_envelope() {
        let mock_server = MockServer::start().await;

        let error_body = json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        });

        Mock::given(matchers::method("POST"))
            .and(matchers::path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::with_base_url(Client::new(), &mock_server.uri());
        let result = provider.complete(&prompt("sys", "user"), "bad").await;

        match result.unwrap_err() {
            CoreError::Llm(LlmError::ProviderApi {
                provider, message, ..
            }) => {
                assert_eq!(provider, "Gemini");
                assert_eq!(message, "API key not valid. Please pass a valid API key.");
            }
            other => panic!("Expected ProviderApi, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_without_candidates() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::with_base_url(Client::new(), &mock_server.uri());
        let result = provider.complete(&prompt("sys", "user"), "AIza-test").await;

        assert!(matches!(
            result,
            Err(CoreError::Llm(LlmError::InvalidResponseFormat { .. }))
        ));
    }
}
