pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod provider;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use prompt::{flatten_metadata, length_instruction, tone_instruction, PromptBuilder};
pub use provider::{LlmProvider, ProviderClient, TEMPERATURE};
