use crate::error::{ConfigError, CoreError, LlmError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered key/value metadata pulled from a post. Values are scalars or one
/// level of nested objects (e.g. `engagement`).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Reddit,
    Unsupported,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Reddit => "reddit",
            Platform::Unsupported => "unsupported",
        }
    }

    /// Label used in prompts and user-facing text. `None` for unsupported pages.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            Platform::Twitter => Some("Twitter/X"),
            Platform::Reddit => Some("Reddit"),
            Platform::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one extraction pass over a page. `text == None` means there is
/// nothing to reply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub platform: Platform,
    #[serde(rename = "content")]
    pub text: Option<String>,
    pub metadata: Option<Metadata>,
}

impl ExtractedContent {
    pub fn unsupported() -> Self {
        Self {
            platform: Platform::Unsupported,
            text: None,
            metadata: None,
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Short form of the post text for display, cut at 200 characters.
    pub fn preview(&self) -> Option<String> {
        let text = self.text.as_deref()?;
        if text.chars().count() > PREVIEW_CHARS {
            let cut: String = text.chars().take(PREVIEW_CHARS).collect();
            Some(format!("{}...", cut))
        } else {
            Some(text.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Supportive,
    Analytical,
    Witty,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Supportive, Tone::Analytical, Tone::Witty];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Supportive => "supportive",
            Tone::Analytical => "analytical",
            Tone::Witty => "witty",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supportive" => Ok(Tone::Supportive),
            "analytical" => Ok(Tone::Analytical),
            "witty" => Ok(Tone::Witty),
            other => Err(ConfigError::InvalidValue {
                field: "tone".to_string(),
                value: other.to_string(),
            }
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ReplyLength {
    pub const ALL: [ReplyLength; 3] = [ReplyLength::Short, ReplyLength::Medium, ReplyLength::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyLength::Short => "short",
            ReplyLength::Medium => "medium",
            ReplyLength::Long => "long",
        }
    }
}

impl fmt::Display for ReplyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyLength {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(ReplyLength::Short),
            "medium" => Ok(ReplyLength::Medium),
            "long" => Ok(ReplyLength::Long),
            other => Err(ConfigError::InvalidValue {
                field: "replyLength".to_string(),
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// User selections that shape a reply, built per request from the tone the
/// caller picked and the persisted style settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    pub tone: Tone,
    pub length: ReplyLength,
    pub user_knowledge: String,
    pub all_lowercase: bool,
}

impl ReplyRequest {
    pub fn new(tone: Tone) -> Self {
        Self {
            tone,
            length: ReplyLength::default(),
            user_knowledge: String::new(),
            all_lowercase: false,
        }
    }

    pub fn with_length(mut self, length: ReplyLength) -> Self {
        self.length = length;
        self
    }

    pub fn with_user_knowledge(mut self, knowledge: impl Into<String>) -> Self {
        self.user_knowledge = knowledge.into();
        self
    }

    pub fn with_all_lowercase(mut self, enabled: bool) -> Self {
        self.all_lowercase = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    OpenAi,
    Gemini,
}

impl ApiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiProvider::OpenAi => "openai",
            ApiProvider::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ApiProvider::OpenAi => "OpenAI",
            ApiProvider::Gemini => "Gemini",
        }
    }

    /// Advisory shape check for a key. Returns a hint when the key does not
    /// look like one this provider issues.
    pub fn validate_key(&self, key: &str) -> Option<&'static str> {
        let key = key.trim();
        match self {
            ApiProvider::OpenAi if !(key.starts_with("sk-") && key.len() > 20) => Some(
                "OpenAI API keys start with \"sk-\" and are longer than 20 characters",
            ),
            ApiProvider::Gemini if !(key.starts_with("AIza") && key.len() > 30) => Some(
                "Gemini API keys start with \"AIza\" and are longer than 30 characters",
            ),
            _ => None,
        }
    }
}

impl fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ApiProvider::OpenAi),
            "gemini" => Ok(ApiProvider::Gemini),
            other => Err(LlmError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}
