//! Request and response shapes exchanged with the UI layer.

use serde::{Deserialize, Serialize};
use tapreply_core::{Metadata, Platform, Settings, Tone};

/// One message sent to the background worker, tagged by `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BackgroundMessage {
    GenerateReply {
        data: GenerateReplyRequest,
    },
    TestApiConnection {
        data: TestConnectionRequest,
    },
    /// Sent by the options page after a save. The payload is informational;
    /// settings are re-read from the store on every request.
    SettingsUpdated {
        #[serde(default)]
        settings: Option<Settings>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateReplyRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    /// Falls back to the preferred tone in settings when absent.
    #[serde(default)]
    pub tone: Option<Tone>,
    pub platform: Platform,
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionRequest {
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for TestConnectionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestConnectionRequest")
            .field("provider", &self.provider)
            .field("api_key", &tapreply_core::redact(&self.api_key))
            .finish()
    }
}

/// Tagged result returned for every message. Exactly one of `reply`,
/// `message` or `error` is set, except for a bare acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn ack() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn reply(reply: impl Into<String>) -> Self {
        Self {
            success: true,
            reply: Some(reply.into()),
            ..Default::default()
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
