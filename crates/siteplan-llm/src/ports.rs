//! LLM port definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use siteplan_core::error::Result;
use siteplan_core::models::Speaker;

/// Role of a message in a chat-completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiRole {
    System,
    User,
    Assistant,
}

impl ApiRole {
    /// Upstream role for a transcript speaker; `None` for turns that stay local
    pub fn for_speaker(speaker: Speaker) -> Option<Self> {
        match speaker.api_role()? {
            "user" => Some(ApiRole::User),
            "assistant" => Some(ApiRole::Assistant),
            _ => None,
        }
    }
}

/// One message of a chat-completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: ApiRole,
    pub content: String,
}

impl ApiMessage {
    pub fn new(role: ApiRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ApiRole::System, content)
    }
}

/// Port for chat completion
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Complete a conversation
    ///
    /// # Arguments
    /// * `messages` - The full request, system instruction first
    ///
    /// # Returns
    /// The text of the single reply
    async fn complete(&self, messages: &[ApiMessage]) -> Result<String>;

    /// Get the name/identifier of the completion model
    fn model_name(&self) -> &str;
}
