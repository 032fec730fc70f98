//! OpenAI chat-completion adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use siteplan_core::config::LayeredConfig;
use siteplan_core::error::{Result, SiteplanError};

use crate::ports::{ApiMessage, ChatCompleter};

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI chat-completion client
///
/// The credential is optional at construction time: a missing key only
/// surfaces as a [`SiteplanError::RemoteCall`] when a request is made, so the
/// map and selection keep working without one.
pub struct OpenAiChat {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiChat {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Client for the configured endpoint and model, keyed from `OPENAI_API_KEY`
    pub fn from_config(config: &LayeredConfig) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("{} is not set, chat requests will fail", API_KEY_ENV);
        }

        Self::new(config.api_base_url.value.clone(), config.model.value.clone(), api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage],
    n: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl ChatCompleter for OpenAiChat {
    async fn complete(&self, messages: &[ApiMessage]) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SiteplanError::remote(format!("{} is not set", API_KEY_ENV)))?;

        let request = CompletionRequest {
            model: &self.model,
            messages,
            n: 1,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "Requesting completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SiteplanError::remote(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SiteplanError::remote(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|err| err.error.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
            return Err(SiteplanError::remote(message));
        }

        let response: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| SiteplanError::remote(format!("Malformed completion response: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SiteplanError::remote("No choices in completion response"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let chat = OpenAiChat::new("http://localhost:9999/v1/", "gpt-4.1-mini", None);
        assert_eq!(chat.endpoint(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(chat.model_name(), "gpt-4.1-mini");
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ApiMessage::system("You are an urban planning assistant.")];
        let request = CompletionRequest {
            model: "gpt-4.1-mini",
            messages: &messages,
            n: 1,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4.1-mini");
        assert_eq!(json["n"], 1);
        assert_eq!(json["messages"][0]["role"], "system");
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_request_time() {
        let chat = OpenAiChat::new("http://127.0.0.1:9", "gpt-4.1-mini", None);
        let err = chat.complete(&[]).await.unwrap_err();

        assert!(matches!(err, SiteplanError::RemoteCall { .. }));
        assert!(err.to_string().contains(API_KEY_ENV));
    }
}
