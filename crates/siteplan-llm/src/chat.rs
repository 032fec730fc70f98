//! Chat session: transcript in, reply out

use siteplan_core::config::DEFAULT_SYSTEM_PROMPT;
use siteplan_core::models::{ChatTurn, Transcript};

use crate::ports::{ApiMessage, ApiRole, ChatCompleter};

/// What a call to [`ChatSession::send`] did to the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, transcript untouched
    Ignored,
    /// User turn and assistant reply appended
    Replied,
    /// User turn and a notice turn appended
    Failed { reason: String },
}

/// Builds completion requests from a transcript and records the replies
#[derive(Debug, Clone)]
pub struct ChatSession {
    system_prompt: String,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl ChatSession {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self { system_prompt: system_prompt.into() }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The system instruction followed by every forwardable turn, in order
    pub fn build_request(&self, transcript: &Transcript) -> Vec<ApiMessage> {
        std::iter::once(ApiMessage::system(self.system_prompt.as_str()))
            .chain(transcript.turns().iter().filter_map(|turn| {
                ApiRole::for_speaker(turn.speaker()).map(|role| ApiMessage::new(role, turn.text()))
            }))
            .collect()
    }

    /// Submit a user message.
    ///
    /// Blank input is ignored. Otherwise the user turn is appended, the whole
    /// conversation is sent in one completion call and the reply is appended
    /// as an assistant turn. A failed call leaves the user turn in place and
    /// appends a notice turn carrying the failure.
    pub async fn send(
        &self,
        transcript: &mut Transcript,
        text: &str,
        completer: &dyn ChatCompleter,
    ) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        transcript.push(ChatTurn::user(text));
        let request = self.build_request(transcript);

        match completer.complete(&request).await {
            Ok(reply) => {
                tracing::debug!(
                    model = completer.model_name(),
                    turns = transcript.len() + 1,
                    "Reply received"
                );
                transcript.push(ChatTurn::assistant(reply));
                SendOutcome::Replied
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(
                    model = completer.model_name(),
                    error = %reason,
                    "Chat completion failed"
                );
                transcript.push(ChatTurn::notice(format!(
                    "The assistant could not be reached: {}",
                    reason
                )));
                SendOutcome::Failed { reason }
            }
        }
    }
}
