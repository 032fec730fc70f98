//! Chat transcript model.

use serde::{Deserialize, Serialize};

/// Who a transcript turn belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// Opening line shown before the user says anything
    Greeting,
    User,
    Assistant,
    /// Failure notice rendered in the transcript, never sent upstream
    Notice,
}

impl Speaker {
    /// Role name in the chat completion vocabulary
    pub fn api_role(&self) -> Option<&'static str> {
        match self {
            Speaker::Greeting | Speaker::Assistant => Some("assistant"),
            Speaker::User => Some("user"),
            Speaker::Notice => None,
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self {
            Speaker::User => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    /// Bubble background colour
    pub fn accent(&self) -> &'static str {
        match self {
            Speaker::User => "#2563eb",
            Speaker::Greeting | Speaker::Assistant | Speaker::Notice => "#374151",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

/// One immutable transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    speaker: Speaker,
    text: String,
}

impl ChatTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(Speaker::Notice, text)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Append-only, ordered chat log of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    /// Start a transcript with its single greeting turn
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![ChatTurn::new(Speaker::Greeting, greeting)],
        }
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
