//! Siteplan LLM - Chat completion port and adapters
//!
//! This crate defines the port for chat completion, the OpenAI adapter
//! behind it, and the chat session logic that turns a transcript into a
//! request and records the reply.

pub mod chat;
pub mod openai;
pub mod ports;

// Re-export main types
pub use chat::{ChatSession, SendOutcome};
pub use openai::OpenAiChat;
pub use ports::{ApiMessage, ApiRole, ChatCompleter};
