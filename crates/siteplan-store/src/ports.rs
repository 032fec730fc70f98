use async_trait::async_trait;
use siteplan_core::error::Result;
use siteplan_core::models::{SessionContext, SessionId};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to one session's state.
///
/// Holding the lock for the length of an interaction keeps a session's
/// events strictly sequential while other sessions proceed.
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// Port for per-session state storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session whose transcript opens with `greeting`
    async fn create(&self, greeting: &str) -> Result<SessionHandle>;

    /// Look up a live session
    async fn get(&self, id: SessionId) -> Result<SessionHandle>;

    /// End a session, discarding its transcript and drawn shape
    async fn remove(&self, id: SessionId) -> Result<()>;

    /// Number of live sessions
    async fn len(&self) -> usize;
}
