//! In-memory session storage.
//!
//! Uses `RwLock::unwrap()` intentionally. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an unrecoverable
//! state. The lock is never held across an await point.

use async_trait::async_trait;
use siteplan_core::error::{Result, SiteplanError};
use siteplan_core::models::{SessionContext, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use crate::ports::{SessionHandle, SessionStore};

/// In-memory implementation of SessionStore
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl MemorySessionStore {
    /// Create a new in-memory session store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, greeting: &str) -> Result<SessionHandle> {
        let context = SessionContext::new(greeting);
        let id = context.id;
        let handle = Arc::new(Mutex::new(context));

        self.sessions.write().unwrap().insert(id, Arc::clone(&handle));
        tracing::debug!(session = %id, "Session created");

        Ok(handle)
    }

    async fn get(&self, id: SessionId) -> Result<SessionHandle> {
        self.sessions
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| SiteplanError::SessionNotFound { id: id.to_string() })
    }

    async fn remove(&self, id: SessionId) -> Result<()> {
        match self.sessions.write().unwrap().remove(&id) {
            Some(_) => {
                tracing::debug!(session = %id, "Session ended");
                Ok(())
            }
            None => Err(SiteplanError::SessionNotFound { id: id.to_string() }),
        }
    }

    async fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteplan_core::models::{ChatTurn, DrawnShape, Geometry, ShapeKind};

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemorySessionStore::new();
        let handle = store.create("Ask me anything about urban design...").await.unwrap();
        let id = handle.lock().await.id;

        let fetched = store.get(id).await.unwrap();
        assert!(Arc::ptr_eq(&handle, &fetched));
        assert_eq!(fetched.lock().await.transcript.len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = MemorySessionStore::new();
        let first = store.create("hello").await.unwrap();
        let second = store.create("hello").await.unwrap();

        {
            let mut context = first.lock().await;
            context.transcript.push(ChatTurn::user("only in first"));
            let square = Geometry::rectangle([0.0, 0.0, 1.0, 1.0]);
            let shape = DrawnShape::new(ShapeKind::Rectangle, square).unwrap();
            context.record_shape(shape);
        }

        let second = second.lock().await;
        assert_eq!(second.transcript.len(), 1);
        assert!(second.drawn_shape.is_none());
    }

    #[tokio::test]
    async fn test_remove_session() {
        let store = MemorySessionStore::new();
        let id = store.create("hello").await.unwrap().lock().await.id;

        store.remove(id).await.unwrap();

        assert_eq!(store.len().await, 0);
        assert!(matches!(store.get(id).await, Err(SiteplanError::SessionNotFound { .. })));
        assert!(store.remove(id).await.is_err());
    }
}
