use siteplan_core::models::{DrawnShape, ResultsPanel, SessionContext, SessionId};
use siteplan_geo::filter_features;
use siteplan_llm::SendOutcome;

use crate::dto::{MessageResponse, SessionView, TurnView};
use crate::error::ApiError;
use crate::state::AppState;

/// Session events and the pure view rendered after each of them
pub struct SessionService;

impl SessionService {
    /// Results panel for the session's current drawn shape
    pub fn selection(state: &AppState, context: &SessionContext) -> ResultsPanel {
        match &context.drawn_shape {
            None => ResultsPanel::Prompt,
            Some(shape) => {
                let selection = filter_features(&state.collection, Some(&shape.geometry));
                ResultsPanel::from_selection(true, &selection)
            }
        }
    }

    /// Render a session; never mutates it
    pub fn view(state: &AppState, context: &SessionContext) -> SessionView {
        SessionView {
            id: context.id,
            created_at: context.created_at,
            transcript: context.transcript.turns().iter().map(TurnView::from).collect(),
            drawn_shape: context.drawn_shape.clone(),
            selection: Self::selection(state, context).into(),
        }
    }

    /// Shape-drawn event: the new shape replaces the previous one
    pub async fn record_shape(
        state: &AppState,
        id: SessionId,
        shape: DrawnShape,
    ) -> Result<SessionView, ApiError> {
        let handle = state.sessions.get(id).await?;
        let mut context = handle.lock().await;

        tracing::info!(session = %id, kind = ?shape.kind, "Shape drawn");
        context.record_shape(shape);

        Ok(Self::view(state, &context))
    }

    /// Submit-message event.
    ///
    /// The session lock is held through the completion call, so a second
    /// message from the same session waits for the first reply.
    pub async fn submit_message(
        state: &AppState,
        id: SessionId,
        text: &str,
    ) -> Result<MessageResponse, ApiError> {
        let handle = state.sessions.get(id).await?;
        let mut context = handle.lock().await;

        let outcome =
            state.chat.send(&mut context.transcript, text, state.completer.as_ref()).await;

        let (outcome, error) = match outcome {
            SendOutcome::Ignored => ("ignored", None),
            SendOutcome::Replied => ("replied", None),
            SendOutcome::Failed { reason } => ("failed", Some(reason)),
        };

        tracing::info!(session = %id, outcome, "Message handled");

        Ok(MessageResponse {
            outcome,
            error,
            session: Self::view(state, &context),
        })
    }
}
