use chrono::{DateTime, Utc};
use serde::Serialize;
use siteplan_core::models::{
    Alignment, AttributeTable, ChatTurn, DrawnShape, ResultsPanel, SessionId, Speaker,
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub features: usize,
}

/// One rendered transcript turn
#[derive(Debug, Serialize)]
pub struct TurnView {
    pub speaker: Speaker,
    pub text: String,
    pub align: Alignment,
    pub accent: &'static str,
}

impl From<&ChatTurn> for TurnView {
    fn from(turn: &ChatTurn) -> Self {
        let speaker = turn.speaker();
        Self {
            speaker,
            text: turn.text().to_string(),
            align: speaker.alignment(),
            accent: speaker.accent(),
        }
    }
}

/// Results panel
#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub message: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<AttributeTable>,
}

impl From<ResultsPanel> for SelectionView {
    fn from(panel: ResultsPanel) -> Self {
        let message = panel.message();
        match panel {
            ResultsPanel::Prompt => Self { message, count: 0, table: None },
            ResultsPanel::Selected { count, table } => Self { message, count, table: Some(table) },
        }
    }
}

/// Everything the page shows for one session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub transcript: Vec<TurnView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawn_shape: Option<DrawnShape>,
    pub selection: SelectionView,
}

/// Submit-message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// `replied`, `ignored` or `failed`
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub session: SessionView,
}
