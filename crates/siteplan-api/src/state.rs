use siteplan_core::config::{LayeredConfig, DEFAULT_GREETING, DEFAULT_ZOOM};
use siteplan_core::error::Result;
use siteplan_core::models::{FeatureCollection, MapCenter, MapWidget};
use siteplan_geo::map_center;
use siteplan_llm::{ChatCompleter, ChatSession, OpenAiChat};
use siteplan_store::{GeometryStore, MemorySessionStore, SessionStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Footprint layer in EPSG:4326, shared read-only by every session
    pub collection: Arc<FeatureCollection>,
    pub widget: Arc<MapWidget>,
    pub sessions: Arc<dyn SessionStore>,
    pub chat: ChatSession,
    pub completer: Arc<dyn ChatCompleter>,
    pub greeting: String,
}

impl AppState {
    pub fn new(
        collection: Arc<FeatureCollection>,
        center: [f64; 2],
        completer: Arc<dyn ChatCompleter>,
    ) -> Self {
        let widget = MapWidget::render(&collection, MapCenter::from_lon_lat(center), DEFAULT_ZOOM);

        Self {
            collection,
            widget: Arc::new(widget),
            sessions: Arc::new(MemorySessionStore::new()),
            chat: ChatSession::default(),
            completer,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }

    pub fn with_chat(mut self, chat: ChatSession) -> Self {
        self.chat = chat;
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        let mut widget = (*self.widget).clone();
        widget.zoom = zoom;
        self.widget = Arc::new(widget);
        self
    }

    /// Load the footprint layer and wire the chat adapter from configuration.
    ///
    /// Fails with `DataLoad` when the footprint file cannot be used.
    pub async fn load(config: &LayeredConfig) -> Result<Self> {
        let store = GeometryStore::new(config.data_path.value.clone());
        let collection = store.load().await?;

        let center = match map_center(&collection)? {
            Some(center) => center,
            None => {
                tracing::warn!("Footprint layer has no centroid, using the default center");
                config.default_center.value
            }
        };

        tracing::info!(lon = center[0], lat = center[1], "Map center");

        let completer: Arc<dyn ChatCompleter> = Arc::new(OpenAiChat::from_config(config));

        Ok(Self::new(collection, center, completer)
            .with_zoom(config.zoom.value)
            .with_chat(ChatSession::new(config.system_prompt.value.clone()))
            .with_greeting(config.greeting.value.clone()))
    }
}
