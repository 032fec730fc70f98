//! End-to-end tests of the HTTP surface against an in-memory layer

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use siteplan_api::{create_router, AppState};
use siteplan_core::error::{Result, SiteplanError};
use siteplan_core::models::{Crs, Feature, FeatureCollection, FeatureId, Geometry};
use siteplan_llm::{ApiMessage, ChatCompleter};
use tower::ServiceExt;

struct ScriptedCompleter {
    reply: Option<&'static str>,
    calls: Mutex<Vec<Vec<ApiMessage>>>,
}

impl ScriptedCompleter {
    fn new(reply: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self { reply, calls: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl ChatCompleter for ScriptedCompleter {
    async fn complete(&self, messages: &[ApiMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.reply
            .map(str::to_string)
            .ok_or_else(|| SiteplanError::remote("upstream timed out"))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Ten unit squares along the x axis, two units apart
fn blocks() -> Arc<FeatureCollection> {
    let features = (0..10)
        .map(|i| {
            let x = i as f64 * 2.0;
            let properties = json!({ "bin": 1000 + i, "height": 10.0 + i as f64 })
                .as_object()
                .cloned()
                .unwrap();
            Feature::new(FeatureId(i), Geometry::rectangle([x, 0.0, x + 1.0, 1.0]), properties)
        })
        .collect();
    Arc::new(FeatureCollection::new("blocks", Crs::wgs84(), features))
}

fn app_with(completer: Arc<ScriptedCompleter>) -> Router {
    create_router(Arc::new(AppState::new(blocks(), [9.5, 0.5], completer)))
}

fn app() -> Router {
    app_with(ScriptedCompleter::new(Some("Hi there")))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

async fn new_session(app: &Router) -> String {
    let (status, session) = call(app, Method::POST, "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    session["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["features"], 10);
}

#[tokio::test]
async fn test_index_page() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("leaflet.draw"));
    assert!(html.contains("Building Selection UI"));
}

#[tokio::test]
async fn test_map_widget() {
    let (status, widget) = call(&app(), Method::GET, "/api/v1/map", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(widget["zoom"], 15);
    assert_eq!(widget["center"]["lon"], 9.5);
    assert_eq!(widget["tiles"]["name"], "cartodbpositron");
    assert_eq!(widget["draw"]["polygon"], true);
    assert_eq!(widget["draw"]["polyline"], false);
    assert_eq!(widget["edit"], false);
    assert_eq!(widget["layer"]["features"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_features_endpoint() {
    let (status, layer) = call(&app(), Method::GET, "/api/v1/features", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(layer["type"], "FeatureCollection");
    assert_eq!(layer["features"][3]["properties"]["bin"], 1003);
}

#[tokio::test]
async fn test_new_session_shows_greeting_and_prompt() {
    let (status, session) = call(&app(), Method::POST, "/api/v1/sessions", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["transcript"].as_array().unwrap().len(), 1);
    assert_eq!(session["transcript"][0]["speaker"], "greeting");
    assert_eq!(session["transcript"][0]["text"], "Ask me anything about urban design...");
    assert_eq!(session["transcript"][0]["align"], "left");
    assert_eq!(session["selection"]["message"], "Use the tools to select a site on the map");
    assert!(session["selection"].get("table").is_none());
}

#[tokio::test]
async fn test_rectangle_selects_three_buildings() {
    let app = app();
    let id = new_session(&app).await;

    let shape = json!({
        "kind": "rectangle",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[-0.5, -0.5], [4.5, -0.5], [4.5, 1.5], [-0.5, 1.5], [-0.5, -0.5]]]
        }
    });
    let uri = format!("/api/v1/sessions/{}/shape", id);
    let (status, session) = call(&app, Method::PUT, &uri, Some(shape)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["selection"]["message"], "3 building selected.");
    assert_eq!(session["selection"]["count"], 3);
    assert_eq!(session["selection"]["table"]["columns"], json!(["bin", "height"]));

    let bins: Vec<_> = session["selection"]["table"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["values"][0].clone())
        .collect();
    assert_eq!(bins, vec![json!(1000), json!(1001), json!(1002)]);

    let uri = format!("/api/v1/sessions/{}/selection", id);
    let (_, selection) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(selection["count"], 3);
}

#[tokio::test]
async fn test_shape_with_altitude_is_accepted() {
    let app = app();
    let id = new_session(&app).await;

    let shape = json!({
        "kind": "rectangle",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [-0.5, -0.5, 0.0], [4.5, -0.5, 0.0], [4.5, 1.5, 0.0],
                [-0.5, 1.5, 0.0], [-0.5, -0.5, 0.0]
            ]]
        }
    });
    let uri = format!("/api/v1/sessions/{}/shape", id);
    let (status, session) = call(&app, Method::PUT, &uri, Some(shape)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["selection"]["count"], 3);
    assert_eq!(session["drawn_shape"]["geometry"]["coordinates"][0][0], json!([-0.5, -0.5]));
}

#[tokio::test]
async fn test_new_shape_replaces_previous() {
    let app = app();
    let id = new_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/shape", id);

    let wide = json!({ "geometry": {
        "type": "Polygon",
        "coordinates": [[[-1.0, -1.0], [20.0, -1.0], [20.0, 2.0], [-1.0, 2.0], [-1.0, -1.0]]]
    }});
    let (_, session) = call(&app, Method::PUT, &uri, Some(wide)).await;
    assert_eq!(session["selection"]["count"], 10);

    // Sits in the gap between squares 0 and 1
    let gap = json!({ "geometry": {
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[1.2, 0.2], [1.8, 0.2], [1.8, 0.8], [1.2, 0.8], [1.2, 0.2]]]
        }
    }});
    let (status, session) = call(&app, Method::PUT, &uri, Some(gap)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["selection"]["message"], "Use the tools to select a site on the map");
    assert_eq!(session["drawn_shape"]["kind"], "polygon");
}

#[tokio::test]
async fn test_point_shape_is_rejected() {
    let app = app();
    let id = new_session(&app).await;

    let point = json!({ "geometry": { "type": "Point", "coordinates": [0.5, 0.5] } });
    let uri = format!("/api/v1/sessions/{}/shape", id);
    let (status, body) = call(&app, Method::PUT, &uri, Some(point)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid shape");

    let uri = format!("/api/v1/sessions/{}/selection", id);
    let (_, selection) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(selection["count"], 0);
}

#[tokio::test]
async fn test_message_round_trip() {
    let completer = ScriptedCompleter::new(Some("Hi there"));
    let app = app_with(completer.clone());
    let id = new_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/messages", id);

    let (status, result) = call(&app, Method::POST, &uri, Some(json!({ "text": "Hello" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["outcome"], "replied");
    let transcript = result["session"]["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1]["text"], "Hello");
    assert_eq!(transcript[1]["align"], "right");
    assert_eq!(transcript[1]["accent"], "#2563eb");
    assert_eq!(transcript[2]["speaker"], "assistant");
    assert_eq!(transcript[2]["text"], "Hi there");
    assert_eq!(transcript[2]["accent"], "#374151");

    let calls = completer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0].content, "You are an urban planning assistant.");
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let completer = ScriptedCompleter::new(Some("unused"));
    let app = app_with(completer.clone());
    let id = new_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/messages", id);

    let (status, result) = call(&app, Method::POST, &uri, Some(json!({ "text": "   " }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["outcome"], "ignored");
    assert_eq!(result["session"]["transcript"].as_array().unwrap().len(), 1);
    assert!(completer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_completion_keeps_selection() {
    let app = app_with(ScriptedCompleter::new(None));
    let id = new_session(&app).await;

    let shape = json!({ "geometry": {
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [0.5, 0.0], [0.5, 0.5], [0.0, 0.5], [0.0, 0.0]]]
    }});
    call(&app, Method::PUT, &format!("/api/v1/sessions/{}/shape", id), Some(shape)).await;

    let uri = format!("/api/v1/sessions/{}/messages", id);
    let (status, result) = call(&app, Method::POST, &uri, Some(json!({ "text": "Hello" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["outcome"], "failed");
    assert!(result["error"].as_str().unwrap().contains("upstream timed out"));

    let transcript = result["session"]["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1]["speaker"], "user");
    assert_eq!(transcript[2]["speaker"], "notice");
    assert_eq!(result["session"]["selection"]["message"], "1 building selected.");
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let app = app();
    let first = new_session(&app).await;
    let second = new_session(&app).await;

    let uri = format!("/api/v1/sessions/{}/messages", first);
    call(&app, Method::POST, &uri, Some(json!({ "text": "Hello" }))).await;

    let (_, session) = call(&app, Method::GET, &format!("/api/v1/sessions/{}", second), None).await;
    assert_eq!(session["transcript"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ended_session_is_gone() {
    let app = app();
    let id = new_session(&app).await;
    let uri = format!("/api/v1/sessions/{}", id);

    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn test_unknown_session() {
    let uri = "/api/v1/sessions/00000000-0000-4000-8000-000000000000/selection";
    let (status, _) = call(&app(), Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
