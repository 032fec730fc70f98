use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siteplan_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "siteplan_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();
    let config = api_config.layered_config().context("Failed to load configuration")?;

    tracing::info!(
        port = api_config.port,
        data_path = %config.data_path.value.display(),
        model = %config.model.value,
        "Starting siteplan server"
    );

    let state = match AppState::load(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to load building data: {}", e);
            tracing::error!(
                "Remediation:\n\
                1. Ensure the footprint file exists (set SITEPLAN_DATA_PATH to override)\n\
                2. For a Shapefile, keep the .shx and .dbf files next to the .shp\n\
                3. Check that the file contains at least one feature with geometry"
            );
            std::process::exit(1);
        }
    };

    let origin = api_config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", api_config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(Arc::new(state)).layer(ServiceBuilder::new().layer(cors));

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
