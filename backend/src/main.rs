use std::{net::SocketAddr, sync::Arc, time::Duration};

use backend::{
    config::load_client_config, create_router, database::Database, ors::OrsClient,
    places::GooglePlacesClient, storage_router, weather::OpenMeteoClient, AppState,
};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_STATIC_DIR: &str = "backend/static";

/// Per-request bound on upstream calls so a stalled provider can never
/// hang a pipeline invocation indefinitely.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client_config = load_client_config().expect("client credentials");

    let db = Arc::new(Database::new().await.expect("database connection"));
    db.migrate().await.expect("database migrations");

    let http = reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .expect("http client");

    let state = AppState {
        planner: Arc::new(OrsClient::new(http.clone(), client_config.ors_api_key.clone())),
        forecast: Arc::new(OpenMeteoClient::new(http.clone())),
        places: Arc::new(GooglePlacesClient::new(
            http,
            client_config.places_api_key.clone(),
        )),
        client_config,
    };

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
    let app = create_router(state)
        .merge(storage_router(db))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .expect("valid socket address");
    tracing::info!("starting backend on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}
