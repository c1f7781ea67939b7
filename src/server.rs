use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::api::{self, AppState};
use crate::error::DashboardError;

// Page assets are embedded in every build
#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAsset;

pub struct WebServer {
    host: String,
    port: u16,
    state: AppState,
}

impl WebServer {
    pub fn new(host: String, port: u16, state: AppState) -> Self {
        Self { host, port, state }
    }

    pub async fn start(self) -> Result<(), DashboardError> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| DashboardError::Error(format!("Invalid address: {}", e)))?;

        let app = create_router(self.state);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| DashboardError::Error(format!("Failed to bind to {}: {}", addr, e)))?;

        println!("🚀 SOC dashboard listening on http://{}", addr);
        log::info!("Server ready to handle requests on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_signal().await;
                log::info!("Shutdown signal received, stopping server");
                println!("\n🛑 Shutdown signal received - stopping server gracefully...");
            })
            .await
            .map_err(|e| DashboardError::Error(format!("Server error: {}", e)))?;

        log::info!("Server shutdown complete");
        Ok(())
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dashboard page
        .route("/", get(api::dashboard::dashboard_page))
        .route("/health", get(health_check))

        // Alert endpoints
        .route("/api/alerts", get(api::alerts::list_alerts))
        .route("/alerts", get(api::alerts::list_alerts))

        // Page assets
        .route("/static/{*path}", get(static_handler))

        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    let store = if state.store.is_open() {
        "connected"
    } else {
        "not yet connected"
    };
    (
        StatusCode::OK,
        Html(format!(
            "<h1>SOC Dashboard</h1><p>✅ Server is running</p><p>Store: {}</p>",
            store
        )),
    )
}

async fn static_handler(Path(path): Path<String>) -> Response {
    match StaticAsset::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Waits for a shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received SIGINT (Ctrl+C)");
        },
        _ = terminate => {
            log::info!("Received SIGTERM");
        },
    }
}
