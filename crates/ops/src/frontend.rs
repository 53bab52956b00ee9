//! Static file server for the frontend.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// File that must exist at the root of the frontend directory.
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("Frontend directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("index.html not found in {}", .0.display())]
    MissingIndex(PathBuf),

    #[error("Invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Verify that `dir` is a directory containing [`INDEX_FILE`].
pub fn check_dir(dir: &Path) -> Result<(), FrontendError> {
    if !dir.is_dir() {
        return Err(FrontendError::MissingDir(dir.to_path_buf()));
    }
    if !dir.join(INDEX_FILE).is_file() {
        return Err(FrontendError::MissingIndex(dir.to_path_buf()));
    }
    Ok(())
}

/// Router serving `dir` with permissive CORS.
pub fn router(dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve `dir` on `host:port` until Ctrl-C or SIGTERM.
pub async fn serve(dir: &Path, host: &str, port: u16) -> Result<(), FrontendError> {
    check_dir(dir)?;

    let ip = host.parse().map_err(|_| FrontendError::InvalidAddress {
        host: host.to_string(),
        port,
    })?;
    let addr = SocketAddr::new(ip, port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, dir = %dir.display(), "Serving frontend");

    axum::serve(listener, router(dir))
        .with_graceful_shutdown(crate::launcher::shutdown_signal())
        .await?;
    Ok(())
}
