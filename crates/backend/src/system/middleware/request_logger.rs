use axum::body::{Body, HttpBody};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_size;

/// HTTP request logging middleware
///
/// Logs method, path, status, duration and response size
/// (size only when known up front, the body is never buffered).
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status();
    let size = response
        .body()
        .size_hint()
        .exact()
        .map(|n| format_size(n as usize))
        .unwrap_or_else(|| "stream".to_string());
    let elapsed_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!("{} {} -> {} ({} ms, {})", method, path, status.as_u16(), elapsed_ms, size);
    } else if status.is_client_error() {
        tracing::warn!("{} {} -> {} ({} ms, {})", method, path, status.as_u16(), elapsed_ms, size);
    } else {
        tracing::info!("{} {} -> {} ({} ms, {})", method, path, status.as_u16(), elapsed_ms, size);
    }

    response
}
