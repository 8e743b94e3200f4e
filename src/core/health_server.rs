//! Liveness endpoint for the hosting platform
//!
//! Serves `GET /health` with a plain `OK` body on PORT (default 8080).
//! Every other path falls through to axum's 404.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Start the health server on all interfaces
///
/// # Arguments
/// * `port` - Port to listen on (typically taken from `PORT`)
pub async fn start_health_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;

    log::info!("Starting health server on http://{}", addr);
    log::info!("  /health - Health check (liveness)");

    serve(listener).await
}

/// Serve the health routes on an already bound listener
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Handler for /health endpoint
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, [("Content-Type", "text/plain")], "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn get_raw(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_health_returns_ok_and_unknown_paths_404() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener));

        let health = get_raw(addr, "/health").await;
        assert!(health.starts_with("HTTP/1.1 200"), "unexpected response: {}", health);
        assert!(health.ends_with("OK"));

        let missing = get_raw(addr, "/nope").await;
        assert!(missing.starts_with("HTTP/1.1 404"), "unexpected response: {}", missing);

        server.abort();
    }
}
