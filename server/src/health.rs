//! Liveness probe for operators
//!
//! Any TCP connection to the health port gets a fixed HTTP 200 with an
//! `{"ok":true}` body. No game state is consulted.

use log::{debug, error, trace};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const HEALTH_BODY: &str = "{\"ok\":true}";

pub fn health_response() -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        HEALTH_BODY.len(),
        HEALTH_BODY
    )
}

/// Accepts probe connections until the listener fails.
pub async fn serve(listener: TcpListener) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                tokio::spawn(async move {
                    if let Err(e) = respond(stream).await {
                        debug!("Health probe from {} failed: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("Health listener error: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}

async fn respond(mut stream: TcpStream) -> std::io::Result<()> {
    // Read the request before replying; its contents are ignored.
    let mut buffer = [0u8; 1024];
    match tokio::time::timeout(Duration::from_millis(200), stream.read(&mut buffer)).await {
        Ok(Ok(len)) => trace!("Health request of {} bytes", len),
        Ok(Err(e)) => debug!("Health request read failed: {}", e),
        Err(_) => trace!("Health request read timed out"),
    }

    stream.write_all(health_response().as_bytes()).await?;
    stream.shutdown().await
}
