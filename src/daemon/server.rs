//! UNIX socket server for daemon mode.
//!
//! Listens on a UNIX socket, accepts connections one at a time, and
//! dispatches requests to DaemonService. A send blocks the accept loop until
//! its dispatch finishes.
//!
//! CHANGELOG:
//! - 10/17/2026 - Malformed requests get an error response instead of a dropped connection
//! - 01/10/2026 - Initial implementation

use anyhow::Result;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::daemon::protocol::{self, Method};
use crate::daemon::service::DaemonService;

/// Daemon server listening on UNIX socket.
pub struct DaemonServer {
    service: DaemonService,
    socket_path: String,
}

impl DaemonServer {
    /// Create new daemon server.
    pub fn new(socket_path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        Ok(Self::with_service(socket_path, DaemonService::new(config)?))
    }

    pub fn with_service(socket_path: impl AsRef<Path>, service: DaemonService) -> Self {
        Self {
            service,
            socket_path: socket_path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Start serving requests (blocking).
    pub fn serve(&self) -> Result<()> {
        // Clean up stale socket
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;

        // Set permissions to owner-only (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                &self.socket_path,
                std::fs::Permissions::from_mode(0o600),
            )?;
        }

        tracing::info!("listening on {}", self.socket_path);

        // Accept connections sequentially (single-threaded)
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle_connection(stream) {
                        tracing::warn!("connection error: {:#}", e);
                    }
                }
                Err(e) => {
                    tracing::warn!("accept error: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Handle a single client connection.
    fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(&stream);

        // Read NDJSON request (one line)
        let mut line = String::new();
        reader.read_line(&mut line)?;

        if line.trim().is_empty() {
            return Ok(()); // Client disconnected
        }

        let response = self.handle_line(&line);

        // Send NDJSON response
        let response_line = response.to_ndjson_line()?;
        writer.write_all(response_line.as_bytes())?;
        writer.flush()?;

        Ok(())
    }

    /// Turn one request line into exactly one response.
    pub fn handle_line(&self, line: &str) -> protocol::Response {
        let start = Instant::now();
        let elapsed_ms = |start: Instant| start.elapsed().as_secs_f64() * 1000.0;

        let request = match protocol::Request::from_ndjson_line(line) {
            Ok(request) => request,
            Err(e) => {
                return protocol::Response::error(
                    String::new(),
                    "BAD_REQUEST",
                    format!("{:#}", e),
                    elapsed_ms(start),
                )
            }
        };

        let method = match request.method.parse::<Method>() {
            Ok(method) => method,
            Err(e) => {
                return protocol::Response::error(
                    request.id,
                    "UNKNOWN_METHOD",
                    e.to_string(),
                    elapsed_ms(start),
                )
            }
        };

        tracing::debug!(id = %request.id, %method, "request");
        match self.service.dispatch(method, request.params) {
            Ok(result) => protocol::Response::success(request.id, result, elapsed_ms(start)),
            Err(e) => protocol::Response::error(request.id, "ERROR", format!("{:#}", e), elapsed_ms(start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::ContactStore;
    use crate::dispatch::Dispatcher;
    use std::sync::Arc;

    fn server() -> DaemonServer {
        let service = DaemonService::with_parts(Arc::new(ContactStore::empty()), Dispatcher::new(Vec::new()));
        DaemonServer::with_service("/tmp/unused.sock", service)
    }

    #[test]
    fn test_malformed_line_gets_bad_request() {
        let response = server().handle_line("not json");
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, "BAD_REQUEST");
    }

    #[test]
    fn test_unknown_method() {
        let response = server().handle_line(r#"{"id":"7","v":1,"method":"bundle","params":{}}"#);
        assert_eq!(response.id, "7");
        assert_eq!(response.error.unwrap().code, "UNKNOWN_METHOD");
    }

    #[test]
    fn test_health_roundtrip() {
        let response = server().handle_line(r#"{"id":"1","v":1,"method":"health"}"#);
        assert!(response.ok);
        assert_eq!(response.result.unwrap()["contacts_loaded"], 0);
    }
}
