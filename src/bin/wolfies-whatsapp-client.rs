//! wolfies-whatsapp-client - Thin client for daemon mode.
//!
//! CHANGELOG:
//! - 10/17/2026 - Default timeout covers a full fallback send
//! - 01/10/2026 - Initial implementation

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use wolfies_whatsapp::daemon::protocol::PROTOCOL_VERSION;
use wolfies_whatsapp::daemon::DEFAULT_SOCKET;

#[derive(Parser)]
#[command(name = "wolfies-whatsapp-client")]
#[command(about = "Thin client for wolfies-whatsapp daemon")]
struct Cli {
    /// Method to call: health, resolve, interpret, send
    method: String,

    /// Socket path
    #[arg(long, default_value = DEFAULT_SOCKET)]
    socket: String,

    /// JSON parameters (as string)
    #[arg(long)]
    params: Option<String>,

    /// Request timeout (seconds); a send may walk all three channels
    #[arg(long, default_value = "180.0")]
    timeout: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let params: HashMap<String, serde_json::Value> = match cli.params {
        Some(p) => serde_json::from_str(&p).context("--params must be a JSON object")?,
        None => HashMap::new(),
    };

    let request = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "v": PROTOCOL_VERSION,
        "method": cli.method,
        "params": params,
    });

    let socket_path = shellexpand::tilde(&cli.socket).to_string();
    let stream = UnixStream::connect(&socket_path)
        .with_context(|| format!("Daemon not reachable at {}", socket_path))?;

    let timeout = std::time::Duration::try_from_secs_f64(cli.timeout.max(0.1))
        .map_err(|_| anyhow::anyhow!("--timeout must be a number of seconds, got {}", cli.timeout))?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    // Send request (NDJSON)
    let request_line = format!("{}\n", serde_json::to_string(&request)?);
    (&stream).write_all(request_line.as_bytes())?;

    // Read response (NDJSON)
    let mut reader = BufReader::new(&stream);
    let mut response_line = String::new();
    reader.read_line(&mut response_line)?;

    let response: serde_json::Value =
        serde_json::from_str(&response_line).context("Daemon sent invalid JSON")?;

    if response["ok"].as_bool().unwrap_or(false) {
        println!("{}", serde_json::to_string_pretty(&response["result"])?);
        Ok(())
    } else {
        eprintln!(
            "Error: {}",
            response["error"]["message"].as_str().unwrap_or("unknown")
        );
        std::process::exit(1);
    }
}
