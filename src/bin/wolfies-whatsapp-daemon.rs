//! wolfies-whatsapp-daemon - Persistent daemon with hot resources.
//!
//! CHANGELOG:
//! - 10/17/2026 - Loads Config, logs through tracing
//! - 01/10/2026 - Initial implementation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use wolfies_whatsapp::config::{expand_path, Config};
use wolfies_whatsapp::daemon::server::DaemonServer;
use wolfies_whatsapp::daemon::DEFAULT_SOCKET;

#[derive(Parser)]
#[command(name = "wolfies-whatsapp-daemon")]
#[command(about = "Persistent daemon for wolfies-whatsapp CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Socket path
        #[arg(long, default_value = DEFAULT_SOCKET)]
        socket: String,

        /// Contacts file (default: $WHATSAPP_CONTACTS_PATH or the config dir)
        #[arg(long)]
        contacts: Option<String>,

        /// Run in foreground (don't daemonize)
        #[arg(long)]
        foreground: bool,
    },

    /// Stop the daemon
    Stop {
        /// Socket path
        #[arg(long, default_value = DEFAULT_SOCKET)]
        socket: String,
    },

    /// Check daemon status
    Status {
        /// Socket path
        #[arg(long, default_value = DEFAULT_SOCKET)]
        socket: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            socket,
            contacts,
            foreground,
        } => cmd_start(socket, contacts, foreground),
        Commands::Stop { socket } => cmd_stop(socket),
        Commands::Status { socket } => cmd_status(socket),
    }
}

fn cmd_start(socket: String, contacts: Option<String>, foreground: bool) -> Result<()> {
    let socket_path = shellexpand::tilde(&socket).to_string();

    let mut config = Config::from_env()?;
    if let Some(path) = contacts {
        config.contacts_path = expand_path(&path);
    }

    // Create parent directory if needed
    if let Some(parent) = Path::new(&socket_path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    if foreground {
        tracing::info!("starting in foreground");
        let server = DaemonServer::new(&socket_path, &config)?;
        server.serve()?;
    } else {
        use daemonize::Daemonize;

        let pid_file = format!("{}.pid", socket_path);

        let daemonize = Daemonize::new()
            .pid_file(&pid_file)
            .working_directory("/tmp");

        match daemonize.start() {
            Ok(_) => {
                // Child process: run server
                let server = DaemonServer::new(&socket_path, &config)?;
                server.serve()?;
            }
            Err(e) => {
                tracing::error!("Failed to daemonize: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn cmd_stop(socket: String) -> Result<()> {
    let socket_path = shellexpand::tilde(&socket).to_string();
    let pid_file = format!("{}.pid", socket_path);

    let pid_str = std::fs::read_to_string(&pid_file)
        .with_context(|| format!("Daemon not running (no pid file at {})", pid_file))?;
    let pid: i32 = pid_str.trim().parse().context("Corrupt pid file")?;

    // SAFETY: plain signal delivery to a pid we wrote ourselves.
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }

    let _ = std::fs::remove_file(&pid_file);
    let _ = std::fs::remove_file(&socket_path);

    println!("Daemon stopped (pid {})", pid);

    Ok(())
}

fn cmd_status(socket: String) -> Result<()> {
    let socket_path = shellexpand::tilde(&socket).to_string();

    match std::os::unix::net::UnixStream::connect(&socket_path) {
        Ok(_) => {
            println!("Daemon running at {}", socket_path);
            Ok(())
        }
        Err(_) => {
            println!("Daemon not running");
            std::process::exit(1);
        }
    }
}
