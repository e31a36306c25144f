//! Daemon mode implementation: persistent server with hot resources.
//!
//! CHANGELOG:
//! - 10/17/2026 - Serves resolve/interpret/send
//! - 01/10/2026 - Initial module structure

pub mod protocol;
pub mod server;
pub mod service;

/// Default socket location (tilde-expanded by the binaries).
pub const DEFAULT_SOCKET: &str = "~/.wolfies-whatsapp/daemon.sock";
