//! wolfies-whatsapp library
//!
//! Contact resolution, command interpretation and the fallback dispatcher,
//! shared by the CLI, daemon and client binaries.
//!
//! CHANGELOG:
//! - 10/17/2026 - Dispatcher, channels and automation drivers
//! - 01/10/2026 - Initial library structure

// Core modules
pub mod applescript;
pub mod automation;
pub mod channels;
pub mod commands;
pub mod config;
pub mod contacts;
pub mod daemon;
pub mod dispatch;
pub mod error;
pub mod interpreter;
pub mod output;
