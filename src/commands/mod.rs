//! Command implementations.
//!
//! Handlers print their own output and return the process exit code.
//!
//! CHANGELOG:
//! - 10/17/2026 - Send, command, resolve and interpret handlers
//! - 01/10/2026 - Initial module structure

pub mod contacts;
pub mod interpret;
pub mod messaging;

/// Something failed (bad input or no send path worked).
pub const EXIT_FAILURE: u8 = 1;

/// The user has to answer a follow-up question before anything is sent.
pub const EXIT_CLARIFY: u8 = 2;
