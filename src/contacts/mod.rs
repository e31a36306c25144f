//! Contact store and name resolution.
//!
//! CHANGELOG:
//! - 10/17/2026 - Added resolver
//! - 01/10/2026 - Initial module structure

pub mod fuzzy;
pub mod manager;
pub mod resolver;

pub use manager::{Contact, ContactStore};
pub use resolver::{resolve, MatchKind, ResolutionResult};
