//! Send requests and the fallback orchestrator that carries them out.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial module structure

pub mod orchestrator;
pub mod request;

pub use orchestrator::{DispatchState, Dispatcher};
pub use request::{
    AttemptRecord, ChannelKind, ChannelUsed, DispatchOutcome, SendRequest, Signal, Target,
};
