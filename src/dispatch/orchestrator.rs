//! Fallback state machine: direct link, then desktop search, then browser.
//!
//! Channel errors never leave this module. Each one is logged, recorded in
//! the outcome trail and turned into a transition to the next tier.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::request::{
    AttemptRecord, ChannelKind, ChannelUsed, DispatchOutcome, SendRequest, Signal,
};
use crate::channels::{build_channels, Channel, ChannelAttempt};
use crate::config::Config;
use crate::error::ChannelError;
use chrono::Utc;
use std::fmt;
use uuid::Uuid;

/// Where a dispatch currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Trying(ChannelKind),
    Succeeded(ChannelKind),
    Failed,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DispatchState::Succeeded(_) | DispatchState::Failed)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Idle => write!(f, "idle"),
            DispatchState::Trying(kind) => write!(f, "trying {}", kind),
            DispatchState::Succeeded(kind) => write!(f, "sent via {}", kind),
            DispatchState::Failed => write!(f, "failed"),
        }
    }
}

/// Drives the configured channels in priority order for each request.
pub struct Dispatcher {
    channels: Vec<Box<dyn Channel>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Channel>>) -> Self {
        Self { channels }
    }

    /// Production dispatcher: system desktop driver plus a WebDriver session.
    pub fn from_config(config: &Config) -> Self {
        Self::new(build_channels(config))
    }

    /// Kinds of the configured channels, in order.
    pub fn channel_kinds(&self) -> Vec<ChannelKind> {
        self.channels.iter().map(|c| c.kind()).collect()
    }

    fn channel(&self, kind: ChannelKind) -> Option<&dyn Channel> {
        self.channels
            .iter()
            .find(|c| c.kind() == kind)
            .map(|c| c.as_ref())
    }

    /// First state after `Idle`: direct link only when a phone is known.
    fn first_tier(request: &SendRequest) -> ChannelKind {
        if request.target().phone_digits().is_some_and(|p| !p.is_empty()) {
            ChannelKind::DirectAddress
        } else {
            ChannelKind::Search
        }
    }

    /// Tier to try after `from`, skipping tiers that are not configured or
    /// cannot address the target.
    fn next_runnable(&self, from: Option<ChannelKind>, request: &SendRequest) -> Option<ChannelKind> {
        let mut candidate = match from {
            None => Some(Self::first_tier(request)),
            Some(kind) => kind.next(),
        };
        while let Some(kind) = candidate {
            match self.channel(kind) {
                Some(channel) if channel.supports(request.target()) => return Some(kind),
                Some(_) => tracing::debug!("{} cannot address {}, skipping", kind, request.target()),
                None => tracing::debug!("{} not configured, skipping", kind),
            }
            candidate = kind.next();
        }
        None
    }

    /// Run one request to a single verdict.
    pub fn dispatch(&self, request: &SendRequest) -> DispatchOutcome {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("dispatch", request_id = %request_id);
        let _enter = span.enter();

        tracing::info!(
            target_name = %request.target(),
            repeats = request.max_repeats(),
            dry_run = request.dry_run(),
            "dispatch started"
        );

        let mut state = DispatchState::Idle;
        let mut trail = Vec::new();
        let mut attempts = 0;
        let mut signal = Signal::None;
        let mut last_tried = None;

        while !state.is_terminal() {
            state = match state {
                DispatchState::Idle => match self.next_runnable(None, request) {
                    Some(kind) => DispatchState::Trying(kind),
                    None => DispatchState::Failed,
                },
                DispatchState::Trying(kind) => {
                    tracing::info!("trying {}", kind);
                    last_tried = Some(kind);

                    let attempt = match self.channel(kind) {
                        Some(channel) => channel.attempt(request),
                        None => ChannelAttempt::failed(
                            0,
                            ChannelError::Unavailable(format!("{} not configured", kind)),
                        ),
                    };
                    attempts = attempt.attempts;
                    trail.push(record(kind, &attempt));

                    match attempt.result {
                        Ok(sent) => {
                            signal = sent;
                            DispatchState::Succeeded(kind)
                        }
                        Err(e) => {
                            tracing::warn!("{} failed after {} attempt(s): {}", kind, attempt.attempts, e);
                            match self.next_runnable(last_tried, request) {
                                Some(next) => DispatchState::Trying(next),
                                None => DispatchState::Failed,
                            }
                        }
                    }
                }
                terminal => terminal,
            };
        }

        let (channel_used, succeeded) = match state {
            DispatchState::Succeeded(kind) => (ChannelUsed::from(kind), true),
            _ => (ChannelUsed::None, false),
        };
        tracing::info!(?channel_used, attempts, "dispatch {}", state);

        DispatchOutcome {
            request_id,
            channel_used,
            succeeded,
            attempts,
            signal,
            trail,
            finished_at: Utc::now(),
        }
    }
}

fn record(kind: ChannelKind, attempt: &ChannelAttempt) -> AttemptRecord {
    let (succeeded, error, detail) = match &attempt.result {
        Ok(_) => (true, None, None),
        Err(e) => (false, Some(e.kind()), Some(e.to_string())),
    };
    AttemptRecord {
        channel: kind,
        attempts: attempt.attempts,
        succeeded,
        error,
        detail,
    }
}
