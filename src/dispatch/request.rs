//! Send requests, targets and dispatch outcomes.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use crate::contacts::manager::normalize_phone;
use crate::contacts::resolver::ResolutionResult;
use crate::error::{ChannelErrorKind, ResolveError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Recipient of a send: a name, a phone identifier, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    name: Option<String>,
    phone: Option<String>,
}

impl Target {
    /// Build a target; `None` when neither a name nor a phone is given.
    pub fn new(name: Option<String>, phone: Option<String>) -> Option<Self> {
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !normalize_phone(p).is_empty());
        if name.is_none() && phone.is_none() {
            return None;
        }
        Some(Self { name, phone })
    }

    pub fn phone(phone: impl Into<String>) -> Option<Self> {
        Self::new(None, Some(phone.into()))
    }

    pub fn name(name: impl Into<String>) -> Option<Self> {
        Self::new(Some(name.into()), None)
    }

    /// Target of a `Resolved` result; `None` for anything else.
    pub fn from_resolution(result: &ResolutionResult) -> Option<Self> {
        match result {
            ResolutionResult::Resolved {
                canonical_name,
                phone_identifier,
                ..
            } => Self::new(Some(canonical_name.clone()), Some(phone_identifier.clone())),
            _ => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Phone identifier as the digits deep links expect.
    pub fn phone_digits(&self) -> Option<String> {
        self.phone.as_deref().map(normalize_phone)
    }

    /// What to type into a contact search: the name, else the phone.
    pub fn search_term(&self) -> &str {
        self.name
            .as_deref()
            .or(self.phone.as_deref())
            .unwrap_or_default()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.phone) {
            (Some(name), Some(phone)) => write!(f, "{} ({})", name, phone),
            (Some(name), None) => write!(f, "{}", name),
            (None, Some(phone)) => write!(f, "{}", phone),
            (None, None) => write!(f, "<nobody>"),
        }
    }
}

/// One logical send, consumed by a single dispatch.
#[derive(Debug, Clone)]
pub struct SendRequest {
    target: Target,
    message: String,
    max_repeats: u32,
    inter_repeat_delay: Duration,
    dry_run: bool,
}

impl SendRequest {
    /// Send `message` once, with a one second delay between any repeats.
    pub fn new(target: Target, message: impl Into<String>) -> Self {
        Self {
            target,
            message: message.into(),
            max_repeats: 1,
            inter_repeat_delay: Duration::from_secs(1),
            dry_run: false,
        }
    }

    /// Build a request from a resolution; only `Resolved` is accepted.
    pub fn from_resolution(
        result: &ResolutionResult,
        query: &str,
        message: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let target = Target::from_resolution(result)
            .ok_or_else(|| match result.clone().into_result(query) {
                Err(e) => e,
                Ok(_) => ResolveError::NotFound(query.to_string()),
            })?;
        Ok(Self::new(target, message))
    }

    /// Number of times to send; clamped to at least one.
    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.max_repeats = repeats.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.inter_repeat_delay = delay;
        self
    }

    /// Type the message but never submit it.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn max_repeats(&self) -> u32 {
        self.max_repeats
    }

    pub fn inter_repeat_delay(&self) -> Duration {
        self.inter_repeat_delay
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// The three fallback tiers, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    DirectAddress,
    Search,
    Browser,
}

impl ChannelKind {
    /// Next tier to fall back to.
    pub fn next(self) -> Option<ChannelKind> {
        match self {
            ChannelKind::DirectAddress => Some(ChannelKind::Search),
            ChannelKind::Search => Some(ChannelKind::Browser),
            ChannelKind::Browser => None,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelKind::DirectAddress => "direct link",
            ChannelKind::Search => "desktop search",
            ChannelKind::Browser => "web browser",
        })
    }
}

/// Channel recorded in an outcome; `None` only when nothing succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelUsed {
    DirectAddress,
    Search,
    Browser,
    None,
}

impl From<ChannelKind> for ChannelUsed {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::DirectAddress => ChannelUsed::DirectAddress,
            ChannelKind::Search => ChannelUsed::Search,
            ChannelKind::Browser => ChannelUsed::Browser,
        }
    }
}

/// What a successful channel can actually vouch for. None of these is a
/// delivery receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Nothing was sent
    None,
    /// Deep link opened and the confirm key injected; the draft was never observed
    KeystrokeInjected,
    /// Message typed and the submit key/control actuated
    Submitted,
    /// Message typed but deliberately not submitted (dry run)
    Drafted,
}

/// One channel's entry in the dispatch trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub channel: ChannelKind,
    pub attempts: u32,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ChannelErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Verdict of one dispatch. Created once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub request_id: String,
    pub channel_used: ChannelUsed,
    pub succeeded: bool,
    /// Repeat iterations executed on the last channel that ran
    pub attempts: u32,
    pub signal: Signal,
    pub trail: Vec<AttemptRecord>,
    pub finished_at: DateTime<Utc>,
}
