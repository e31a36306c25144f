//! Daemon service - dispatches requests to handlers.
//!
//! Keeps the contact store and the channel list hot between requests.
//!
//! CHANGELOG:
//! - 10/17/2026 - health/resolve/interpret/send over the fallback dispatcher
//! - 01/10/2026 - Initial implementation

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::protocol::{param_opt_str, param_str, Method};
use crate::commands::interpret::analyze;
use crate::commands::messaging::{build_target, classify_recipient};
use crate::config::Config;
use crate::contacts::{resolve, ContactStore};
use crate::dispatch::{Dispatcher, SendRequest};
use crate::interpreter;

/// Daemon service with hot resources.
pub struct DaemonService {
    contacts: Arc<ContactStore>, // Loaded once, read-only
    dispatcher: Dispatcher,
    started_at: String, // ISO timestamp
}

impl DaemonService {
    /// Create new daemon service with hot resources.
    pub fn new(config: &Config) -> Result<Self> {
        let contacts = Arc::new(ContactStore::load_or_empty(&config.contacts_path));
        Ok(Self::with_parts(contacts, Dispatcher::from_config(config)))
    }

    /// Build from an existing store and dispatcher.
    pub fn with_parts(contacts: Arc<ContactStore>, dispatcher: Dispatcher) -> Self {
        Self {
            contacts,
            dispatcher,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Dispatch request to appropriate handler.
    pub fn dispatch(&self, method: Method, params: HashMap<String, Value>) -> Result<Value> {
        match method {
            Method::Health => self.health(),
            Method::Resolve => self.resolve(params),
            Method::Interpret => self.interpret(params),
            Method::Send => self.send(params),
        }
    }

    /// Health check endpoint.
    fn health(&self) -> Result<Value> {
        let channels: Vec<String> = self
            .dispatcher
            .channel_kinds()
            .iter()
            .map(|k| k.to_string())
            .collect();
        Ok(json!({
            "pid": std::process::id(),
            "started_at": self.started_at,
            "version": "v1",
            "contacts_loaded": self.contacts.len(),
            "channels": channels,
        }))
    }

    /// Params: name
    fn resolve(&self, params: HashMap<String, Value>) -> Result<Value> {
        let name = param_str(&params, "name")?;
        let result = resolve(name, &self.contacts);
        let prompt = interpreter::clarify(name, &result).map(|c| c.prompt());
        Ok(json!({
            "query": name,
            "result": result,
            "prompt": prompt,
        }))
    }

    /// Params: utterance
    fn interpret(&self, params: HashMap<String, Value>) -> Result<Value> {
        let utterance = param_str(&params, "utterance")?;
        Ok(serde_json::to_value(analyze(utterance, &self.contacts))?)
    }

    /// Params: message, one of phone/name/recipient, repeat (default 1),
    /// delay seconds (default 1.0), dry_run (default false)
    fn send(&self, params: HashMap<String, Value>) -> Result<Value> {
        let message = param_str(&params, "message")?;
        if message.trim().is_empty() {
            return Err(anyhow!("Empty message; nothing to send"));
        }

        let (recipient_phone, recipient_name) = param_opt_str(&params, "recipient")
            .map(classify_recipient)
            .unwrap_or_default();
        let phone = param_opt_str(&params, "phone").map(str::to_string).or(recipient_phone);
        let name = param_opt_str(&params, "name").map(str::to_string).or(recipient_name);

        let target = build_target(&self.contacts, phone.as_deref(), name.as_deref())
            .ok_or_else(|| anyhow!("Provide either phone or name to choose the recipient"))?;

        let repeats = params
            .get("repeat")
            .and_then(|v| v.as_u64())
            .unwrap_or(1)
            .clamp(1, u64::from(u32::MAX)) as u32;
        let delay = params.get("delay").and_then(|v| v.as_f64()).unwrap_or(1.0);
        let delay = Duration::try_from_secs_f64(delay)
            .map_err(|_| anyhow!("delay must be a non-negative number of seconds, got {}", delay))?;
        let dry_run = params.get("dry_run").and_then(|v| v.as_bool()).unwrap_or(false);

        let request = SendRequest::new(target, message)
            .with_repeats(repeats)
            .with_delay(delay)
            .with_dry_run(dry_run);

        let outcome = self.dispatcher.dispatch(&request);
        Ok(serde_json::to_value(outcome)?)
    }
}
