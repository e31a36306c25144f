//! Channel drivers: the three fallback tiers the orchestrator walks through.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial module structure

pub mod browser;
pub mod direct;
pub mod search;

use crate::automation::desktop::SystemDesktop;
use crate::automation::webdriver::{WebDriverConfig, WebDriverSession};
use crate::config::Config;
use crate::dispatch::request::{ChannelKind, SendRequest, Signal, Target};
use crate::error::{ChannelError, ChannelResult};

pub use browser::{BrowserChannel, BrowserTimings};
pub use direct::DirectAddressChannel;
pub use search::{SearchChannel, SearchTimings};

/// Result of running one channel for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAttempt {
    /// Repeat iterations actually executed
    pub attempts: u32,
    pub result: ChannelResult<Signal>,
}

impl ChannelAttempt {
    pub fn sent(attempts: u32, signal: Signal) -> Self {
        Self {
            attempts,
            result: Ok(signal),
        }
    }

    pub fn failed(attempts: u32, error: ChannelError) -> Self {
        Self {
            attempts,
            result: Err(error),
        }
    }
}

/// A way of getting a message to the recipient.
pub trait Channel {
    fn kind(&self) -> ChannelKind;

    /// Can this channel address the target at all?
    fn supports(&self, _target: &Target) -> bool {
        true
    }

    /// Run the channel once for the request. Never panics on driver failure;
    /// every problem comes back as a [`ChannelError`].
    fn attempt(&self, request: &SendRequest) -> ChannelAttempt;
}

/// Build the production channel list in priority order.
pub fn build_channels(config: &Config) -> Vec<Box<dyn Channel>> {
    let desktop = SystemDesktop::current();
    let browser = WebDriverSession::new(WebDriverConfig {
        endpoint: config.webdriver_url.clone(),
        profile_dir: config.profile_dir.clone(),
        browser_exe: config.browser_exe.clone(),
        ..Default::default()
    });

    vec![
        Box::new(DirectAddressChannel::new(
            desktop,
            &config.url_scheme,
            &config.window_title,
            config.direct_settle,
        )),
        Box::new(SearchChannel::new(
            desktop,
            &config.url_scheme,
            &config.window_title,
            SearchTimings {
                discovery_budget: config.discovery_budget,
                ..Default::default()
            },
        )),
        Box::new(BrowserChannel::new(
            browser,
            &config.web_url,
            BrowserTimings::default(),
        )),
    ]
}
