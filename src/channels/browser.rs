//! Browser channel: drive the web client through a persistent WebDriver session.
//!
//! The session reuses a profile directory so a QR login survives between
//! runs. Login is only detected, never performed.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::{Channel, ChannelAttempt};
use crate::automation::BrowserDriver;
use crate::dispatch::request::{ChannelKind, SendRequest, Signal, Target};
use crate::error::ChannelError;
use std::time::Duration;

/// Any of these means the chat list is up.
pub const LOGGED_IN_SELECTORS: &[&str] = &[
    r#"div[title="Search input textbox"]"#,
    r#"div[aria-label="Chat list"]"#,
    r#"div[role="textbox"]"#,
];

/// Editable surface that shows up once a deep-linked chat is open.
pub const SURFACE_SELECTORS: &[&str] = &[r#"div[role="textbox"]"#, r#"div[contenteditable="true"]"#];

/// Message composer, most specific first.
pub const MESSAGE_BOX_SELECTORS: &[&str] = &[
    r#"div[contenteditable="true"][data-tab]"#,
    r#"div[contenteditable="true"]"#,
    r#"div[role="textbox"]"#,
];

/// Chat-list search box, most specific first.
pub const SEARCH_BOX_SELECTORS: &[&str] = &[
    r#"div[contenteditable="true"][data-tab="3"]"#,
    r#"div[title="Search input textbox"]"#,
    r#"div[role="textbox"]"#,
];

pub const SUBMIT_SELECTORS: &[&str] = &[r#"button[aria-label="Send"]"#, r#"span[data-icon="send"]"#];

/// Waits used while driving the web client.
#[derive(Debug, Clone)]
pub struct BrowserTimings {
    /// Upper bound on waiting for a logged-in UI
    pub login: Duration,
    /// Wait for an editable surface after a deep link
    pub surface: Duration,
    /// Fixed wait when the surface never shows
    pub surface_fallback: Duration,
    /// Per-selector wait for the composer on a deep-linked chat
    pub selector: Duration,
    /// Per-selector wait for the composer after a name search
    pub name_selector: Duration,
    /// Wait for the chat to open after a name search
    pub search_settle: Duration,
    /// Wait after submitting
    pub after_send: Duration,
}

impl Default for BrowserTimings {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(60),
            surface: Duration::from_secs(15),
            surface_fallback: Duration::from_secs(3),
            selector: Duration::from_secs(2),
            name_selector: Duration::from_secs(3),
            search_settle: Duration::from_millis(1500),
            after_send: Duration::from_secs(1),
        }
    }
}

impl BrowserTimings {
    /// Every wait set to zero.
    pub fn immediate() -> Self {
        Self {
            login: Duration::ZERO,
            surface: Duration::ZERO,
            surface_fallback: Duration::ZERO,
            selector: Duration::ZERO,
            name_selector: Duration::ZERO,
            search_settle: Duration::ZERO,
            after_send: Duration::ZERO,
        }
    }
}

/// Chat URL for a phone identifier. The text is typed separately, so it is
/// not prefilled here.
pub fn chat_url(web_url: &str, phone_digits: &str) -> String {
    format!("{}/send?phone={}", web_url.trim_end_matches('/'), phone_digits)
}

pub struct BrowserChannel<B> {
    driver: B,
    web_url: String,
    timings: BrowserTimings,
}

impl<B: BrowserDriver> BrowserChannel<B> {
    pub fn new(driver: B, web_url: &str, timings: BrowserTimings) -> Self {
        Self {
            driver,
            web_url: web_url.to_string(),
            timings,
        }
    }

    /// Open the web client and wait for the chat list. A missing login only
    /// costs a warning.
    fn ensure_logged_in(&self) -> Result<(), ChannelError> {
        self.driver
            .navigate(&self.web_url)
            .map_err(|e| ChannelError::Unavailable(format!("could not load {}: {:#}", self.web_url, e)))?;

        match self.driver.wait_for_any(LOGGED_IN_SELECTORS, self.timings.login) {
            Ok(Some(selector)) => tracing::debug!(selector = %selector, "web client logged in"),
            Ok(None) => tracing::warn!(
                "login not detected after {:?}; scan the QR code in the browser window",
                self.timings.login
            ),
            Err(e) => tracing::warn!("login check failed: {:#}", e),
        }
        Ok(())
    }

    /// First selector that becomes visible within `timeout`, trying each in turn.
    fn first_visible(&self, selectors: &[&str], timeout: Duration) -> Option<String> {
        selectors.iter().find_map(|selector| {
            match self.driver.wait_for_any(&[*selector], timeout) {
                Ok(found) => found,
                Err(e) => {
                    tracing::debug!(selector = %selector, "selector wait failed: {:#}", e);
                    None
                }
            }
        })
    }

    /// Deep-link to the chat and wait for it to become editable.
    fn open_by_phone(&self, phone: &str) -> Result<(), ChannelError> {
        let url = chat_url(&self.web_url, phone);
        self.driver
            .navigate(&url)
            .map_err(|e| ChannelError::InteractionFailed(format!("could not open chat: {:#}", e)))?;

        match self.driver.wait_for_any(SURFACE_SELECTORS, self.timings.surface) {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => {
                tracing::debug!("chat surface not detected, waiting {:?}", self.timings.surface_fallback);
                self.driver.pause(self.timings.surface_fallback);
            }
        }
        Ok(())
    }

    /// Search the chat list for `name` and open the first hit.
    fn open_by_name(&self, name: &str) -> Result<(), ChannelError> {
        for selector in SEARCH_BOX_SELECTORS {
            let step = self
                .driver
                .wait_for_any(&[*selector], self.timings.selector)
                .and_then(|found| {
                    if found.is_none() {
                        anyhow::bail!("search box {} not visible", selector);
                    }
                    self.driver.click(selector)?;
                    self.driver.fill(selector, name)?;
                    self.driver.press_enter()
                });
            match step {
                Ok(()) => {
                    self.driver.pause(self.timings.search_settle);
                    return Ok(());
                }
                Err(e) => tracing::debug!("search via {} failed: {:#}", selector, e),
            }
        }
        Err(ChannelError::InteractionFailed(format!(
            "search box not found; cannot select {}",
            name
        )))
    }

    /// Type into the composer and, unless drafting, submit.
    fn compose(&self, message: &str, dry_run: bool, timeout: Duration) -> Result<Signal, ChannelError> {
        let Some(selector) = self.first_visible(MESSAGE_BOX_SELECTORS, timeout) else {
            if dry_run {
                return Err(ChannelError::Timeout("the message box".to_string()));
            }
            tracing::debug!("message box not found, trying submit control");
            return self
                .click_submit()
                .map_err(|_| ChannelError::Timeout("the message box".to_string()));
        };

        match self.type_into(&selector, message) {
            Ok(()) if dry_run => return Ok(Signal::Drafted),
            Ok(()) => match self.driver.press_enter() {
                Ok(()) => {
                    self.driver.pause(self.timings.after_send);
                    return Ok(Signal::Submitted);
                }
                Err(e) => tracing::debug!("enter failed, trying submit control: {:#}", e),
            },
            Err(e) if dry_run => {
                return Err(ChannelError::InteractionFailed(format!("typing failed: {:#}", e)));
            }
            Err(e) => tracing::debug!("composer interaction failed, trying submit control: {:#}", e),
        }

        self.click_submit()
    }

    fn type_into(&self, selector: &str, message: &str) -> anyhow::Result<()> {
        self.driver.click(selector)?;
        if let Err(e) = self.driver.focus(selector) {
            tracing::debug!("focus on {} failed: {:#}", selector, e);
        }
        self.driver.type_text(message)
    }

    fn click_submit(&self) -> Result<Signal, ChannelError> {
        for selector in SUBMIT_SELECTORS {
            if matches!(self.driver.exists(selector), Ok(true)) && self.driver.click(selector).is_ok() {
                self.driver.pause(self.timings.after_send);
                return Ok(Signal::Submitted);
            }
        }
        Err(ChannelError::InteractionFailed(
            "neither the message box nor the send control was found".to_string(),
        ))
    }

    /// One repeat: open the chat, then compose.
    fn send_once(&self, target: &Target, request: &SendRequest) -> Result<Signal, ChannelError> {
        match target.phone_digits().filter(|p| !p.is_empty()) {
            Some(phone) => {
                self.open_by_phone(&phone)?;
                self.compose(request.message(), request.dry_run(), self.timings.selector)
            }
            None => {
                self.open_by_name(target.search_term())?;
                self.compose(request.message(), request.dry_run(), self.timings.name_selector)
            }
        }
    }

    fn run(&self, request: &SendRequest) -> ChannelAttempt {
        if let Err(e) = self.ensure_logged_in() {
            return ChannelAttempt::failed(0, e);
        }

        // A dry run walks every repeat but never submits.
        let repeats = request.max_repeats();
        let mut attempts = 0;
        let mut best: Option<Signal> = None;
        let mut last_error = None;

        for i in 0..repeats {
            attempts += 1;
            match self.send_once(request.target(), request) {
                Ok(signal) => {
                    tracing::info!(attempt = attempts, "browser send ok");
                    best = Some(signal);
                }
                Err(e) => {
                    tracing::warn!(attempt = attempts, "browser send failed: {}", e);
                    last_error = Some(e);
                }
            }
            if i + 1 < repeats {
                self.driver.pause(request.inter_repeat_delay());
            }
        }

        match (best, last_error) {
            (Some(signal), _) => ChannelAttempt::sent(attempts, signal),
            (None, Some(e)) => ChannelAttempt::failed(attempts, e),
            (None, None) => ChannelAttempt::failed(
                attempts,
                ChannelError::InteractionFailed("no repeats executed".to_string()),
            ),
        }
    }
}

impl<B: BrowserDriver> Channel for BrowserChannel<B> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Browser
    }

    fn attempt(&self, request: &SendRequest) -> ChannelAttempt {
        if let Err(e) = self.driver.start() {
            return ChannelAttempt::failed(
                0,
                ChannelError::Unavailable(format!("could not start browser session: {:#}", e)),
            );
        }

        let outcome = self.run(request);
        self.driver.stop();
        outcome
    }
}
