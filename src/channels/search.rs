//! Search channel: drive the desktop client's new-chat search by keyboard.
//!
//! Sequence: locate or launch the window, focus, new-chat shortcut, type the
//! contact, confirm, then type and submit the message for each repeat.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::{Channel, ChannelAttempt};
use crate::automation::{DesktopDriver, Shortcut, WindowId};
use crate::dispatch::request::{ChannelKind, SendRequest, Signal};
use crate::error::ChannelError;
use std::time::Duration;

/// Waits used while driving the desktop client.
#[derive(Debug, Clone)]
pub struct SearchTimings {
    /// Total wait for the window after launching the client
    pub discovery_budget: Duration,
    /// Interval between window lookups
    pub poll_interval: Duration,
    /// Render time once a freshly launched window appears
    pub launch_settle: Duration,
    /// Wait after focusing
    pub focus_settle: Duration,
    /// Wait after each navigation keystroke
    pub key_pause: Duration,
    /// Wait for the chat to open after confirming the contact
    pub chat_load: Duration,
}

impl Default for SearchTimings {
    fn default() -> Self {
        Self {
            discovery_budget: Duration::from_secs(15),
            poll_interval: Duration::from_secs(1),
            launch_settle: Duration::from_secs(2),
            focus_settle: Duration::from_millis(500),
            key_pause: Duration::from_secs(1),
            chat_load: Duration::from_secs(3),
        }
    }
}

impl SearchTimings {
    /// Every wait set to zero.
    pub fn immediate() -> Self {
        Self {
            discovery_budget: Duration::ZERO,
            poll_interval: Duration::ZERO,
            launch_settle: Duration::ZERO,
            focus_settle: Duration::ZERO,
            key_pause: Duration::ZERO,
            chat_load: Duration::ZERO,
        }
    }

    /// Number of window lookups that fit in the discovery budget (at least one).
    fn polls(&self) -> u32 {
        let poll_ms = self.poll_interval.as_millis().max(1);
        let polls = (self.discovery_budget.as_millis() + poll_ms - 1) / poll_ms;
        u32::try_from(polls).unwrap_or(u32::MAX).max(1)
    }
}

pub struct SearchChannel<D> {
    driver: D,
    scheme: String,
    window_title: String,
    timings: SearchTimings,
}

impl<D: DesktopDriver> SearchChannel<D> {
    pub fn new(driver: D, scheme: &str, window_title: &str, timings: SearchTimings) -> Self {
        Self {
            driver,
            scheme: scheme.to_string(),
            window_title: window_title.to_string(),
            timings,
        }
    }

    fn find(&self) -> Option<WindowId> {
        match self.driver.find_window(&self.window_title) {
            Ok(window) => window,
            Err(e) => {
                tracing::debug!("window lookup failed: {:#}", e);
                None
            }
        }
    }

    /// Find the client window, launching the client if it is not running.
    fn locate_or_launch(&self) -> Option<WindowId> {
        if let Some(window) = self.find() {
            return Some(window);
        }

        tracing::info!("{} window not found, launching via {}://", self.window_title, self.scheme);
        if let Err(e) = self.driver.open_url(&format!("{}://", self.scheme)) {
            tracing::warn!("failed to launch {}: {:#}", self.window_title, e);
            return None;
        }

        for _ in 0..self.timings.polls() {
            self.driver.pause(self.timings.poll_interval);
            if let Some(window) = self.find() {
                self.driver.pause(self.timings.launch_settle);
                return Some(window);
            }
        }
        None
    }

    /// New chat, type the contact, confirm.
    fn open_chat(&self, window: &WindowId, term: &str) -> anyhow::Result<()> {
        self.driver.shortcut(window, Shortcut::NewChat)?;
        self.driver.pause(self.timings.key_pause);
        self.driver.type_text(window, term)?;
        self.driver.pause(self.timings.key_pause);
        self.driver.press_enter(Some(window))?;
        self.driver.pause(self.timings.chat_load);
        Ok(())
    }
}

impl<D: DesktopDriver> Channel for SearchChannel<D> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Search
    }

    fn attempt(&self, request: &SendRequest) -> ChannelAttempt {
        let Some(window) = self.locate_or_launch() else {
            return ChannelAttempt::failed(
                0,
                ChannelError::Unavailable(format!(
                    "{} window did not appear within {:?}",
                    self.window_title, self.timings.discovery_budget
                )),
            );
        };

        if let Err(e) = self.driver.focus(&window) {
            tracing::warn!("could not focus {}: {:#}", self.window_title, e);
        }
        self.driver.pause(self.timings.focus_settle);

        let term = request.target().search_term();
        if let Err(e) = self.open_chat(&window, term) {
            return ChannelAttempt::failed(
                0,
                ChannelError::InteractionFailed(format!("could not select {}: {:#}", term, e)),
            );
        }
        tracing::debug!(contact = %term, "chat selected");

        // A dry run walks every repeat but never submits.
        let repeats = request.max_repeats();
        let mut attempts = 0;
        for i in 0..repeats {
            attempts += 1;
            let step = self.driver.type_text(&window, request.message()).and_then(|_| {
                if request.dry_run() {
                    Ok(())
                } else {
                    self.driver.press_enter(Some(&window))
                }
            });
            if let Err(e) = step {
                return ChannelAttempt::failed(
                    attempts,
                    ChannelError::InteractionFailed(format!("sending repeat {} failed: {:#}", attempts, e)),
                );
            }
            if i + 1 < repeats {
                self.driver.pause(request.inter_repeat_delay());
            }
        }

        let signal = if request.dry_run() { Signal::Drafted } else { Signal::Submitted };
        ChannelAttempt::sent(attempts, signal)
    }
}
