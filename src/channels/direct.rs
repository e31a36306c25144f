//! Direct-address channel: open a prefilled chat by deep link, then inject
//! the confirm keystroke.
//!
//! Success here only means the OS opener accepted the link and the key was
//! delivered to the focused window. Nothing observes the draft itself.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::{Channel, ChannelAttempt};
use crate::automation::DesktopDriver;
use crate::dispatch::request::{ChannelKind, SendRequest, Signal, Target};
use crate::error::ChannelError;
use std::time::Duration;

/// Build `<scheme>://send?phone=<digits>&text=<url-encoded message>`.
pub fn deep_link(scheme: &str, phone_digits: &str, message: &str) -> String {
    format!(
        "{}://send?phone={}&text={}",
        scheme,
        phone_digits,
        urlencoding::encode(message)
    )
}

pub struct DirectAddressChannel<D> {
    driver: D,
    scheme: String,
    window_title: String,
    /// Time for the client to come up and insert the draft
    settle: Duration,
}

impl<D: DesktopDriver> DirectAddressChannel<D> {
    pub fn new(driver: D, scheme: &str, window_title: &str, settle: Duration) -> Self {
        Self {
            driver,
            scheme: scheme.to_string(),
            window_title: window_title.to_string(),
            settle,
        }
    }
}

impl<D: DesktopDriver> Channel for DirectAddressChannel<D> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::DirectAddress
    }

    fn supports(&self, target: &Target) -> bool {
        target.phone_digits().is_some_and(|p| !p.is_empty())
    }

    fn attempt(&self, request: &SendRequest) -> ChannelAttempt {
        let Some(phone) = request.target().phone_digits().filter(|p| !p.is_empty()) else {
            return ChannelAttempt::failed(
                0,
                ChannelError::Unavailable("no phone identifier".to_string()),
            );
        };

        let url = deep_link(&self.scheme, &phone, request.message());
        if let Err(e) = self.driver.open_url(&url) {
            return ChannelAttempt::failed(
                1,
                ChannelError::Unavailable(format!("could not open {}:// link: {:#}", self.scheme, e)),
            );
        }
        tracing::info!(phone = %phone, "direct link opened");

        self.driver.pause(self.settle);

        let window = match self.driver.find_window(&self.window_title) {
            Ok(window) => window,
            Err(e) => {
                tracing::debug!("window lookup failed: {:#}", e);
                None
            }
        };
        if let Some(w) = &window {
            if let Err(e) = self.driver.focus(w) {
                tracing::warn!("could not focus {}: {:#}", self.window_title, e);
            }
        }

        if request.dry_run() {
            return ChannelAttempt::sent(1, Signal::Drafted);
        }

        match self.driver.press_enter(window.as_ref()) {
            Ok(()) => ChannelAttempt::sent(1, Signal::KeystrokeInjected),
            Err(e) => ChannelAttempt::failed(
                1,
                ChannelError::InteractionFailed(format!("confirm keystroke failed: {:#}", e)),
            ),
        }
    }
}
