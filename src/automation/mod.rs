//! Automation drivers the channels are built on.
//!
//! Both traits take `&self`: drivers keep whatever session state they need
//! behind interior mutability, so one driver can back several channels.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial module structure

pub mod desktop;
pub mod webdriver;

use anyhow::Result;
use std::time::Duration;

/// Opaque handle to a desktop window (xdotool id, process name or pid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowId(pub String);

/// Keyboard shortcuts the desktop client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+N / Cmd+N: open the new-chat contact search
    NewChat,
}

/// OS-level UI automation: URL opening, window discovery, keystrokes.
pub trait DesktopDriver {
    /// Hand a URL to the OS opener. Ok means the opener accepted it, nothing more.
    fn open_url(&self, url: &str) -> Result<()>;

    /// Find a window whose title matches.
    fn find_window(&self, title: &str) -> Result<Option<WindowId>>;

    /// Restore and raise a window.
    fn focus(&self, window: &WindowId) -> Result<()>;

    fn shortcut(&self, window: &WindowId, shortcut: Shortcut) -> Result<()>;

    fn type_text(&self, window: &WindowId, text: &str) -> Result<()>;

    /// Press Enter in the given window, or in whatever has focus.
    fn press_enter(&self, window: Option<&WindowId>) -> Result<()>;

    /// Block the calling thread.
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Remote-controlled browser session against the web client.
pub trait BrowserDriver {
    /// Open the persistent session.
    fn start(&self) -> Result<()>;

    /// Close the session; errors are only logged.
    fn stop(&self);

    fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until one of the selectors is visible, returning the first that is.
    fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> Result<Option<String>>;

    fn exists(&self, selector: &str) -> Result<bool>;

    fn click(&self, selector: &str) -> Result<()>;

    fn focus(&self, selector: &str) -> Result<()>;

    /// Replace the contents of an input.
    fn fill(&self, selector: &str, text: &str) -> Result<()>;

    /// Type into whatever has keyboard focus.
    fn type_text(&self, text: &str) -> Result<()>;

    fn press_enter(&self) -> Result<()>;

    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
