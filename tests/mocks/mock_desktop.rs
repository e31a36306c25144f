use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wolfies_whatsapp::automation::{DesktopDriver, Shortcut, WindowId};

/// Recording desktop driver.
///
/// Every call is appended to a shared log, so a clone kept by the test sees
/// what the channel did. `pause` records the duration instead of sleeping.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockDesktop {
    calls: Arc<Mutex<Vec<String>>>,
    pauses: Arc<Mutex<Vec<Duration>>>,
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    fail_open: bool,
    fail_enter: bool,
    fail_type: bool,
    /// `None`: the window never shows up
    window_after_lookups: Option<usize>,
    lookups: usize,
}

#[allow(dead_code)]
impl MockDesktop {
    /// A desktop where the client window is already open.
    pub fn with_window() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().window_after_lookups = Some(0);
        mock
    }

    /// A desktop where the client window never appears.
    pub fn without_window() -> Self {
        Self::default()
    }

    /// Window appears once `lookups` lookups have missed it.
    pub fn window_after(self, lookups: usize) -> Self {
        self.state.lock().unwrap().window_after_lookups = Some(lookups);
        self
    }

    pub fn failing_open(self) -> Self {
        self.state.lock().unwrap().fail_open = true;
        self
    }

    pub fn failing_enter(self) -> Self {
        self.state.lock().unwrap().fail_enter = true;
        self
    }

    pub fn failing_type(self) -> Self {
        self.state.lock().unwrap().fail_type = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    /// Number of calls whose log entry starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn track(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DesktopDriver for MockDesktop {
    fn open_url(&self, url: &str) -> Result<()> {
        self.track(format!("open_url:{}", url));
        if self.state.lock().unwrap().fail_open {
            return Err(anyhow!("no handler for {}", url));
        }
        Ok(())
    }

    fn find_window(&self, title: &str) -> Result<Option<WindowId>> {
        self.track(format!("find_window:{}", title));
        let mut state = self.state.lock().unwrap();
        let found = match state.window_after_lookups {
            Some(after) => state.lookups >= after,
            None => false,
        };
        state.lookups += 1;
        Ok(found.then(|| WindowId("42".to_string())))
    }

    fn focus(&self, window: &WindowId) -> Result<()> {
        self.track(format!("focus:{}", window.0));
        Ok(())
    }

    fn shortcut(&self, _window: &WindowId, shortcut: Shortcut) -> Result<()> {
        self.track(format!("shortcut:{:?}", shortcut));
        Ok(())
    }

    fn type_text(&self, _window: &WindowId, text: &str) -> Result<()> {
        self.track(format!("type:{}", text));
        if self.state.lock().unwrap().fail_type {
            return Err(anyhow!("keystroke injection refused"));
        }
        Ok(())
    }

    fn press_enter(&self, _window: Option<&WindowId>) -> Result<()> {
        self.track("enter".to_string());
        if self.state.lock().unwrap().fail_enter {
            return Err(anyhow!("keystroke injection refused"));
        }
        Ok(())
    }

    fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}
