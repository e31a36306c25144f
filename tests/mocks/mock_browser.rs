use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wolfies_whatsapp::automation::BrowserDriver;

/// Recording browser driver backed by a fixed set of visible selectors.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockBrowser {
    calls: Arc<Mutex<Vec<String>>>,
    pauses: Arc<Mutex<Vec<Duration>>>,
    visible: Arc<Mutex<HashSet<String>>>,
    fail_start: Arc<Mutex<bool>>,
    fail_enter: Arc<Mutex<bool>>,
    failed_chat_opens_left: Arc<Mutex<u32>>,
}

#[allow(dead_code)]
impl MockBrowser {
    /// A logged-in web client with every selector the channel looks for.
    pub fn logged_in() -> Self {
        Self::default().showing(&[
            r#"div[aria-label="Chat list"]"#,
            r#"div[role="textbox"]"#,
            r#"div[contenteditable="true"]"#,
            r#"div[contenteditable="true"][data-tab]"#,
            r#"div[contenteditable="true"][data-tab="3"]"#,
            r#"button[aria-label="Send"]"#,
        ])
    }

    pub fn showing(self, selectors: &[&str]) -> Self {
        self.visible
            .lock()
            .unwrap()
            .extend(selectors.iter().map(|s| s.to_string()));
        self
    }

    pub fn failing_start(self) -> Self {
        *self.fail_start.lock().unwrap() = true;
        self
    }

    pub fn failing_enter(self) -> Self {
        *self.fail_enter.lock().unwrap() = true;
        self
    }

    /// Fail the first `n` navigations to a chat deep link.
    pub fn failing_chat_opens(self, n: u32) -> Self {
        *self.failed_chat_opens_left.lock().unwrap() = n;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn track(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn require(&self, selector: &str) -> Result<()> {
        if self.visible.lock().unwrap().contains(selector) {
            Ok(())
        } else {
            Err(anyhow!("No element matches {}", selector))
        }
    }
}

impl BrowserDriver for MockBrowser {
    fn start(&self) -> Result<()> {
        self.track("start".to_string());
        if *self.fail_start.lock().unwrap() {
            return Err(anyhow!("WebDriver unreachable"));
        }
        Ok(())
    }

    fn stop(&self) {
        self.track("stop".to_string());
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.track(format!("navigate:{}", url));
        if url.contains("/send?") {
            let mut left = self.failed_chat_opens_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(anyhow!("net::ERR_CONNECTION_RESET"));
            }
        }
        Ok(())
    }

    fn wait_for_any(&self, selectors: &[&str], _timeout: Duration) -> Result<Option<String>> {
        let visible = self.visible.lock().unwrap();
        Ok(selectors
            .iter()
            .find(|s| visible.contains(**s))
            .map(|s| s.to_string()))
    }

    fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.visible.lock().unwrap().contains(selector))
    }

    fn click(&self, selector: &str) -> Result<()> {
        self.track(format!("click:{}", selector));
        self.require(selector)
    }

    fn focus(&self, selector: &str) -> Result<()> {
        self.track(format!("focus:{}", selector));
        self.require(selector)
    }

    fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.track(format!("fill:{}", text));
        self.require(selector)
    }

    fn type_text(&self, text: &str) -> Result<()> {
        self.track(format!("type:{}", text));
        Ok(())
    }

    fn press_enter(&self) -> Result<()> {
        self.track("enter".to_string());
        if *self.fail_enter.lock().unwrap() {
            return Err(anyhow!("key dispatch failed"));
        }
        Ok(())
    }

    fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}
