//! Minimal W3C WebDriver client used by the browser channel.
//!
//! Talks to a running driver (chromedriver by default) over HTTP with
//! synchronous `ureq` calls. Only the handful of endpoints the browser
//! channel needs are wrapped.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use super::BrowserDriver;
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// W3C element reference key.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a6c6-29d2e8e6ec0a";

/// WebDriver key code for Enter.
pub const ENTER_KEY: &str = "\u{E007}";

/// Browser session settings.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Driver endpoint, e.g. http://localhost:9515
    pub endpoint: String,
    /// Persistent profile directory (keeps the web client logged in)
    pub profile_dir: PathBuf,
    /// Browser binary override
    pub browser_exe: Option<PathBuf>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Interval between selector polls
    pub poll_interval: Duration,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9515".to_string(),
            profile_dir: PathBuf::from("browser-profile"),
            browser_exe: None,
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// [`BrowserDriver`] speaking the W3C WebDriver protocol.
pub struct WebDriverSession {
    config: WebDriverConfig,
    agent: ureq::Agent,
    session_id: Mutex<Option<String>>,
}

impl WebDriverSession {
    pub fn new(config: WebDriverConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout)
            .build();

        Self {
            config,
            agent,
            session_id: Mutex::new(None),
        }
    }

    /// New-session payload: Chrome with a persistent profile and visible window.
    pub fn capabilities(&self) -> Value {
        let mut chrome_options = json!({
            "args": [format!("--user-data-dir={}", self.config.profile_dir.display())],
        });
        if let Some(exe) = &self.config.browser_exe {
            chrome_options["binary"] = json!(exe.display().to_string());
        }

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": chrome_options,
                }
            }
        })
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.config.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn session_path(&self, path: &str) -> Result<String> {
        let guard = self
            .session_id
            .lock()
            .map_err(|_| anyhow!("WebDriver session lock poisoned"))?;
        let id = guard
            .as_deref()
            .ok_or_else(|| anyhow!("No WebDriver session; call start() first"))?;
        Ok(self.build_url(&format!("session/{}/{}", id, path.trim_start_matches('/'))))
    }

    /// POST a JSON body and return the response's `value` member.
    fn post(&self, url: &str, body: &Value) -> Result<Value> {
        tracing::trace!(url, "webdriver POST");
        let response = self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(map_error)?;
        let mut payload: Value = response
            .into_json()
            .context("WebDriver returned invalid JSON")?;
        Ok(payload.get_mut("value").map(Value::take).unwrap_or(Value::Null))
    }

    fn get(&self, url: &str) -> Result<Value> {
        let response = self.agent.get(url).call().map_err(map_error)?;
        let mut payload: Value = response
            .into_json()
            .context("WebDriver returned invalid JSON")?;
        Ok(payload.get_mut("value").map(Value::take).unwrap_or(Value::Null))
    }

    /// Find the first element matching a CSS selector.
    fn find(&self, selector: &str) -> Result<Option<String>> {
        let url = self.session_path("element")?;
        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(json!({"using": "css selector", "value": selector}));

        match result {
            Ok(response) => {
                let payload: Value = response
                    .into_json()
                    .context("WebDriver returned invalid JSON")?;
                let id = payload["value"][ELEMENT_KEY]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("WebDriver element response missing reference"))?;
                Ok(Some(id))
            }
            // "no such element"
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(map_error(e)),
        }
    }

    fn require(&self, selector: &str) -> Result<String> {
        self.find(selector)?
            .ok_or_else(|| anyhow!("No element matches {}", selector))
    }

    fn is_displayed(&self, element: &str) -> Result<bool> {
        let url = self.session_path(&format!("element/{}/displayed", element))?;
        Ok(self.get(&url)?.as_bool().unwrap_or(false))
    }

    /// Dispatch a keyDown/keyUp pair per character.
    fn send_key_actions(&self, keys: &str) -> Result<()> {
        let url = self.session_path("actions")?;
        self.post(&url, &key_actions(keys)).map(|_| ())
    }
}

impl BrowserDriver for WebDriverSession {
    fn start(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config.profile_dir).with_context(|| {
            format!("Failed to create profile directory: {:?}", self.config.profile_dir)
        })?;

        let value = self
            .post(&self.build_url("session"), &self.capabilities())
            .context("Failed to create WebDriver session")?;
        let id = value["sessionId"]
            .as_str()
            .ok_or_else(|| anyhow!("WebDriver new-session response missing sessionId"))?
            .to_string();

        tracing::debug!(session = %id, "webdriver session started");
        *self
            .session_id
            .lock()
            .map_err(|_| anyhow!("WebDriver session lock poisoned"))? = Some(id);
        Ok(())
    }

    fn stop(&self) {
        let id = match self.session_id.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(id) = id {
            let url = self.build_url(&format!("session/{}", id));
            if let Err(e) = self.agent.delete(&url).call() {
                tracing::warn!("Failed to close WebDriver session {}: {}", id, e);
            }
        }
    }

    fn navigate(&self, url: &str) -> Result<()> {
        let endpoint = self.session_path("url")?;
        self.post(&endpoint, &json!({ "url": url }))
            .with_context(|| format!("Failed to navigate to {}", url))
            .map(|_| ())
    }

    fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> Result<Option<String>> {
        let deadline = Instant::now() + timeout;
        loop {
            for selector in selectors {
                if let Some(element) = self.find(selector)? {
                    if self.is_displayed(&element)? {
                        return Ok(Some(selector.to_string()));
                    }
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }

    fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.find(selector)?.is_some())
    }

    fn click(&self, selector: &str) -> Result<()> {
        let element = self.require(selector)?;
        let url = self.session_path(&format!("element/{}/click", element))?;
        self.post(&url, &json!({})).map(|_| ())
    }

    fn focus(&self, selector: &str) -> Result<()> {
        let element = self.require(selector)?;
        let url = self.session_path("execute/sync")?;
        self.post(
            &url,
            &json!({
                "script": "arguments[0].focus();",
                "args": [{ ELEMENT_KEY: element }],
            }),
        )
        .map(|_| ())
    }

    fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.require(selector)?;
        let clear = self.session_path(&format!("element/{}/clear", element))?;
        self.post(&clear, &json!({}))?;
        let value = self.session_path(&format!("element/{}/value", element))?;
        self.post(&value, &json!({ "text": text })).map(|_| ())
    }

    fn type_text(&self, text: &str) -> Result<()> {
        self.send_key_actions(text)
    }

    fn press_enter(&self) -> Result<()> {
        self.send_key_actions(ENTER_KEY)
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build a W3C key action sequence typing `keys`.
pub fn key_actions(keys: &str) -> Value {
    let actions: Vec<Value> = keys
        .chars()
        .flat_map(|c| {
            let key = c.to_string();
            [
                json!({"type": "keyDown", "value": key}),
                json!({"type": "keyUp", "value": key}),
            ]
        })
        .collect();

    json!({
        "actions": [{
            "type": "key",
            "id": "keyboard",
            "actions": actions,
        }]
    })
}

fn map_error(error: ureq::Error) -> anyhow::Error {
    match error {
        ureq::Error::Status(code, response) => {
            let body = response
                .into_string()
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["value"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            anyhow!("WebDriver error (status {}): {}", code, message)
        }
        ureq::Error::Transport(transport) => anyhow!("WebDriver unreachable: {}", transport),
    }
}
