//! Runtime configuration loaded from environment variables.
//!
//! Every value has a default so the CLI works with no environment at all;
//! command-line flags override whatever is loaded here.
//!
//! CHANGELOG:
//! - 10/17/2026 - Initial implementation

use crate::contacts::manager::default_contacts_path;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration shared by the CLI and the daemon.
#[derive(Debug, Clone)]
pub struct Config {
    /// contacts.json location
    pub contacts_path: PathBuf,

    /// URL scheme registered by the desktop client (default: "whatsapp")
    pub url_scheme: String,

    /// Base URL of the web client
    pub web_url: String,

    /// WebDriver endpoint used by the browser channel
    pub webdriver_url: String,

    /// Persistent browser profile (keeps the web client logged in)
    pub profile_dir: PathBuf,

    /// Optional browser binary override
    pub browser_exe: Option<PathBuf>,

    /// Title used to discover the desktop client window
    pub window_title: String,

    /// Total wait for the desktop window after launching it (default: 15s)
    pub discovery_budget: Duration,

    /// Wait between opening a direct link and injecting the confirm key (default: 5s)
    pub direct_settle: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `WHATSAPP_CONTACTS_PATH`: contacts.json path
    /// - `WHATSAPP_URL_SCHEME`: desktop URL scheme (default: whatsapp)
    /// - `WHATSAPP_WEBDRIVER_URL`: WebDriver endpoint (default: http://localhost:9515)
    /// - `WHATSAPP_PROFILE_DIR`: browser profile directory
    /// - `WHATSAPP_BROWSER_EXE`: browser binary
    /// - `WHATSAPP_WINDOW_TITLE`: desktop window title (default: WhatsApp)
    /// - `WHATSAPP_DISCOVERY_SECS`: window discovery budget in seconds (default: 15)
    /// - `WHATSAPP_DIRECT_SETTLE_SECS`: direct-link settle delay in seconds (default: 5)
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();

        let url_scheme = env::var("WHATSAPP_URL_SCHEME").unwrap_or(defaults.url_scheme);
        if url_scheme.is_empty() || !url_scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue {
                var: "WHATSAPP_URL_SCHEME".to_string(),
                reason: format!("Must be a bare alphanumeric scheme, got: {}", url_scheme),
            });
        }

        let webdriver_url = env::var("WHATSAPP_WEBDRIVER_URL").unwrap_or(defaults.webdriver_url);
        if !webdriver_url.starts_with("http://") && !webdriver_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "WHATSAPP_WEBDRIVER_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        Ok(Config {
            contacts_path: defaults.contacts_path,
            url_scheme,
            web_url: defaults.web_url,
            webdriver_url,
            profile_dir: env::var("WHATSAPP_PROFILE_DIR")
                .map(|p| expand_path(&p))
                .unwrap_or(defaults.profile_dir),
            browser_exe: env::var("WHATSAPP_BROWSER_EXE")
                .ok()
                .map(|p| expand_path(&p)),
            window_title: env::var("WHATSAPP_WINDOW_TITLE").unwrap_or(defaults.window_title),
            discovery_budget: Self::parse_env_secs(
                "WHATSAPP_DISCOVERY_SECS",
                defaults.discovery_budget,
            )?,
            direct_settle: Self::parse_env_secs(
                "WHATSAPP_DIRECT_SETTLE_SECS",
                defaults.direct_settle,
            )?,
        })
    }

    /// Parse an environment variable as (fractional) seconds with a default value.
    fn parse_env_secs(var_name: &str, default: Duration) -> ConfigResult<Duration> {
        match env::var(var_name) {
            Ok(val) => match val.parse::<f64>().map(Duration::try_from_secs_f64) {
                Ok(Ok(duration)) => Ok(duration),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be a non-negative number of seconds, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let state_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".wolfies-whatsapp");

        Config {
            contacts_path: default_contacts_path(),
            url_scheme: "whatsapp".to_string(),
            web_url: "https://web.whatsapp.com".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            profile_dir: state_dir.join("browser-profile"),
            browser_exe: None,
            window_title: "WhatsApp".to_string(),
            discovery_budget: Duration::from_secs(15),
            direct_settle: Duration::from_secs(5),
        }
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.url_scheme, "whatsapp");
        assert_eq!(config.window_title, "WhatsApp");
        assert_eq!(config.discovery_budget, Duration::from_secs(15));
        assert_eq!(config.direct_settle, Duration::from_secs(5));
        assert!(config.profile_dir.ends_with(".wolfies-whatsapp/browser-profile"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        let mut guard = EnvGuard::new();
        guard.set("WHATSAPP_WINDOW_TITLE", "WhatsApp Beta");
        guard.set("WHATSAPP_DISCOVERY_SECS", "2.5");
        guard.set("WHATSAPP_BROWSER_EXE", "/opt/chrome/chrome");

        let config = Config::from_env().unwrap();
        assert_eq!(config.window_title, "WhatsApp Beta");
        assert_eq!(config.discovery_budget, Duration::from_millis(2500));
        assert_eq!(config.browser_exe, Some(PathBuf::from("/opt/chrome/chrome")));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_seconds() {
        let mut guard = EnvGuard::new();
        guard.set("WHATSAPP_DIRECT_SETTLE_SECS", "soon");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => {
                assert_eq!(var, "WHATSAPP_DIRECT_SETTLE_SECS")
            }
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_out_of_range_seconds() {
        let mut guard = EnvGuard::new();
        guard.set("WHATSAPP_DISCOVERY_SECS", "1e30");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => {
                assert_eq!(var, "WHATSAPP_DISCOVERY_SECS")
            }
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_negative_seconds() {
        let mut guard = EnvGuard::new();
        guard.set("WHATSAPP_DIRECT_SETTLE_SECS", "-1");

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_webdriver_url() {
        let mut guard = EnvGuard::new();
        guard.set("WHATSAPP_WEBDRIVER_URL", "localhost:9515");

        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref var, .. }) if var == "WHATSAPP_WEBDRIVER_URL"
        ));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_scheme() {
        let mut guard = EnvGuard::new();
        guard.set("WHATSAPP_URL_SCHEME", "whatsapp://");

        assert!(Config::from_env().is_err());
    }

    #[test]
    fn test_expand_path_tilde() {
        assert!(expand_path("~/profile").ends_with("profile"));
        assert_eq!(expand_path("/abs/profile"), PathBuf::from("/abs/profile"));
    }
}
