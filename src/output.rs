//! Output formatting and control utilities.
//!
//! CHANGELOG:
//! - 10/17/2026 - Dropped field filtering and truncation presets
//! - 01/10/2026 - Initial implementation

use serde::Serialize;
use serde_json::json;

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
}

impl OutputControls {
    /// Emit data according to output controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let value = serde_json::to_value(data).unwrap_or(json!(null));

        if self.compact {
            serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
        }
    }

    /// Print data to stdout according to output controls.
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }

    /// JSON when `--json` is set, otherwise the human line.
    pub fn report<T: Serialize>(&self, data: &T, human: impl FnOnce() -> String) {
        if self.json {
            self.print(data);
        } else {
            println!("{}", human());
        }
    }
}

/// Format error as JSON.
pub fn format_error(error: &str) -> String {
    serde_json::to_string(&json!({
        "error": error,
        "success": false
    }))
    .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_compact() {
        let controls = OutputControls {
            json: true,
            compact: true,
        };
        assert_eq!(controls.emit(&json!({"a": 1, "b": [1, 2]})), r#"{"a":1,"b":[1,2]}"#);
    }

    #[test]
    fn test_emit_pretty() {
        let controls = OutputControls {
            json: true,
            compact: false,
        };
        assert_eq!(controls.emit(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_format_error() {
        let value: serde_json::Value = serde_json::from_str(&format_error("boom")).unwrap();
        assert_eq!(value["error"], "boom");
        assert_eq!(value["success"], false);
    }
}
