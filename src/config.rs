//! Export configuration.
//!
//! Everything has a default matching the supported sites, so an empty file
//! (or no file at all) is a valid configuration:
//!
//! ```toml
//! title_line = "# Exported conversation"
//! default_filename = "chat_export"
//!
//! [selectors]
//! bubble = "div.message-bubble"
//! user_query = "user-query-content"
//! model_response = "model-response"
//! generic = ["div[data-message-id]", "div.message", "div.chat-line"]
//! active_title = "#history a[data-active]"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filename::DEFAULT_FILENAME;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First line of every exported document.
    pub title_line: String,
    /// File stem used when the page has no title.
    pub default_filename: String,
    pub selectors: SelectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title_line: "# Exported conversation".into(),
            default_filename: DEFAULT_FILENAME.into(),
            selectors: SelectorConfig::default(),
        }
    }
}

/// CSS selectors used to find conversation turns on each layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Message bubbles on the bubble-list layout (Grok).
    pub bubble: String,
    /// User prompts on the paired layout (Gemini).
    pub user_query: String,
    /// Model answers on the paired layout (Gemini).
    pub model_response: String,
    /// Message containers on the generic layout (ChatGPT), any of which
    /// marks a turn.
    pub generic: Vec<String>,
    /// Active conversation link whose text titles a generic page.
    pub active_title: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            bubble: "div.message-bubble".into(),
            user_query: "user-query-content".into(),
            model_response: "model-response".into(),
            generic: vec![
                "div[data-message-id]".into(),
                "div.message".into(),
                "div.chat-line".into(),
            ],
            active_title: "#history a[data-active]".into(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r##"
            title_line = "# Chat log"

            [selectors]
            generic = ["article[data-turn]"]
            "##,
        )
        .unwrap();

        assert_eq!(config.title_line, "# Chat log");
        assert_eq!(config.default_filename, "chat_export");
        assert_eq!(config.selectors.generic, vec!["article[data-turn]"]);
        assert_eq!(config.selectors.bubble, "div.message-bubble");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("title_line = [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_filename = \"conversation\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_filename, "conversation");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/chatdown.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
