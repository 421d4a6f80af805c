//! Configuration model (`config.toml`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::identity::IdentifierStyle;

/// Root of `config.toml`. Every section and field has a default, so an
/// empty file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ThanklyConfig {
    pub directory: DirectorySettings,
    pub search: SearchSettings,
    pub identifier: IdentifierSettings,
    pub share: ShareSettings,
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DirectorySettings {
    /// Root URL of the directory backend. Unset disables the directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 10,
        }
    }
}

impl DirectorySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured base URL, ignoring blank values.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a request is sent.
    pub debounce_ms: u64,
    /// Shorter terms clear the results without asking the directory.
    pub min_term_length: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_term_length: 3,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct IdentifierSettings {
    pub style: IdentifierStyle,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ShareSettings {
    /// Page the identifier fragment is appended to.
    pub base_url: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/appreciation-calendar".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: ThanklyConfig = toml::from_str("").unwrap();
        assert_eq!(config, ThanklyConfig::default());
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.min_term_length, 3);
        assert!(config.directory.base_url().is_none());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: ThanklyConfig = toml::from_str(
            r#"
            [directory]
            base_url = "https://thankly.example"

            [identifier]
            style = "compact"
            "#,
        )
        .unwrap();
        assert_eq!(config.directory.base_url(), Some("https://thankly.example"));
        assert_eq!(config.directory.timeout_secs, 10);
        assert_eq!(config.identifier.style, IdentifierStyle::Compact);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_blank_base_url_disables_directory() {
        let config: ThanklyConfig = toml::from_str("[directory]\nbase_url = \"  \"").unwrap();
        assert!(config.directory.base_url().is_none());
    }
}
