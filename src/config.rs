//! Configuration file
//!
//! Settings are read from a TOML file. A missing file is not an error: every
//! setting has a default, and credentials can come from the command line.
//!
//! ```toml
//! [reddit]
//! client_id = "..."
//! client_secret = "..."
//! username = "my-mod-account"
//! password = "..."
//!
//! [import]
//! on_bad_timestamp = "skip"
//!
//! [labels]
//! "Shadow Ban" = "BOT_BAN"
//! "Watching" = "NONE"
//! ```

use crate::chunking::MAX_NOTE_LENGTH;
use crate::convert::ConvertOptions;
use crate::error::{Error, Result};
use crate::labels::LabelMap;
use crate::platform::{RedditClientConfig, RedditCredentials};
use crate::snoonotes::{DELETED_ACCOUNT, TimestampPolicy};
use crate::validation;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub reddit: RedditSettings,
    pub import: ImportSettings,
    /// SnooNote display name → Mod Note label (or `NONE`)
    pub labels: BTreeMap<String, String>,
}

#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedditSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub auth_url: String,
    pub api_url: String,
}

impl Default for RedditSettings {
    fn default() -> Self {
        let defaults = RedditClientConfig::new(RedditCredentials {
            client_id: String::new(),
            client_secret: String::new(),
            username: String::new(),
            password: String::new(),
        });
        Self {
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            user_agent: defaults.user_agent,
            timeout_secs: defaults.timeout.as_secs(),
            auth_url: defaults.auth_url,
            api_url: defaults.api_url,
        }
    }
}

impl std::fmt::Debug for RedditSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditSettings")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportSettings {
    pub max_note_length: usize,
    pub on_bad_timestamp: TimestampPolicy,
    /// Username marking deleted accounts
    pub tombstone: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_note_length: MAX_NOTE_LENGTH,
            on_bad_timestamp: TimestampPolicy::default(),
            tombstone: DELETED_ACCOUNT.to_string(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the settings; credentials are only required when posting for real
    pub fn validate(&self, require_credentials: bool) -> Result<()> {
        validation::validate_max_note_length(self.import.max_note_length)?;
        self.label_map()?;

        if require_credentials {
            let missing = validation::missing_credentials(&self.reddit);
            if !missing.is_empty() {
                return Err(Error::Config(
                    validation::format_missing_credentials_error(&missing),
                ));
            }
        }
        Ok(())
    }

    /// Built-in label map extended with the `[labels]` table
    pub fn label_map(&self) -> Result<LabelMap> {
        let overrides = self
            .labels
            .iter()
            .map(|(name, value)| {
                validation::parse_label_entry(name, value).map(|label| (name.clone(), label))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(LabelMap::with_overrides(overrides))
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            max_note_length: self.import.max_note_length,
            ..Default::default()
        }
    }

    /// Reddit client settings; fails if any credential is missing
    pub fn reddit_client_config(&self) -> Result<RedditClientConfig> {
        let missing = validation::missing_credentials(&self.reddit);
        let credential = |value: &Option<String>| value.clone().unwrap_or_default();
        if !missing.is_empty() {
            return Err(Error::Config(
                validation::format_missing_credentials_error(&missing),
            ));
        }

        let mut config = RedditClientConfig::new(RedditCredentials {
            client_id: credential(&self.reddit.client_id),
            client_secret: credential(&self.reddit.client_secret),
            username: credential(&self.reddit.username),
            password: credential(&self.reddit.password),
        });
        config.user_agent = self.reddit.user_agent.clone();
        config.timeout = Duration::from_secs(self.reddit.timeout_secs);
        config.auth_url = self.reddit.auth_url.trim_end_matches('/').to_string();
        config.api_url = self.reddit.api_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::ModNoteLabel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load("/nonexistent/modnote-importer.toml").unwrap();
        assert_eq!(config.import.max_note_length, 250);
        assert_eq!(config.import.on_bad_timestamp, TimestampPolicy::Abort);
        assert_eq!(config.import.tombstone, "[deleted]");
        assert_eq!(config.reddit.api_url, "https://oauth.reddit.com");
        assert!(config.labels.is_empty());
    }

    #[test]
    fn test_load_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[reddit]
client_id = "abc"
client_secret = "shh"
username = "modbot"
password = "pw"
api_url = "http://localhost:9999/"

[import]
max_note_length = 200
on_bad_timestamp = "skip"

[labels]
"Shadow Ban" = "BOT_BAN"
"Watching" = "NONE"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        config.validate(true).unwrap();
        assert_eq!(config.import.on_bad_timestamp, TimestampPolicy::Skip);
        assert_eq!(config.convert_options().max_note_length, 200);

        let labels = config.label_map().unwrap();
        assert_eq!(labels.get("Shadow Ban"), Some(Some(ModNoteLabel::BotBan)));
        assert_eq!(labels.get("Watching"), Some(None));
        assert_eq!(labels.get("Good User"), Some(Some(ModNoteLabel::SolidContributor)));

        let client = config.reddit_client_config().unwrap();
        assert_eq!(client.credentials.username, "modbot");
        assert_eq!(client.api_url, "http://localhost:9999");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[import]\nmax_length = 10\n").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_validate_requires_credentials_only_when_posting() {
        let config = Config::default();
        assert!(config.validate(false).is_ok());
        let err = config.validate(true).unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_note_length_must_fit_longest_header() {
        let mut config = Config::default();
        config.import.max_note_length = 50;
        let err = config.validate(false).unwrap_err();
        assert!(err.to_string().contains("max_note_length"));
    }

    #[test]
    fn test_bad_label_value_is_rejected() {
        let mut config = Config::default();
        config
            .labels
            .insert("Shadow Ban".to_string(), "SHADOW".to_string());
        assert!(matches!(config.validate(false), Err(Error::Config(_))));
    }
}
