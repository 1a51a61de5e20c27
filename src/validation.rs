//! Validation helpers for configuration values
//!
//! This module contains the checks applied to settings before an import
//! starts, and the error messages shown when they fail.

use crate::chunking::MAX_NOTE_LENGTH;
use crate::config::RedditSettings;
use crate::error::{Error, Result};
use crate::formatting::MAX_HEADER_LENGTH;
use crate::labels::{ModNoteLabel, parse_config_label};

/// Validate the configured maximum note length
///
/// # Arguments
/// * `length` - Configured maximum length in characters
///
/// # Returns
/// The length if it leaves room for text after the longest note header and
/// stays within the Mod Notes limit
pub fn validate_max_note_length(length: usize) -> Result<usize> {
    let min = MAX_HEADER_LENGTH + 1;
    if !(min..=MAX_NOTE_LENGTH).contains(&length) {
        return Err(Error::Config(format!(
            "max_note_length must be between {} and {}, got {}",
            min, MAX_NOTE_LENGTH, length
        )));
    }
    Ok(length)
}

/// Parse one entry of the `[labels]` table
///
/// # Arguments
/// * `display_name` - SnooNote display name the entry is for
/// * `value` - Label name, or `NONE` for no label
pub fn parse_label_entry(display_name: &str, value: &str) -> Result<Option<ModNoteLabel>> {
    parse_config_label(value)
        .map_err(|e| Error::Config(format!("[labels] entry '{}': {}", display_name, e)))
}

/// Names of the Reddit credentials that are not set
pub fn missing_credentials(settings: &RedditSettings) -> Vec<&'static str> {
    let fields = [
        ("client_id", &settings.client_id),
        ("client_secret", &settings.client_secret),
        ("username", &settings.username),
        ("password", &settings.password),
    ];
    fields
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
}

/// Format an error message for missing credentials
///
/// # Arguments
/// * `missing` - Names of the unset credentials
///
/// # Returns
/// A message naming each setting along with the flag and environment variable that set it
pub fn format_missing_credentials_error(missing: &[&str]) -> String {
    let hints: Vec<String> = missing
        .iter()
        .map(|name| {
            format!(
                "{} (--{} or REDDIT_{})",
                name,
                name.replace('_', "-"),
                name.to_uppercase()
            )
        })
        .collect();
    format!(
        "missing Reddit credentials: {}. Set them in the [reddit] section of the config file, \
         on the command line or in the environment, or use --dry-run",
        hints.join(", ")
    )
}
