//! Destination labels and the SnooNotes → Mod Notes label table
//!
//! Mod Notes only know a fixed set of labels. SnooNotes let every subreddit
//! invent its own note types, so each display name found in an export has to
//! be mapped by hand. An export containing a display name that is not in the
//! table is rejected outright rather than importing notes with a guessed label.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Value used in the `[labels]` config table to map a note type to "no label"
pub const NO_LABEL: &str = "NONE";

/// A Reddit Mod Note label
///
/// Serialized in SCREAMING_SNAKE_CASE to match the wire format of the Mod Notes API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModNoteLabel {
    AbuseWarning,
    Ban,
    BotBan,
    HelpfulUser,
    PermaBan,
    SolidContributor,
    SpamWarning,
    SpamWatch,
}

impl ModNoteLabel {
    pub const ALL: [ModNoteLabel; 8] = [
        ModNoteLabel::AbuseWarning,
        ModNoteLabel::Ban,
        ModNoteLabel::BotBan,
        ModNoteLabel::HelpfulUser,
        ModNoteLabel::PermaBan,
        ModNoteLabel::SolidContributor,
        ModNoteLabel::SpamWarning,
        ModNoteLabel::SpamWatch,
    ];

    /// Wire name sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            ModNoteLabel::AbuseWarning => "ABUSE_WARNING",
            ModNoteLabel::Ban => "BAN",
            ModNoteLabel::BotBan => "BOT_BAN",
            ModNoteLabel::HelpfulUser => "HELPFUL_USER",
            ModNoteLabel::PermaBan => "PERMA_BAN",
            ModNoteLabel::SolidContributor => "SOLID_CONTRIBUTOR",
            ModNoteLabel::SpamWarning => "SPAM_WARNING",
            ModNoteLabel::SpamWatch => "SPAM_WATCH",
        }
    }

    /// Name shown in the Reddit UI
    pub fn display_name(&self) -> &'static str {
        match self {
            ModNoteLabel::AbuseWarning => "Abuse Warning",
            ModNoteLabel::Ban => "Ban",
            ModNoteLabel::BotBan => "Bot Ban",
            ModNoteLabel::HelpfulUser => "Helpful User",
            ModNoteLabel::PermaBan => "Permanent Ban",
            ModNoteLabel::SolidContributor => "Solid Contributor",
            ModNoteLabel::SpamWarning => "Spam Warning",
            ModNoteLabel::SpamWatch => "Spam Watch",
        }
    }
}

impl fmt::Display for ModNoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModNoteLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModNoteLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let valid: Vec<&str> = ModNoteLabel::ALL.iter().map(|l| l.as_str()).collect();
                format!(
                    "Invalid label '{}'. Valid labels are: {}, {}",
                    s,
                    valid.join(", "),
                    NO_LABEL
                )
            })
    }
}

/// Parse a label as written in the config file, where `NONE` means "no label"
pub fn parse_config_label(s: &str) -> Result<Option<ModNoteLabel>, String> {
    if s.trim().eq_ignore_ascii_case(NO_LABEL) {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

static DEFAULT_LABELS: Lazy<HashMap<&'static str, Option<ModNoteLabel>>> = Lazy::new(|| {
    HashMap::from([
        ("Abuse Warning", Some(ModNoteLabel::AbuseWarning)),
        ("Ban", Some(ModNoteLabel::Ban)),
        ("Good User", Some(ModNoteLabel::SolidContributor)),
        ("Perma Ban", Some(ModNoteLabel::PermaBan)),
        ("Spam Ban", Some(ModNoteLabel::BotBan)),
        ("Spam Perma", Some(ModNoteLabel::PermaBan)),
        ("Spam Warn", Some(ModNoteLabel::SpamWarning)),
        ("Spam Watch", Some(ModNoteLabel::SpamWatch)),
        // SnooNotes' catch-all type; imported as a plain note
        ("None", None),
    ])
});

/// Lookup table from SnooNote display name to Mod Note label
///
/// A present key with a `None` value means "import without a label"; an absent
/// key means the note type has not been mapped yet.
#[derive(Debug, Clone)]
pub struct LabelMap {
    entries: HashMap<String, Option<ModNoteLabel>>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_LABELS
                .iter()
                .map(|(name, label)| (name.to_string(), *label))
                .collect(),
        }
    }
}

impl LabelMap {
    /// Built-in table extended (or overridden) by extra entries
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<ModNoteLabel>)>,
    {
        let mut map = Self::default();
        map.entries.extend(overrides);
        map
    }

    pub fn contains(&self, display_name: &str) -> bool {
        self.entries.contains_key(display_name)
    }

    /// `None` if the display name is unmapped, `Some(None)` if it maps to no label
    pub fn get(&self, display_name: &str) -> Option<Option<ModNoteLabel>> {
        self.entries.get(display_name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
