//! SnooNotes export data types
//!
//! These mirror the JSON written by the SnooNotes backup feature. Field names in
//! the export are PascalCase with `ID` suffixes, so ids are renamed explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accept `null` for a field that must still be present in the export
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A SnooNote note type (a subreddit-defined note category)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteTypeDefinition {
    /// Identifier, unique within an export
    #[serde(rename = "NoteTypeID")]
    pub note_type_id: u64,
    /// Subreddit that owns this note type
    pub sub_name: String,
    /// Name shown to moderators; the key into the label map
    pub display_name: String,

    // Cosmetic attributes, kept for completeness but unused by the import
    pub color_code: String,
    pub display_order: i32,
    pub bold: bool,
    pub italic: bool,
    pub icon_string: Option<String>,
    pub disabled: bool,
}

/// A note as it appears in the export, before timestamp decoding
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawNoteRecord {
    #[serde(rename = "NoteID")]
    pub(crate) note_id: u64,
    #[serde(rename = "NoteTypeID")]
    pub(crate) note_type_id: u64,
    pub(crate) sub_name: String,
    pub(crate) submitter: String,
    pub(crate) message: String,
    pub(crate) applies_to_username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub(crate) url: String,
    pub(crate) timestamp: String,
    /// Dropped from later export versions
    #[serde(default)]
    pub(crate) parent_subreddit: Option<String>,
}

/// Top-level shape of a SnooNotes export file
#[derive(Debug, Deserialize)]
pub(crate) struct RawExport {
    #[serde(rename = "NoteTypes")]
    pub(crate) note_types: Vec<NoteTypeDefinition>,
    #[serde(rename = "Notes")]
    pub(crate) notes: Vec<RawNoteRecord>,
}

/// A decoded SnooNote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub note_id: u64,
    /// Foreign key into the export's note types
    pub note_type_id: u64,
    /// Subreddit the note belongs to
    pub sub_name: String,
    /// Moderator who wrote the note
    pub submitter: String,
    pub message: String,
    /// User the note is about
    pub applies_to_username: String,
    /// Link to the content the note concerns; may be empty
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub parent_subreddit: Option<String>,
}

impl RawNoteRecord {
    pub(crate) fn into_record(self, timestamp: DateTime<Utc>) -> NoteRecord {
        NoteRecord {
            note_id: self.note_id,
            note_type_id: self.note_type_id,
            sub_name: self.sub_name,
            submitter: self.submitter,
            message: self.message,
            applies_to_username: self.applies_to_username,
            url: self.url,
            timestamp,
            parent_subreddit: self.parent_subreddit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_type_deserializes_pascal_case() {
        let json = r#"{
            "NoteTypeID": 12, "SubName": "Techman", "DisplayName": "Good User",
            "ColorCode": "008000", "DisplayOrder": 1, "Bold": false, "Italic": false,
            "IconString": null, "Disabled": false
        }"#;
        let note_type: NoteTypeDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(note_type.note_type_id, 12);
        assert_eq!(note_type.display_name, "Good User");
        assert_eq!(note_type.icon_string, None);
    }

    #[test]
    fn test_raw_note_allows_missing_parent_subreddit_and_null_url() {
        let json = r#"{
            "NoteID": 1, "NoteTypeID": 12, "SubName": "Techman", "Submitter": "Techman-",
            "Message": "hi", "AppliesToUsername": "someone", "Url": null,
            "Timestamp": "2022-09-24T18:46:14Z"
        }"#;
        let note: RawNoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(note.url, "");
        assert_eq!(note.parent_subreddit, None);
    }

    #[test]
    fn test_raw_note_requires_url_field() {
        let json = r#"{
            "NoteID": 1, "NoteTypeID": 12, "SubName": "Techman", "Submitter": "Techman-",
            "Message": "hi", "AppliesToUsername": "someone",
            "Timestamp": "2022-09-24T18:46:14Z"
        }"#;
        let err = serde_json::from_str::<RawNoteRecord>(json).unwrap_err();
        assert!(err.to_string().contains("Url"));
    }
}
