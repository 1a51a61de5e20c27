//! SnooNotes export parser
//!
//! Reads an export in one pass, validates every note type against the label
//! map and decodes the notes. Any structural or label problem aborts the whole
//! parse; nothing is returned for a partially valid file.

use super::timestamp::parse_timestamp;
use super::types::{NoteRecord, NoteTypeDefinition, RawExport};
use crate::error::{Error, Result};
use crate::labels::LabelMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Username Reddit shows for accounts that no longer exist
pub const DELETED_ACCOUNT: &str = "[deleted]";

/// What to do with a note whose timestamp cannot be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Fail the whole parse
    #[default]
    Abort,
    /// Log the note and leave it out
    Skip,
}

/// Notes left out of the parse result and why
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub deleted_accounts: usize,
    pub bad_timestamps: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.deleted_accounts + self.bad_timestamps
    }
}

/// Result of parsing an export
#[derive(Debug, Clone, Default)]
pub struct ParsedExport {
    /// Note types in export order
    pub note_types: Vec<NoteTypeDefinition>,
    /// Notes in export order, minus skipped ones
    pub notes: Vec<NoteRecord>,
    /// Note type id → note type
    pub type_index: HashMap<u64, NoteTypeDefinition>,
    pub skipped: SkipCounts,
}

pub struct SnooNoteParser {
    file_path: PathBuf,
    labels: LabelMap,
    timestamp_policy: TimestampPolicy,
    tombstone: String,
}

impl SnooNoteParser {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            labels: LabelMap::default(),
            timestamp_policy: TimestampPolicy::default(),
            tombstone: DELETED_ACCOUNT.to_string(),
        }
    }

    pub fn with_labels(mut self, labels: LabelMap) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }

    pub fn with_tombstone(mut self, tombstone: impl Into<String>) -> Self {
        self.tombstone = tombstone.into();
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read and decode the export file
    ///
    /// # Errors
    /// * [`Error::FileAccess`] if the file cannot be read
    /// * [`Error::MalformedExport`] if the JSON is invalid or a required field is missing
    /// * [`Error::UnmappedLabel`] if a note type's display name is not in the label map
    /// * [`Error::UnknownNoteType`] if a note refers to a note type not in the export
    /// * [`Error::TimestampFormat`] if a timestamp is unrecognized and the policy is `Abort`
    pub fn parse(&self) -> Result<ParsedExport> {
        let content = fs::read_to_string(&self.file_path).map_err(|source| Error::FileAccess {
            path: self.file_path.clone(),
            source,
        })?;
        self.parse_str(&content)
    }

    /// Decode an export already held in memory
    pub fn parse_str(&self, content: &str) -> Result<ParsedExport> {
        let raw: RawExport =
            serde_json::from_str(content).map_err(|source| Error::MalformedExport {
                path: self.file_path.clone(),
                source,
            })?;

        let mut export = ParsedExport {
            note_types: Vec::with_capacity(raw.note_types.len()),
            notes: Vec::with_capacity(raw.notes.len()),
            type_index: HashMap::with_capacity(raw.note_types.len()),
            skipped: SkipCounts::default(),
        };

        for note_type in raw.note_types {
            if !self.labels.contains(&note_type.display_name) {
                return Err(Error::UnmappedLabel {
                    note_type_id: note_type.note_type_id,
                    display_name: note_type.display_name,
                });
            }
            if export.type_index.contains_key(&note_type.note_type_id) {
                warn!(
                    note_type_id = note_type.note_type_id,
                    "duplicate note type id in export, keeping the first definition"
                );
                continue;
            }
            export
                .type_index
                .insert(note_type.note_type_id, note_type.clone());
            export.note_types.push(note_type);
        }

        for raw_note in raw.notes {
            if raw_note
                .applies_to_username
                .eq_ignore_ascii_case(&self.tombstone)
            {
                info!(note_id = raw_note.note_id, "skipping note for deleted account");
                export.skipped.deleted_accounts += 1;
                continue;
            }

            if !export.type_index.contains_key(&raw_note.note_type_id) {
                return Err(Error::UnknownNoteType {
                    note_id: raw_note.note_id,
                    note_type_id: raw_note.note_type_id,
                });
            }

            let timestamp = match parse_timestamp(&raw_note.timestamp) {
                Ok(ts) => ts,
                Err(source) => match self.timestamp_policy {
                    TimestampPolicy::Abort => {
                        return Err(Error::TimestampFormat {
                            note_id: raw_note.note_id,
                            value: raw_note.timestamp,
                            source,
                        });
                    }
                    TimestampPolicy::Skip => {
                        warn!(
                            note_id = raw_note.note_id,
                            timestamp = %raw_note.timestamp,
                            error = %source,
                            "skipping note with unrecognized timestamp"
                        );
                        export.skipped.bad_timestamps += 1;
                        continue;
                    }
                },
            };

            debug!(note_id = raw_note.note_id, user = %raw_note.applies_to_username, "decoded note");
            export.notes.push(raw_note.into_record(timestamp));
        }

        info!(
            path = %self.file_path.display(),
            note_types = export.note_types.len(),
            notes = export.notes.len(),
            skipped = export.skipped.total(),
            "parsed SnooNotes export"
        );
        Ok(export)
    }
}

/// Parse an export with the built-in label map and default policies
pub fn parse(path: impl AsRef<Path>) -> Result<ParsedExport> {
    SnooNoteParser::new(path).parse()
}
