//! Error types for the importer library
//!
//! Parse-time and configuration errors are fatal and abort the run before any
//! note is posted. Per-record platform failures never surface here; the
//! converter records them as [`crate::convert::RecordOutcome`] values instead.

use crate::platform::PlatformError;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The export (or config) file could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export is not valid JSON or a required field is missing
    #[error("malformed export {}: {source}", path.display())]
    MalformedExport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A note type's display name has no entry in the label map
    #[error(
        "note type {note_type_id} has display name '{display_name}' which is not in the label map; \
         add it to the [labels] table of the config file"
    )]
    UnmappedLabel {
        note_type_id: u64,
        display_name: String,
    },

    #[error("note {note_id} has unrecognized timestamp '{value}': {source}")]
    TimestampFormat {
        note_id: u64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A note refers to a note type that is not part of the export
    #[error("note {note_id} refers to note type {note_type_id} which is not in the export")]
    UnknownNoteType { note_id: u64, note_type_id: u64 },

    /// The converter was handed a note whose type is missing from the index.
    /// The parser rules this out, so hitting it means the inputs were built by hand.
    #[error("note {note_id}: note type {note_type_id} is missing from the type index")]
    IndexInconsistency { note_id: u64, note_type_id: u64 },

    #[error("note header is {header_len} characters, leaving no room in a {max_size}-character note")]
    HeaderTooLong { header_len: usize, max_size: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not authenticate with Reddit: {0}")]
    Authentication(#[source] PlatformError),
}
