//! SnooNotes export handling
//!
//! This module contains the data model of a SnooNotes backup file and the
//! parser that turns it into typed records:
//! - `types`: note types and notes as they appear in the export
//! - `timestamp`: decoding of the historical timestamp encodings
//! - `parser`: validation, skip rules and the note type index

mod parser;
mod timestamp;
mod types;

pub use parser::{DELETED_ACCOUNT, ParsedExport, SkipCounts, SnooNoteParser, TimestampPolicy, parse};
pub use timestamp::parse_timestamp;
pub use types::{NoteRecord, NoteTypeDefinition};
