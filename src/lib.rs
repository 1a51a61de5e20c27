//! SnooNotes to Mod Notes importer
//!
//! This library migrates moderator notes exported from SnooNotes into Reddit's
//! native Mod Notes. It parses the export, maps each SnooNote type to a Mod
//! Note label, resolves the linked comment or submission, splits notes that are
//! too long, and posts them one at a time.
//!
//! # Architecture
//!
//! The library is organized in two stages with a one-way data flow:
//! - **Parse**: `snoonotes` - Decodes and validates the export, building a note type index
//! - **Convert**: `convert` - Posts notes through a `platform::PlatformClient`
//!
//! Supporting modules: `labels` (label table), `chunking` (note splitting),
//! `reference` (URL resolution), `config`, `logging` and `formatting`.
//!
//! # Example
//!
//! ```no_run
//! use modnote_importer::convert::{ConvertOptions, import};
//! use modnote_importer::labels::LabelMap;
//! use modnote_importer::platform::DryRunClient;
//! use modnote_importer::snoonotes::SnooNoteParser;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let labels = LabelMap::default();
//!     let export = SnooNoteParser::new("snoonotes.json")
//!         .with_labels(labels.clone())
//!         .parse()?;
//!     let mut client = DryRunClient::new();
//!     let report = import(&mut client, &export, &labels, ConvertOptions::default()).await?;
//!     println!("{} notes imported", report.posted);
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod convert;
pub mod error;
pub mod formatting;
pub mod labels;
pub mod logging;
pub mod platform;
pub mod reference;
pub mod snoonotes;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use convert::{ConvertOptions, Converter, ImportReport, RecordOutcome};
pub use error::{Error, Result};
pub use labels::{LabelMap, ModNoteLabel};
pub use platform::{PlatformClient, PlatformError};
pub use snoonotes::{NoteRecord, NoteTypeDefinition, ParsedExport, SnooNoteParser};
