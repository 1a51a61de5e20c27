//! Conversion of parsed SnooNotes into Mod Notes
//!
//! Notes are processed one at a time in export order. For each note the
//! converter derives the label, resolves the linked item, splits over-long
//! text and posts the resulting Mod Notes in order. Failures are contained to
//! the note that caused them; only invariant violations abort the run.

use crate::chunking::{MAX_NOTE_LENGTH, split_message_into_chunks};
use crate::error::{Error, Result};
use crate::formatting::note_header;
use crate::labels::{LabelMap, ModNoteLabel};
use crate::platform::{FailureClass, NewNote, PlatformClient};
use crate::reference::resolve_reference;
use crate::snoonotes::{NoteRecord, NoteTypeDefinition, ParsedExport, SkipCounts};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// How many times a note is re-posted without its linked item after Reddit rejects the link
pub const MAX_REFERENCE_RETRIES: usize = 1;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Maximum length of a single Mod Note
    pub max_note_length: usize,
    /// Only convert notes of this subreddit (case-insensitive)
    pub subreddit: Option<String>,
    /// Skip notes up to and including this note id
    pub resume_after: Option<u64>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_note_length: MAX_NOTE_LENGTH,
            subreddit: None,
            resume_after: None,
        }
    }
}

/// What happened to a single SnooNote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Posted {
        note_id: u64,
        label: Option<ModNoteLabel>,
        /// Mod Notes created for this SnooNote (more than one when split)
        notes_created: usize,
        /// Fullname of the linked item, if any note was posted with it
        reference: Option<String>,
        /// The link was rejected and the note re-posted without it
        reference_dropped: bool,
    },
    Dropped {
        note_id: u64,
        class: FailureClass,
        /// Chunks already posted before the failure
        notes_created: usize,
        error: String,
    },
    Filtered {
        note_id: u64,
    },
}

/// Counts and per-note outcomes of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub parsed: usize,
    pub skipped: SkipCounts,
    pub filtered: usize,
    /// SnooNotes fully imported
    pub posted: usize,
    /// Mod Notes created, including partial imports of failed notes
    pub notes_created: usize,
    pub retried_without_reference: usize,
    pub failed: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl ImportReport {
    fn record(&mut self, outcome: RecordOutcome) {
        match &outcome {
            RecordOutcome::Posted {
                notes_created,
                reference_dropped,
                ..
            } => {
                self.posted += 1;
                self.notes_created += notes_created;
                if *reference_dropped {
                    self.retried_without_reference += 1;
                }
            }
            RecordOutcome::Dropped { notes_created, .. } => {
                self.failed += 1;
                self.notes_created += notes_created;
            }
            RecordOutcome::Filtered { .. } => self.filtered += 1,
        }
        self.outcomes.push(outcome);
    }
}

pub struct Converter<'a, C> {
    client: &'a mut C,
    labels: &'a LabelMap,
    options: ConvertOptions,
}

impl<'a, C: PlatformClient> Converter<'a, C> {
    pub fn new(client: &'a mut C, labels: &'a LabelMap) -> Self {
        Self {
            client,
            labels,
            options: ConvertOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Post every note, in order
    ///
    /// # Errors
    /// * [`Error::IndexInconsistency`] / [`Error::UnmappedLabel`] if a note's type
    ///   cannot be labelled; the parser rules both out
    pub async fn convert(
        &mut self,
        notes: &[NoteRecord],
        type_index: &HashMap<u64, NoteTypeDefinition>,
    ) -> Result<ImportReport> {
        let mut report = ImportReport {
            parsed: notes.len(),
            ..Default::default()
        };
        let mut resuming = self.options.resume_after.is_some();

        for record in notes {
            if resuming {
                if Some(record.note_id) == self.options.resume_after {
                    resuming = false;
                }
                report.record(RecordOutcome::Filtered {
                    note_id: record.note_id,
                });
                continue;
            }
            if let Some(subreddit) = &self.options.subreddit
                && !record.sub_name.eq_ignore_ascii_case(subreddit)
            {
                report.record(RecordOutcome::Filtered {
                    note_id: record.note_id,
                });
                continue;
            }

            let label = self.label_for(record, type_index)?;
            let outcome = self.convert_record(record, label).await?;
            report.record(outcome);
        }

        if resuming {
            warn!(
                note_id = ?self.options.resume_after,
                "resume point was not found in the export, nothing was imported"
            );
        }
        info!(
            posted = report.posted,
            notes_created = report.notes_created,
            failed = report.failed,
            "conversion finished"
        );
        Ok(report)
    }

    fn label_for(
        &self,
        record: &NoteRecord,
        type_index: &HashMap<u64, NoteTypeDefinition>,
    ) -> Result<Option<ModNoteLabel>> {
        let note_type = type_index
            .get(&record.note_type_id)
            .ok_or(Error::IndexInconsistency {
                note_id: record.note_id,
                note_type_id: record.note_type_id,
            })?;
        self.labels
            .get(&note_type.display_name)
            .ok_or_else(|| Error::UnmappedLabel {
                note_type_id: note_type.note_type_id,
                display_name: note_type.display_name.clone(),
            })
    }

    async fn convert_record(
        &mut self,
        record: &NoteRecord,
        label: Option<ModNoteLabel>,
    ) -> Result<RecordOutcome> {
        let header = note_header(record);
        let full_message = format!("{}{}", header, record.message);
        let max_size = self.options.max_note_length;

        let messages: Vec<String> = if full_message.chars().count() > max_size {
            match split_message_into_chunks(&header, &record.message, max_size) {
                Ok(chunks) => chunks.collect(),
                Err(err) => {
                    warn!(
                        note_id = record.note_id,
                        submitter = %record.submitter,
                        error = %err,
                        "note header does not fit, dropping note"
                    );
                    return Ok(RecordOutcome::Dropped {
                        note_id: record.note_id,
                        class: FailureClass::HeaderTooLong,
                        notes_created: 0,
                        error: err.to_string(),
                    });
                }
            }
        } else {
            vec![full_message]
        };

        // A blank message still leaves a note carrying the header
        let messages = if messages.is_empty() {
            debug!(note_id = record.note_id, "message is blank, posting header only");
            vec![header.trim_end().to_string()]
        } else {
            messages
        };

        let reference = resolve_reference(&mut *self.client, &record.url).await;
        let linked = reference.as_ref().map(|thing| thing.fullname());
        let mut reddit_id = linked.clone();
        let mut reference_dropped = false;
        let mut notes_created = 0;

        for (chunk, text) in messages.iter().enumerate() {
            let mut retries = 0;
            loop {
                let note = NewNote {
                    subreddit: record.sub_name.clone(),
                    user: record.applies_to_username.clone(),
                    note: text.clone(),
                    label,
                    reddit_id: reddit_id.clone(),
                };

                let err = match self.client.create_note(&note).await {
                    Ok(()) => {
                        notes_created += 1;
                        break;
                    }
                    Err(err) => err,
                };

                match err.failure_class() {
                    FailureClass::ReferenceInvalid
                        if reddit_id.is_some() && retries < MAX_REFERENCE_RETRIES =>
                    {
                        warn!(
                            note_id = record.note_id,
                            reddit_id = reddit_id.as_deref().unwrap_or_default(),
                            error = %err,
                            "linked item rejected, retrying without it"
                        );
                        reddit_id = None;
                        reference_dropped = true;
                        retries += 1;
                    }
                    FailureClass::TargetNotFound => {
                        warn!(
                            note_id = record.note_id,
                            user = %record.applies_to_username,
                            "user does not exist, dropping note"
                        );
                        return Ok(RecordOutcome::Dropped {
                            note_id: record.note_id,
                            class: FailureClass::TargetNotFound,
                            notes_created,
                            error: err.to_string(),
                        });
                    }
                    class => {
                        error!(
                            note_id = record.note_id,
                            subreddit = %record.sub_name,
                            user = %record.applies_to_username,
                            label = label.map(|l| l.as_str()).unwrap_or("none"),
                            reddit_id = reddit_id.as_deref().unwrap_or("none"),
                            chunk = chunk + 1,
                            chunks = messages.len(),
                            url = %record.url,
                            message = %record.message,
                            error = %err,
                            "failed to create note, dropping it"
                        );
                        return Ok(RecordOutcome::Dropped {
                            note_id: record.note_id,
                            class,
                            notes_created,
                            error: err.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            note_id = record.note_id,
            user = %record.applies_to_username,
            label = label.map(|l| l.as_str()).unwrap_or("none"),
            chunks = notes_created,
            reddit_id = reddit_id.as_deref().unwrap_or("none"),
            "imported note"
        );
        Ok(RecordOutcome::Posted {
            note_id: record.note_id,
            label,
            notes_created,
            reference: if reference_dropped { None } else { linked },
            reference_dropped,
        })
    }
}

/// Convert parsed notes with the built-in label map and default options
pub async fn convert<C: PlatformClient>(
    notes: &[NoteRecord],
    type_index: &HashMap<u64, NoteTypeDefinition>,
    client: &mut C,
) -> Result<ImportReport> {
    let labels = LabelMap::default();
    Converter::new(client, &labels).convert(notes, type_index).await
}

/// Authenticate, then convert a whole parsed export
pub async fn import<C: PlatformClient>(
    client: &mut C,
    export: &ParsedExport,
    labels: &LabelMap,
    options: ConvertOptions,
) -> Result<ImportReport> {
    let account = client.authenticate().await.map_err(Error::Authentication)?;
    info!(account = %account, notes = export.notes.len(), "starting import");

    let mut report = Converter::new(client, labels)
        .with_options(options)
        .convert(&export.notes, &export.type_index)
        .await?;
    report.skipped = export.skipped;
    Ok(report)
}
