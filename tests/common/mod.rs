//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use modnote_importer::platform::{NewNote, PlatformClient, PlatformError, RemoteThing, ThingKind};
use modnote_importer::snoonotes::{NoteRecord, NoteTypeDefinition};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Path of the SnooNotes export used by the tests
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snoonotes.json")
}

/// In-memory Reddit that records every call
#[derive(Debug, Default)]
pub struct MockClient {
    /// Comment id → subreddit
    pub comments: HashMap<String, Option<String>>,
    /// Submission id → subreddit
    pub submissions: HashMap<String, Option<String>>,
    /// Users for which create_note fails with the given error kind
    pub failing_users: HashMap<String, String>,
    /// Fullnames create_note rejects as links
    pub rejected_references: HashSet<String>,
    pub fail_authentication: bool,

    /// Every create_note call, including failed ones
    pub attempts: Vec<NewNote>,
    /// Notes that were created
    pub created: Vec<NewNote>,
    /// Every lookup, as fullnames
    pub lookups: Vec<String>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(mut self, id: &str, subreddit: Option<&str>) -> Self {
        self.comments
            .insert(id.to_string(), subreddit.map(str::to_string));
        self
    }

    pub fn with_submission(mut self, id: &str, subreddit: Option<&str>) -> Self {
        self.submissions
            .insert(id.to_string(), subreddit.map(str::to_string));
        self
    }

    pub fn failing_user(mut self, user: &str, kind: &str) -> Self {
        self.failing_users
            .insert(user.to_string(), kind.to_string());
        self
    }

    pub fn rejecting_reference(mut self, fullname: &str) -> Self {
        self.rejected_references.insert(fullname.to_string());
        self
    }

    fn lookup(&mut self, kind: ThingKind, id: &str) -> Result<RemoteThing, PlatformError> {
        let fullname = kind.fullname(id);
        self.lookups.push(fullname.clone());
        let things = match kind {
            ThingKind::Comment => &self.comments,
            ThingKind::Submission => &self.submissions,
        };
        match things.get(id) {
            Some(subreddit) => Ok(RemoteThing {
                kind,
                id: id.to_string(),
                subreddit: subreddit.clone(),
            }),
            None => Err(PlatformError::InvalidReference {
                id: fullname,
                reason: "not found".to_string(),
            }),
        }
    }
}

impl PlatformClient for MockClient {
    async fn authenticate(&mut self) -> Result<String, PlatformError> {
        if self.fail_authentication {
            return Err(PlatformError::Authentication("invalid_grant".to_string()));
        }
        Ok("modbot".to_string())
    }

    async fn create_note(&mut self, note: &NewNote) -> Result<(), PlatformError> {
        self.attempts.push(note.clone());
        if let Some(kind) = self.failing_users.get(&note.user) {
            return Err(PlatformError::api(kind.clone(), "scripted failure"));
        }
        if let Some(reddit_id) = &note.reddit_id
            && self.rejected_references.contains(reddit_id)
        {
            return Err(PlatformError::api("INVALID_REDDIT_ID", "bad reddit_id"));
        }
        self.created.push(note.clone());
        Ok(())
    }

    async fn fetch_comment(&mut self, id: &str) -> Result<RemoteThing, PlatformError> {
        self.lookup(ThingKind::Comment, id)
    }

    async fn fetch_submission(&mut self, id: &str) -> Result<RemoteThing, PlatformError> {
        self.lookup(ThingKind::Submission, id)
    }
}

/// Create a note type with cosmetic fields filled in
pub fn note_type(note_type_id: u64, display_name: &str) -> NoteTypeDefinition {
    NoteTypeDefinition {
        note_type_id,
        sub_name: "Techman".to_string(),
        display_name: display_name.to_string(),
        color_code: "000000".to_string(),
        display_order: 0,
        bold: false,
        italic: false,
        icon_string: None,
        disabled: false,
    }
}

/// Create a note with minimal fields
pub fn note(note_id: u64, note_type_id: u64, user: &str, message: &str, url: &str) -> NoteRecord {
    NoteRecord {
        note_id,
        note_type_id,
        sub_name: "Techman".to_string(),
        submitter: "Techman-".to_string(),
        message: message.to_string(),
        applies_to_username: user.to_string(),
        url: url.to_string(),
        timestamp: Utc.with_ymd_and_hms(2022, 9, 24, 18, 46, 14).unwrap(),
        parent_subreddit: None,
    }
}

/// Type index holding the given note types
pub fn type_index(types: &[NoteTypeDefinition]) -> HashMap<u64, NoteTypeDefinition> {
    types.iter().map(|t| (t.note_type_id, t.clone())).collect()
}

/// Header the converter puts on notes built by [`note`]
pub const HEADER: &str = "[2022-09-24T18:46:14+00:00] [u/Techman-] ";
