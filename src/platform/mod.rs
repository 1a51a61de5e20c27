//! Reddit access used by the importer
//!
//! The converter only talks to Reddit through [`PlatformClient`], which keeps
//! transport, authentication and rate limiting out of the conversion logic:
//! - `reddit`: HTTP implementation against the Reddit API
//! - `dry_run`: implementation that logs instead of posting
//! - `error`: platform errors and their failure classes

mod dry_run;
mod error;
mod reddit;

pub use dry_run::DryRunClient;
pub use error::{FailureClass, PlatformError};
pub use reddit::{RedditClient, RedditClientConfig, RedditCredentials};

use crate::labels::ModNoteLabel;

/// Kind of item a Mod Note can link to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThingKind {
    Comment,
    Submission,
}

impl ThingKind {
    /// Reddit fullname prefix (`t1` for comments, `t3` for submissions)
    pub fn prefix(&self) -> &'static str {
        match self {
            ThingKind::Comment => "t1",
            ThingKind::Submission => "t3",
        }
    }

    pub fn fullname(&self, id: &str) -> String {
        format!("{}_{}", self.prefix(), id)
    }
}

/// A comment or submission as returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteThing {
    pub kind: ThingKind,
    /// Base36 id without the type prefix
    pub id: String,
    /// Subreddit the item was posted in, if Reddit reported one
    pub subreddit: Option<String>,
}

impl RemoteThing {
    pub fn fullname(&self) -> String {
        self.kind.fullname(&self.id)
    }

    /// True when the item carries a subreddit backlink
    pub fn has_subreddit(&self) -> bool {
        self.subreddit.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// A Mod Note to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub subreddit: String,
    /// User the note is about
    pub user: String,
    pub note: String,
    pub label: Option<ModNoteLabel>,
    /// Fullname of the linked comment or submission
    pub reddit_id: Option<String>,
}

/// Operations the importer needs from Reddit
///
/// Calls are made one at a time in record order. Implementations own request
/// pacing and session handling.
#[allow(async_fn_in_trait)]
pub trait PlatformClient {
    /// Establish an authenticated session, returning the account name
    async fn authenticate(&mut self) -> Result<String, PlatformError>;

    async fn create_note(&mut self, note: &NewNote) -> Result<(), PlatformError>;

    /// Look up a comment by base36 id
    async fn fetch_comment(&mut self, id: &str) -> Result<RemoteThing, PlatformError>;

    /// Look up a submission by base36 id
    async fn fetch_submission(&mut self, id: &str) -> Result<RemoteThing, PlatformError>;
}
