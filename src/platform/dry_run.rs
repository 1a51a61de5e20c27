use super::{NewNote, PlatformClient, PlatformError, RemoteThing, ThingKind};
use tracing::info;

/// Client that never touches the network
///
/// Notes are logged instead of created. Lookups succeed for any id but carry no
/// subreddit, so only ids taken from well-formed comment or submission URLs
/// are linked.
#[derive(Debug, Default)]
pub struct DryRunClient {
    notes: Vec<NewNote>,
}

impl DryRunClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes that would have been created, in order
    pub fn notes(&self) -> &[NewNote] {
        &self.notes
    }
}

impl PlatformClient for DryRunClient {
    async fn authenticate(&mut self) -> Result<String, PlatformError> {
        Ok("dry-run".to_string())
    }

    async fn create_note(&mut self, note: &NewNote) -> Result<(), PlatformError> {
        info!(
            subreddit = %note.subreddit,
            user = %note.user,
            label = note.label.map(|l| l.as_str()).unwrap_or("none"),
            reddit_id = note.reddit_id.as_deref().unwrap_or("none"),
            "[dry run] would create note: {}",
            note.note
        );
        self.notes.push(note.clone());
        Ok(())
    }

    async fn fetch_comment(&mut self, id: &str) -> Result<RemoteThing, PlatformError> {
        Ok(RemoteThing {
            kind: ThingKind::Comment,
            id: id.to_string(),
            subreddit: None,
        })
    }

    async fn fetch_submission(&mut self, id: &str) -> Result<RemoteThing, PlatformError> {
        Ok(RemoteThing {
            kind: ThingKind::Submission,
            id: id.to_string(),
            subreddit: None,
        })
    }
}
