//! Resolving a SnooNote URL to the comment or submission it points at
//!
//! SnooNotes stored whatever link the moderator was looking at, so URLs come
//! in many shapes: regular permalinks, `redd.it` short links, and some that do
//! not open in a browser at all (`/r/sub/<id>`, `/r/sub/<sid>/.../<cid>`).
//! Resolution tries, in order:
//! 1. the URL as a comment permalink
//! 2. the URL as a submission link
//! 3. the last path segment as a comment id, if Reddit reports a subreddit for it
//! 4. the last path segment as a submission id, with the same check
//!
//! Failing all four is expected for some notes; the note is then posted
//! without a linked item.

use crate::platform::{PlatformClient, RemoteThing};
use reqwest::Url;
use tracing::{debug, info};

fn parse_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Url::parse(raw)
        .or_else(|_| Url::parse(&format!("https://{}", raw)))
        .ok()
}

/// Non-empty path segments of a URL
fn path_parts(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn is_id(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Comment id from a permalink of the form `/r/<sub>/comments/<sid>/<slug>/<cid>`
pub fn comment_id_from_url(url: &Url) -> Option<String> {
    let parts = path_parts(url);
    let comments = parts.iter().position(|p| *p == "comments")?;
    if parts.len() != comments + 4 {
        return None;
    }
    let id = parts[parts.len() - 1];
    is_id(id).then(|| id.to_string())
}

/// Submission id from `/comments/<id>`, `/gallery/<id>` or a short link
///
/// Paths under `/r/` without a `comments` segment name a subreddit, not a
/// submission, and are rejected.
pub fn submission_id_from_url(url: &Url) -> Option<String> {
    let parts = path_parts(url);
    let id = if let Some(index) = parts.iter().position(|p| *p == "comments") {
        *parts.get(index + 1)?
    } else if let Some(index) = parts.iter().position(|p| *p == "gallery") {
        *parts.get(index + 1)?
    } else {
        if parts.contains(&"r") {
            return None;
        }
        *parts.last()?
    };
    is_id(id).then(|| id.to_string())
}

/// Last path segment, if it looks like a base36 id
pub fn last_segment_id(url: &Url) -> Option<String> {
    let parts = path_parts(url);
    let last = *parts.last()?;
    is_id(last).then(|| last.to_string())
}

/// Resolve a SnooNote URL to a comment or submission, or `None` if nothing matches
pub async fn resolve_reference<C: PlatformClient>(client: &mut C, raw_url: &str) -> Option<RemoteThing> {
    let Some(url) = parse_url(raw_url) else {
        if !raw_url.trim().is_empty() {
            info!(url = raw_url, "note URL is not a URL, posting without a reference");
        }
        return None;
    };

    if let Some(id) = comment_id_from_url(&url) {
        match client.fetch_comment(&id).await {
            Ok(thing) => return Some(thing),
            Err(e) => debug!(url = raw_url, error = %e, "comment permalink lookup failed"),
        }
    }

    if let Some(id) = submission_id_from_url(&url) {
        match client.fetch_submission(&id).await {
            Ok(thing) => return Some(thing),
            Err(e) => debug!(url = raw_url, error = %e, "submission link lookup failed"),
        }
    }

    if let Some(id) = last_segment_id(&url) {
        match client.fetch_comment(&id).await {
            Ok(thing) if thing.has_subreddit() => return Some(thing),
            Ok(_) => debug!(url = raw_url, id = %id, "comment lookup has no subreddit"),
            Err(e) => debug!(url = raw_url, error = %e, "comment id lookup failed"),
        }

        match client.fetch_submission(&id).await {
            Ok(thing) if thing.has_subreddit() => return Some(thing),
            Ok(_) => debug!(url = raw_url, id = %id, "submission lookup has no subreddit"),
            Err(e) => debug!(url = raw_url, error = %e, "submission id lookup failed"),
        }
    }

    info!(url = raw_url, "could not resolve note URL, posting without a reference");
    None
}
