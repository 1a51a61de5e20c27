use std::fmt;

/// Error kinds Reddit reports when the target user does not exist
const TARGET_NOT_FOUND_KINDS: &[&str] = &["USER_DOESNT_EXIST"];

/// Error kinds Reddit reports when `reddit_id` does not name a usable item
const REFERENCE_INVALID_KINDS: &[&str] = &[
    "INVALID_ID",
    "INVALID_REDDIT_ID",
    "NO_THING_ID",
    "THING_NOT_FOUND",
];

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// An error reported by the API itself, identified by its kind string
    #[error("{kind}: {message}")]
    Api { kind: String, message: String },

    /// A comment or submission could not be looked up
    #[error("invalid reference {id}: {reason}")]
    InvalidReference { id: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// How the converter reacts to a failed note creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The user the note is about does not exist; the note is dropped
    TargetNotFound,
    /// The linked item was rejected; the note is retried without it
    ReferenceInvalid,
    /// Anything else; the note is dropped
    Unknown,
    /// The note header alone exceeds the note length limit; nothing is posted
    HeaderTooLong,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureClass::TargetNotFound => "target user not found",
            FailureClass::ReferenceInvalid => "reference invalid",
            FailureClass::Unknown => "unknown error",
            FailureClass::HeaderTooLong => "header too long for note",
        };
        f.write_str(s)
    }
}

impl PlatformError {
    pub fn api(kind: impl Into<String>, message: impl Into<String>) -> Self {
        PlatformError::Api {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// The API error kind, if this is an API error
    pub fn kind(&self) -> Option<&str> {
        match self {
            PlatformError::Api { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn failure_class(&self) -> FailureClass {
        match self {
            PlatformError::Api { kind, .. } if TARGET_NOT_FOUND_KINDS.contains(&kind.as_str()) => {
                FailureClass::TargetNotFound
            }
            PlatformError::Api { kind, .. } if REFERENCE_INVALID_KINDS.contains(&kind.as_str()) => {
                FailureClass::ReferenceInvalid
            }
            PlatformError::InvalidReference { .. } => FailureClass::ReferenceInvalid,
            _ => FailureClass::Unknown,
        }
    }
}
