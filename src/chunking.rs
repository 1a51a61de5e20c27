//! Splitting long notes into Mod Note sized pieces
//!
//! A Mod Note holds at most [`MAX_NOTE_LENGTH`] characters. Longer SnooNotes are
//! posted as several notes, each starting with the same header so they can be
//! read in order on the user's note history.

use crate::error::{Error, Result};

/// Maximum length of a Mod Note, in characters
pub const MAX_NOTE_LENGTH: usize = 250;

/// Iterator over the chunks of a long message
///
/// Lengths are counted in characters, never bytes, so a chunk never splits a
/// multi-byte character.
#[derive(Debug, Clone)]
pub struct MessageChunks<'a> {
    header: &'a str,
    remaining: &'a str,
    body_size: usize,
}

impl<'a> Iterator for MessageChunks<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.remaining.is_empty() {
            let split_at = self
                .remaining
                .char_indices()
                .nth(self.body_size)
                .map(|(index, _)| index)
                .unwrap_or(self.remaining.len());
            let (piece, rest) = self.remaining.split_at(split_at);
            self.remaining = rest;

            // A slice made only of whitespace would post a header-only note
            let piece = piece.trim();
            if !piece.is_empty() {
                return Some(format!("{}{}", self.header, piece));
            }
        }
        None
    }
}

/// Split `message` into chunks of at most `max_size` characters, each prefixed with `header`
///
/// # Errors
/// Returns [`Error::HeaderTooLong`] if the header alone leaves no room for text.
pub fn split_message_into_chunks<'a>(
    header: &'a str,
    message: &'a str,
    max_size: usize,
) -> Result<MessageChunks<'a>> {
    let header_len = header.chars().count();
    if header_len >= max_size {
        return Err(Error::HeaderTooLong {
            header_len,
            max_size,
        });
    }

    Ok(MessageChunks {
        header,
        remaining: message,
        body_size: max_size - header_len,
    })
}
