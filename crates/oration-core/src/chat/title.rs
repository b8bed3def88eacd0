//! Session title derivation for implicitly created sessions.
//!
//! When a message arrives without a session id, the new session is named
//! after the start of the message itself.

use oration_types::chat::DEFAULT_SESSION_TITLE;

/// Maximum number of characters taken from the message.
pub const TITLE_MAX_CHARS: usize = 48;

/// Marker appended when the message was cut.
pub const TITLE_ELLIPSIS: char = '…';

/// Derive a session title from the first message of a conversation.
///
/// Takes the first [`TITLE_MAX_CHARS`] characters (not bytes), appends
/// [`TITLE_ELLIPSIS`] if anything was cut, and falls back to
/// [`DEFAULT_SESSION_TITLE`] when the result is empty.
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let mut title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();

    if chars.next().is_some() {
        title.push(TITLE_ELLIPSIS);
    }

    if title.is_empty() {
        DEFAULT_SESSION_TITLE.to_string()
    } else {
        title
    }
}
