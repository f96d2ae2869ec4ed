//! Slash-command detection in free text.
//!
//! Typing `/rev` in an input field asks for snippets matching `rev`. The
//! trigger is only live while the cursor sits at the end of the command.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SLASH_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/([^/\s]*)$").expect("slash command pattern is valid"));

/// A slash command found before the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlashCommand {
    /// Text typed after the slash (may be empty)
    pub query: String,
    /// Character offset of the slash
    pub start: usize,
    /// Character offset of the cursor
    pub end: usize,
}

/// Look for a slash command ending at the cursor.
///
/// # Arguments
/// * `text` - Full input text
/// * `cursor` - Cursor position in characters; clamped to the text length
pub fn detect_slash_command(text: &str, cursor: usize) -> Option<SlashCommand> {
    let cursor_byte = text
        .char_indices()
        .nth(cursor)
        .map_or(text.len(), |(offset, _)| offset);
    let before = &text[..cursor_byte];

    let captures = SLASH_COMMAND.captures(before)?;
    let whole = captures.get(0)?;
    let query = captures.get(1).map_or("", |m| m.as_str());

    Some(SlashCommand {
        query: query.to_string(),
        start: before[..whole.start()].chars().count(),
        end: before.chars().count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_command_at_cursor() {
        let command = detect_slash_command("Please /rev", 11).unwrap();
        assert_eq!(command.query, "rev");
        assert_eq!(command.start, 7);
        assert_eq!(command.end, 11);
    }

    #[test]
    fn test_bare_slash_has_empty_query() {
        let command = detect_slash_command("/", 1).unwrap();
        assert_eq!(command.query, "");
        assert_eq!(command.start, 0);
    }

    #[test]
    fn test_whitespace_ends_command() {
        assert!(detect_slash_command("/rev now", 8).is_none());
    }

    #[test]
    fn test_only_text_before_cursor_counts() {
        let command = detect_slash_command("/code and more", 5).unwrap();
        assert_eq!(command.query, "code");
        assert_eq!(command.end, 5);
    }

    #[test]
    fn test_path_like_text_uses_last_slash() {
        let command = detect_slash_command("see a/b", 7).unwrap();
        assert_eq!(command.query, "b");
        assert_eq!(command.start, 5);
    }

    #[test]
    fn test_cursor_is_clamped_and_counts_characters() {
        let command = detect_slash_command("café /thé", 100).unwrap();
        assert_eq!(command.query, "thé");
        assert_eq!(command.start, 5);
        assert_eq!(command.end, 9);
    }

    #[test]
    fn test_no_slash() {
        assert!(detect_slash_command("plain text", 10).is_none());
    }
}
