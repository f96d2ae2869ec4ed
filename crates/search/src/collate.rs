//! Locale-style string ordering for titles and tags.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two strings the way a user-facing sort expects.
///
/// Three levels, each only consulted on a tie of the previous one:
/// 1. base letters (accents and case ignored)
/// 2. accents (case ignored)
/// 3. case, lowercase first
///
/// Base letters compare by code point, so this approximates a locale
/// collation: punctuation such as `{` or `~` sorts after letters, where a
/// locale-aware collator would put it first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn base_letters(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
