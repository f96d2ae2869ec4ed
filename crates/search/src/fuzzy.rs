//! Fuzzy matching algorithms.
//!
//! [`fuzzy_score`] tries three strategies in a fixed order and returns the
//! first one that applies: substring, subsequence, then word matching. The
//! branch that fires decides the score even when a later branch would have
//! scored higher.

/// Base score for a substring hit.
const SUBSTRING_BASE: f64 = 0.8;
/// Weight of the query/text length ratio for a substring hit.
const SUBSTRING_LENGTH_WEIGHT: f64 = 0.2;
/// Weight of the match position for a substring hit.
const SUBSTRING_POSITION_WEIGHT: f64 = 0.1;
/// Weight of a full subsequence hit.
const SUBSEQUENCE_WEIGHT: f64 = 0.6;
/// Weight of the word-match fallback.
const WORD_WEIGHT: f64 = 0.4;

/// Score a query against a single text field.
///
/// Matching is case-insensitive. Lengths and offsets are counted in
/// characters of the lowercased strings.
///
/// # Arguments
/// * `query` - The search query
/// * `text` - The text to score
///
/// # Returns
/// A score in `[0, 1.1]`. Substring hits are not clamped, so a query equal to
/// the whole text scores `1.1`.
pub fn fuzzy_score(query: &str, text: &str) -> f64 {
    if query.is_empty() || text.is_empty() {
        return 0.0;
    }

    let query = query.to_lowercase();
    let text = text.to_lowercase();

    if let Some(score) = substring_score(&query, &text) {
        return score;
    }

    let query_len = query.chars().count();
    let hits = subsequence_hits(&text, &query);
    if hits == query_len {
        return (hits as f64 / query_len as f64) * SUBSEQUENCE_WEIGHT;
    }

    word_score(&query, &text)
}

/// Check if text contains all characters of query in order.
///
/// This is a simple fuzzy match that checks if all query characters
/// appear in the text in the same order (but not necessarily consecutively).
/// Comparison is exact; lowercase both sides for a case-insensitive check.
///
/// # Arguments
/// * `text` - Text to search in
/// * `query` - Query characters to find
///
/// # Returns
/// true if all query characters are found in order
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    subsequence_hits(text, query) == query.chars().count()
}

fn substring_score(query: &str, text: &str) -> Option<f64> {
    let byte_offset = text.find(query)?;

    let text_len = text.chars().count() as f64;
    let query_len = query.chars().count() as f64;
    let position = text[..byte_offset].chars().count() as f64;

    let length_ratio = query_len / text_len;
    let position_score = 1.0 - position / text_len;

    Some(SUBSTRING_BASE + length_ratio * SUBSTRING_LENGTH_WEIGHT + position_score * SUBSTRING_POSITION_WEIGHT)
}

/// Greedy left-to-right walk; returns how many query characters were consumed.
fn subsequence_hits(text: &str, query: &str) -> usize {
    let mut pending = query.chars().peekable();
    let mut hits = 0;

    for c in text.chars() {
        match pending.peek() {
            Some(&next) if next == c => {
                pending.next();
                hits += 1;
            }
            Some(_) => {}
            None => break,
        }
    }

    hits
}

fn word_score(query: &str, text: &str) -> f64 {
    let query_words = split_words(query);
    let text_words = split_words(text);
    let matched = query_words
        .iter()
        .filter(|query_word| {
            text_words
                .iter()
                .any(|word| word.starts_with(*query_word) || word.contains(*query_word))
        })
        .count();

    (matched as f64 / query_words.len() as f64) * WORD_WEIGHT
}

/// Split on whitespace runs, keeping an empty word at either end.
///
/// A query with leading or trailing whitespace therefore carries an empty
/// word, which matches any text word. The result is never empty.
fn split_words(value: &str) -> Vec<&str> {
    let parts: Vec<&str> = value.split(char::is_whitespace).collect();
    let last = parts.len() - 1;
    parts
        .into_iter()
        .enumerate()
        .filter(|(index, part)| !part.is_empty() || *index == 0 || *index == last)
        .map(|(_, part)| part)
        .collect()
}
