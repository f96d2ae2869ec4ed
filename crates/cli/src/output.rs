//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::{OwoColorize, Stream};
use promptvault_search::{SearchResult, SuggestionResult};

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".if_supports_color(Stream::Stdout, |s| s.green()), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".if_supports_color(Stream::Stderr, |s| s.red()), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".if_supports_color(Stream::Stderr, |s| s.yellow()), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".if_supports_color(Stream::Stdout, |s| s.blue()), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.if_supports_color(Stream::Stdout, |s| s.bold()));
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Print one ranked search result
pub fn print_search_result(rank: usize, result: &SearchResult) {
    let annotation = match (result.search_score, result.matched_in) {
        (Some(score), Some(field)) => format!("{} in {}", format_score(score), field.as_str()),
        _ => format!("used {}", format_count(result.record.usage_count as usize, "time", "times")),
    };
    print_entry(rank, &result.record.title, &annotation, &result.record.content, &result.record.tags);
}

/// Print one suggestion
pub fn print_suggestion(rank: usize, suggestion: &SuggestionResult) {
    let annotation = format!("score {}", format_score(suggestion.suggestion_score));
    let record = &suggestion.record;
    print_entry(rank, &record.title, &annotation, &record.content, &record.tags);
}

fn print_entry(rank: usize, title: &str, annotation: &str, content: &str, tags: &[String]) {
    println!(
        "{} {} {}",
        format!("{rank:>2}.").if_supports_color(Stream::Stdout, |s| s.dimmed()),
        title.if_supports_color(Stream::Stdout, |s| s.bold()),
        format!("({annotation})").if_supports_color(Stream::Stdout, |s| s.dimmed()),
    );
    println!("    {}", preview(content, PREVIEW_CHARS));
    if !tags.is_empty() {
        println!("    {}", format_tags(tags).if_supports_color(Stream::Stdout, |s| s.cyan()));
    }
}

/// Characters of content shown under each result
pub const PREVIEW_CHARS: usize = 72;

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{mins}m {remaining_secs:.0}s")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format a score with two decimals
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Format tags as `#tag #tag`
pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse whitespace and cut to `max_chars`, marking the cut with `…`
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}
