//! Bounded-length text clipping.
//!
//! Oversized prompt blocks keep their head and tail and replace the middle with an explicit
//! omission marker, so the generator still sees how a log starts and how it ends.

use once_cell::sync::Lazy;
use regex::Regex;

static OMISSION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\[\.\.\. \d+ chars omitidos \.\.\.\]\n").expect("valid omission regex")
});

/// Clips `text` to roughly `limit` characters, keeping `limit / 2` characters from each end.
///
/// Text within the limit is returned unchanged. Text that is already the output of a clip
/// with the same limit is also returned unchanged, so clipping twice is the same as once.
///
/// ```
/// use marker::utilities::clip::clip;
///
/// assert_eq!(clip("short", 10), "short");
/// assert_eq!(
///     clip("aaaaabbbbbbbbbbccccc", 10),
///     "aaaaa\n[... 10 chars omitidos ...]\nccccc"
/// );
/// ```
pub fn clip(text: &str, limit: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let len = text.chars().count();
    if len <= limit || is_clipped(text, limit) {
        return text.to_string();
    }

    let half = limit / 2;
    let head: String = text.chars().take(half).collect();
    let tail: String = text.chars().skip(len - half).collect();
    format!(
        "{}\n[... {} chars omitidos ...]\n{}",
        head.trim_end(),
        len - limit,
        tail.trim_start()
    )
}

/// True when some omission marker splits `text` into a head and a tail that each fit this
/// limit's halves. The head or tail may quote markers of its own.
fn is_clipped(text: &str, limit: usize) -> bool {
    let half = limit / 2;
    OMISSION_MARKER.find_iter(text).any(|m| {
        text[..m.start()].chars().count() <= half && text[m.end()..].chars().count() <= half
    })
}

/// Hard cut to the first `max_len` characters, for blocks that are already summaries.
pub fn truncate_chars(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
