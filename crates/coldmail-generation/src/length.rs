//! Word-budget enforcement and greeting removal for generated messages.

use std::sync::LazyLock;

use regex::Regex;

/// Word count the instructions aim for.
pub const TARGET_WORDS: usize = 60;

/// Hard ceiling on the returned message.
pub const MAX_WORDS: usize = 75;

/// A salutation word followed by at most three name-like tokens (capitalized
/// words, or "team"/"there"/"all"/"everyone") and closed by `,`, `!` or a
/// line break. "Greetings" only counts when punctuated on its own.
static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?i:hi|hello|hey|dear)\b(?:[ \t]+(?:\p{Lu}[\w'.-]*|team|there|all|everyone)){0,3}|(?i:greetings))[ \t]*(?:[,!]|\n)\s*",
    )
    .expect("valid greeting regex")
});

const SENTENCE_END: [char; 3] = ['.', '!', '?'];
const CLOSERS: [char; 4] = ['"', '\'', ')', '\u{201d}'];

#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Shortens `text` to at most `max_words` words.
///
/// Cuts at the last sentence boundary that fits. When even the first
/// sentence is over budget, keeps the first `max_words` words and closes
/// them with a period.
#[must_use]
pub fn enforce_word_ceiling(text: &str, max_words: usize) -> String {
    let text = text.trim();
    if word_count(text) <= max_words {
        return text.to_string();
    }

    let best = sentence_boundaries(text)
        .into_iter()
        .take_while(|&end| word_count(&text[..end]) <= max_words)
        .last();

    if let Some(end) = best {
        return text[..end].trim_end().to_string();
    }

    let mut clipped = text
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ");
    let keep = clipped
        .trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '-'))
        .len();
    clipped.truncate(keep);
    if !clipped.ends_with(SENTENCE_END) {
        clipped.push('.');
    }
    clipped
}

/// Removes a leading salutation ("Hi Jane,", "Hello!", "Dear Acme team,").
///
/// Returns the text unchanged when nothing would remain.
#[must_use]
pub fn strip_greeting(text: &str) -> String {
    let Some(m) = GREETING_RE.find(text) else {
        return text.trim().to_string();
    };
    let rest = text[m.end()..].trim();
    if rest.is_empty() {
        return text.trim().to_string();
    }

    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Byte offsets just past each sentence terminator (and any closing quote
/// or parenthesis that follows it), in ascending order.
fn sentence_boundaries(text: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut iter = text.char_indices().peekable();
    while let Some((idx, c)) = iter.next() {
        if !SENTENCE_END.contains(&c) {
            continue;
        }
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = iter.peek() {
            if SENTENCE_END.contains(&next) || CLOSERS.contains(&next) {
                end = next_idx + next.len_utf8();
                iter.next();
            } else {
                break;
            }
        }
        let at_break = iter.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if at_break {
            ends.push(end);
        }
    }
    ends
}
