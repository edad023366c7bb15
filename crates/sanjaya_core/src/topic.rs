use std::sync::LazyLock;

use regex::Regex;

static EXPLICIT_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:molecule|drug)\s+(\w+)").expect("valid topic mention pattern")
});

static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+$").expect("valid capitalized word pattern"));

const FALLBACK_CHARS: usize = 15;

/// Best-effort guess of the research topic in a free-text query.
///
/// Rules, first match wins:
/// 1. `molecule <word>` or `drug <word>` (any case) yields `<word>`.
/// 2. Two words or fewer: the whole trimmed input.
/// 3. The first capitalized word longer than three letters, else the first word.
///
/// The guess is then stripped to ASCII alphanumerics, `-` and spaces. An empty
/// result falls back to the first 15 characters of the raw input. The first
/// character is upper-cased.
pub fn infer_topic(input: &str) -> String {
    let trimmed = input.trim();
    let candidate = match EXPLICIT_MENTION.captures(input) {
        Some(caps) => caps[1].to_string(),
        None => {
            let words: Vec<&str> = trimmed.split_whitespace().collect();
            if words.len() <= 2 {
                trimmed.to_string()
            } else {
                words
                    .iter()
                    .find(|word| word.len() > 3 && CAPITALIZED_WORD.is_match(word))
                    .or_else(|| words.first())
                    .map(|word| (*word).to_string())
                    .unwrap_or_default()
            }
        }
    };

    let cleaned: String = candidate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ' ')
        .collect();
    let cleaned = cleaned.trim();
    let topic = if cleaned.is_empty() {
        input.chars().take(FALLBACK_CHARS).collect()
    } else {
        cleaned.to_string()
    };
    capitalize_first(&topic)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
