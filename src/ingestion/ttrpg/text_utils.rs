//! Text Normalization Utilities
//!
//! Small helpers shared by the stat-block parsers: pulling the first die
//! term or signed modifier out of free text, normalizing signs, bracket-aware
//! scanning, and best-effort fuzzy key lookup.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Patterns
// ============================================================================

/// First die term with an optional flat modifier: `1d8`, `d6+1`, `2d4-1`.
static DICE_TERM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d*[dD]\d+(?:\s*[+\-]\s*\d+\b)?")
        .expect("Failed to compile dice term regex")
});

/// Signed integer: `+2`, `-1`, `+ 3`.
static SIGNED_MODIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[+\-−–]\s*\d+").expect("Failed to compile signed modifier regex")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

// ============================================================================
// Extraction
// ============================================================================

/// First die term in `text`, with spaces removed.
///
/// Only a single flat modifier is attached; a trailing `+1d4` stays out so
/// `"1d8+1d4"` yields `"1d8"`.
pub fn first_dice_term(text: &str) -> Option<String> {
    let found = DICE_TERM_PATTERN.find(text)?.as_str();
    Some(found.chars().filter(|c| !c.is_whitespace()).collect())
}

/// First signed integer in `text`, normalized to ASCII sign and no spaces.
pub fn first_signed_modifier(text: &str) -> Option<String> {
    let found = SIGNED_MODIFIER_PATTERN.find(text)?.as_str();
    let digits: String = found.chars().filter(char::is_ascii_digit).collect();
    let sign = if found.starts_with('+') { '+' } else { '-' };
    Some(format!("{}{}", sign, digits))
}

/// Prefix a bare number with `+`. Anything already signed, or not starting
/// with a digit, is returned trimmed but otherwise unchanged.
pub fn ensure_signed(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed.chars().next() {
        None => "+0".to_string(),
        Some(c) if c.is_ascii_digit() => format!("+{}", trimmed),
        Some('−' | '–') => format!("-{}", trimmed.chars().skip(1).collect::<String>().trim_start()),
        Some(_) => trimmed.to_string(),
    }
}

/// Collapse every whitespace run to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Prefix of `text` up to the first `delimiter` that is not nested inside
/// parentheses or brackets. Unbalanced closers are ignored.
pub fn take_until_top_level(text: &str, delimiter: char) -> &str {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c == delimiter && depth == 0 => return &text[..idx],
            _ => {}
        }
    }
    text
}

/// Split `text` on `separator` wherever it appears outside parentheses or
/// brackets. Pieces are trimmed; empty pieces are dropped.
pub fn split_top_level<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut idx = 0;

    while idx < text.len() {
        let rest = &text[idx..];
        if depth == 0 && !separator.is_empty() && rest.starts_with(separator) {
            pieces.push(&text[start..idx]);
            idx += separator.len();
            start = idx;
            continue;
        }
        let Some(ch) = rest.chars().next() else { break };
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        idx += ch.len_utf8();
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// `"Sneak Silently"` -> `"sneakSilently"`.
pub fn camel_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for (idx, word) in label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_lowercase();
        if idx == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

// ============================================================================
// Fuzzy Lookup
// ============================================================================

/// Minimum Jaro-Winkler similarity for a fuzzy key match.
const FUZZY_THRESHOLD: f64 = 0.85;

fn fold_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Best-effort match of `needle` against `keys`.
///
/// Tries, in order: case/punctuation-insensitive equality, containment in
/// either direction (longest key wins), then Jaro-Winkler similarity above
/// a fixed threshold.
pub fn fuzzy_key<'a, I>(keys: I, needle: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = fold_key(needle);
    if needle.is_empty() {
        return None;
    }

    let keys: Vec<(&'a str, String)> = keys.into_iter().map(|k| (k, fold_key(k))).collect();

    if let Some((key, _)) = keys.iter().find(|(_, folded)| *folded == needle) {
        return Some(*key);
    }

    let contained = keys
        .iter()
        .filter(|(_, folded)| {
            !folded.is_empty() && (needle.contains(folded.as_str()) || folded.contains(needle.as_str()))
        })
        .max_by_key(|(_, folded)| folded.len());
    if let Some((key, _)) = contained {
        return Some(*key);
    }

    keys.iter()
        .map(|(key, folded)| (*key, strsim::jaro_winkler(folded, &needle)))
        .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

// ============================================================================
// Tests
// ============================================================================
