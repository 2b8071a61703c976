//! PC Stat Block Parsing Module
//!
//! Imports player characters from generator output. Input is sniffed into
//! one of three sources, each handled by its own function:
//!
//! - **JSON**: a character object, an array of them, or an object with a
//!   `characters` array. Malformed JSON is salvaged key by key.
//! - **0-level sheet**: text under a `0-level Occupation:` header.
//! - **Leveled sheet**: text under an `<Alignment> <Class> (<n>th level)`
//!   header.
//!
//! Several sheets in one text are split at their header lines. Parsing never
//! fails; unreadable input yields an empty list.
//!
//! # Example
//!
//! ```
//! use dcc_statblock::ingestion::ttrpg::PcParser;
//!
//! let pcs = PcParser::new().parse(r#"{"occTitle": "Gongfarmer", "strengthScore": 18}"#);
//! assert_eq!(pcs[0].name(), "Gongfarmer");
//! ```

pub mod json;
pub mod rules;
pub mod text;

use serde_json::Value;

use super::models::ParsedCharacter;
use crate::config::ImportConfig;

pub use rules::{ability_modifier, class_hit_die, parse_weapon_string, DEED_PLACEHOLDER};

// ============================================================================
// Options
// ============================================================================

/// Knobs for PC parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcParseOptions {
    /// Hit dice used when the class is unknown or the character is 0-level.
    pub default_hit_dice: String,
}

impl Default for PcParseOptions {
    fn default() -> Self {
        Self {
            default_hit_dice: "1d4".to_string(),
        }
    }
}

impl From<&ImportConfig> for PcParseOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            default_hit_dice: config.pc_default_hit_dice.clone(),
        }
    }
}

// ============================================================================
// Sources
// ============================================================================

/// One unit of PC input after format detection.
#[derive(Debug, Clone, PartialEq)]
pub enum PcSource<'a> {
    /// Parsed (or salvaged) JSON document.
    Json(Value),
    /// Text of one 0-level sheet.
    ZeroLevel(&'a str),
    /// Text of one leveled sheet.
    UpperLevel(&'a str),
}

/// Detect the input format and split it into sources.
///
/// Text that looks like JSON is parsed as JSON first; if that fails the
/// document is salvaged. Otherwise the text is split at sheet headers. Text
/// with no header but with ability lines is read as a single 0-level sheet.
pub fn sniff(input: &str) -> Vec<PcSource<'_>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(document) => vec![PcSource::Json(document)],
            Err(e) => {
                log::warn!("character JSON did not parse ({}), salvaging fields", e);
                json::salvage(trimmed).map(PcSource::Json).into_iter().collect()
            }
        };
    }

    split_sheets(input)
}

/// Slice text between consecutive sheet headers.
fn split_sheets(input: &str) -> Vec<PcSource<'_>> {
    let mut headers: Vec<(usize, bool)> = text::ZERO_LEVEL_HEADER
        .find_iter(input)
        .map(|m| (m.start(), false))
        .chain(text::UPPER_LEVEL_HEADER.find_iter(input).map(|m| (m.start(), true)))
        .collect();
    headers.sort_unstable();

    if headers.is_empty() {
        return if text::ABILITY_LINE.is_match(input) {
            vec![PcSource::ZeroLevel(input)]
        } else {
            log::debug!("no character sheet found in {} byte(s) of text", input.len());
            Vec::new()
        };
    }

    if headers[0].0 > 0 && !input[..headers[0].0].trim().is_empty() {
        log::debug!("ignoring {} byte(s) before the first sheet header", headers[0].0);
    }

    headers
        .iter()
        .enumerate()
        .map(|(idx, &(start, upper))| {
            let end = headers.get(idx + 1).map(|(next, _)| *next).unwrap_or(input.len());
            let segment = &input[start..end];
            if upper {
                PcSource::UpperLevel(segment)
            } else {
                PcSource::ZeroLevel(segment)
            }
        })
        .collect()
}

// ============================================================================
// Parser
// ============================================================================

/// Parses PC stat blocks from JSON or generator text.
#[derive(Debug, Clone, Default)]
pub struct PcParser {
    options: PcParseOptions,
}

impl PcParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PcParseOptions) -> Self {
        Self { options }
    }

    /// Parse every character in `input`, in source order.
    pub fn parse(&self, input: &str) -> Vec<ParsedCharacter> {
        let sources = sniff(input);
        log::debug!("pc import: {} source(s)", sources.len());
        sources
            .iter()
            .flat_map(|source| self.parse_source(source))
            .collect()
    }

    /// Parse one detected source.
    pub fn parse_source(&self, source: &PcSource<'_>) -> Vec<ParsedCharacter> {
        match source {
            PcSource::Json(document) => json::character_objects(document)
                .into_iter()
                .map(|object| json::parse_character(object, &self.options))
                .collect(),
            PcSource::ZeroLevel(sheet) => vec![text::parse_zero_level(sheet, &self.options)],
            PcSource::UpperLevel(sheet) => vec![text::parse_upper_level(sheet, &self.options)],
        }
    }
}
