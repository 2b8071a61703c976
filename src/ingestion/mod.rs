//! Stat Block Ingestion
//!
//! Import surface over the NPC and PC parsers. The free functions use
//! default options; [`Importer`] carries options from [`ImportConfig`] and
//! an optional dice evaluator for rolling missing hit points.

pub mod error;
pub mod ttrpg;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

pub use error::ImportError;
pub use ttrpg::{FieldValue, NpcParser, ParsedCharacter, ParsedItem, PcParser};

use crate::config::ImportConfig;
use crate::core::dice::DiceEvaluator;

/// Parse NPC stat blocks with default options.
pub fn parse_npc_stat_blocks(text: &str) -> Vec<ParsedCharacter> {
    NpcParser::new().parse(text)
}

/// Parse PC JSON or sheet text with default options.
pub fn parse_pc_stat_blocks(text: &str) -> Vec<ParsedCharacter> {
    PcParser::new().parse(text)
}

/// Which parser an import goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Npc,
    Pc,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npc => "npc",
            Self::Pc => "pc",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "npc" | "npcs" | "monster" => Ok(Self::Npc),
            "pc" | "pcs" | "player" => Ok(Self::Pc),
            other => Err(ImportError::UnknownKind(other.to_string())),
        }
    }
}

/// Parse `text` as `kind` with default options.
pub fn import(kind: ImportKind, text: &str) -> Vec<ParsedCharacter> {
    Importer::new().import(kind, text)
}

/// Configured pair of parsers.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    npc: NpcParser,
    pc: PcParser,
    roll_missing_hp: bool,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            npc: NpcParser::with_options(config.into()),
            pc: PcParser::with_options(config.into()),
            roll_missing_hp: config.roll_missing_hp,
        }
    }

    /// Roll missing NPC hit points with `evaluator`. Ignored unless the
    /// config enabled `roll_missing_hp`.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn DiceEvaluator>) -> Self {
        if self.roll_missing_hp {
            self.npc = self.npc.with_evaluator(evaluator);
        } else {
            log::debug!("roll_missing_hp is off, keeping average hit points");
        }
        self
    }

    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn import(&self, kind: ImportKind, text: &str) -> Vec<ParsedCharacter> {
        let records = match kind {
            ImportKind::Npc => self.npc.parse(text),
            ImportKind::Pc => self.pc.parse(text),
        };
        log::info!("Imported {} {} record(s)", records.len(), kind);
        records
    }

    /// Read `path` and import its contents.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_file(
        &self,
        kind: ImportKind,
        path: impl AsRef<Path>,
    ) -> Result<Vec<ParsedCharacter>, ImportError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
        Ok(self.import(kind, &text))
    }
}

/// Serialize records into the wire shape, as a pretty JSON array.
pub fn to_json(records: &[ParsedCharacter]) -> Result<String, ImportError> {
    let wire: Vec<serde_json::Value> = records.iter().map(ParsedCharacter::to_json).collect();
    Ok(serde_json::to_string_pretty(&wire)?)
}
