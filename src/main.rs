//! dcc-import - parse DCC stat blocks and print the records as JSON
//!
//! Reads a file (or stdin) and writes the parsed records to stdout. Logs go
//! to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use dcc_statblock::config::AppConfig;
use dcc_statblock::core::dice::RandomEvaluator;
use dcc_statblock::ingestion::{self, ImportKind, Importer};

/// DCC stat-block importer
#[derive(Parser, Debug)]
#[command(name = "dcc-import", version, about = "Parse DCC RPG stat blocks into JSON records")]
struct Args {
    /// What the input holds: `npc` or `pc`
    kind: ImportKind,

    /// Input file; stdin when omitted
    file: Option<PathBuf>,

    /// Config file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Roll missing NPC hit points instead of taking the average
    #[arg(long)]
    roll: bool,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if args.roll {
        config.import.roll_missing_hp = true;
    }

    let _log_guard = dcc_statblock::core::logging::init(&config.logging);
    log::info!("{} v{} starting", dcc_statblock::NAME, dcc_statblock::VERSION);

    let importer =
        Importer::from_config(&config.import).with_evaluator(Arc::new(RandomEvaluator::new()));

    let records = match &args.file {
        Some(path) => importer.import_file(args.kind, path)?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            importer.import(args.kind, &text)
        }
    };

    let output = if args.compact {
        let wire: Vec<_> = records.iter().map(|record| record.to_json()).collect();
        serde_json::to_string(&wire)?
    } else {
        ingestion::to_json(&records)?
    };
    println!("{}", output);

    Ok(())
}
