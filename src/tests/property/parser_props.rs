//! Property tests for the NPC and PC parsers

use proptest::prelude::*;

use crate::ingestion::ttrpg::{FieldValue, NpcParser, PcParser};
use crate::ingestion::{parse_npc_stat_blocks, parse_pc_stat_blocks};

// ============================================================================
// Strategies
// ============================================================================

/// One line of stat-block-ish text with no blank lines inside.
fn block_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z][A-Za-z ]{0,12}: Init [+-][0-9]; AC [0-9]{1,2}; HD [0-9]d[0-9]{1,2}; AL [LNC]",
        "[A-Za-z0-9;:()+\\-' ]{1,60}",
    ]
    .prop_filter("block must have visible text", |s| !s.trim().is_empty())
}

fn ability_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        (3i64..19).prop_map(serde_json::Value::from),
        (3i64..19).prop_map(|n| serde_json::Value::from(n.to_string())),
    ]
}

// ============================================================================
// NPC Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_one_record_per_block(blocks in prop::collection::vec(block_text(), 1..6)) {
        let text = blocks.join("\n\n");
        let records = parse_npc_stat_blocks(&text);
        prop_assert_eq!(records.len(), blocks.len());
        for record in &records {
            prop_assert!(!record.name().is_empty());
        }
    }

    #[test]
    fn prop_npc_never_panics(input in ".{0,200}") {
        let _ = NpcParser::new().parse(&input);
    }

    #[test]
    fn prop_npc_core_fields_always_present(block in block_text()) {
        let records = parse_npc_stat_blocks(&block);
        for path in [
            "attributes.init.value",
            "attributes.ac.value",
            "attributes.hitDice.value",
            "attributes.critical.die",
            "attributes.critical.table",
            "saves.frt.value",
            "saves.ref.value",
            "saves.wil.value",
            "details.alignment",
        ] {
            prop_assert!(records[0].text(path).is_some(), "missing {}", path);
        }
    }
}

// ============================================================================
// PC Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_pc_never_panics(input in ".{0,200}") {
        let _ = PcParser::new().parse(&input);
    }

    #[test]
    fn prop_pc_json_prefix_never_panics(tail in "[\"a-zA-Z0-9:,{}\\[\\] ]{0,80}") {
        let _ = parse_pc_stat_blocks(&format!("{{{}", tail));
        let _ = parse_pc_stat_blocks(&format!("[{}", tail));
    }

    #[test]
    fn prop_json_ability_passthrough(score in ability_value()) {
        let document = serde_json::json!({ "occTitle": "Cooper", "luckScore": score.clone() });
        let pcs = parse_pc_stat_blocks(&document.to_string());
        prop_assert_eq!(pcs.len(), 1);

        let expected = FieldValue::from_json(&score).expect("scalar");
        prop_assert_eq!(pcs[0].field("abilities.lck.value"), Some(&expected));
    }
}
