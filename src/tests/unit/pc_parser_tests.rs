//! PC Sheet Unit Tests
//!
//! Tests for player-character import including:
//! - Generator JSON exports and party arrays
//! - 0-level funnel sheets
//! - Leveled sheets with spells and armor
//! - Save class bonuses and item order

use crate::ingestion::parse_pc_stat_blocks;
use crate::ingestion::ttrpg::{Denomination, FieldValue, ParsedItem};
use crate::tests::common::*;

// ============================================================================
// JSON Exports
// ============================================================================

#[cfg(test)]
mod json_exports {
    use super::*;

    #[test]
    fn test_single_export() {
        let pcs = parse_pc_stat_blocks(GONGFARMER_JSON);
        assert_eq!(pcs.len(), 1);

        let pc = &pcs[0];
        assert_eq!(pc.name(), "Gongfarmer");
        assert_eq!(field(pc, "abilities.per.value"), "15");
        assert_eq!(field(pc, "attributes.hp.value"), "3");
        assert_eq!(field(pc, "attributes.hitDice.value"), "1d4");
        assert_eq!(field(pc, "saves.frt.value"), "-1");
        // stamina 8 already accounts for the -1
        assert_eq!(field(pc, "saves.frt.classBonus"), "+0");

        let trowel = weapons(pc)[0];
        assert_eq!(trowel.name, "Trowel (as club)");
        assert_eq!(trowel.to_hit, "-1");
        assert_eq!(trowel.damage, "1d4-1");
        assert!(trowel.melee);

        assert_eq!(count_items(pc, |item| matches!(item, ParsedItem::Equipment(_))), 2);
        assert_eq!(pc.currency().map(|c| c.amount(Denomination::Cp)), Some("33"));
    }

    #[test]
    fn test_party_array() {
        let pcs = parse_pc_stat_blocks(PARTY_JSON);
        let names: Vec<_> = pcs.iter().map(|pc| pc.name()).collect();
        assert_eq!(names, vec!["Miller", "Trapper", "Warrior"]);

        assert_eq!(pcs[0].field("abilities.str.value"), Some(&FieldValue::Integer(14)));
        assert_eq!(pcs[0].field("abilities.agl.value"), Some(&FieldValue::Integer(10)));
        assert_eq!(pcs[1].field("attributes.hp.value"), Some(&FieldValue::Integer(2)));
    }

    #[test]
    fn test_missile_weapon_without_mode_is_ranged() {
        let pcs = parse_pc_stat_blocks(PARTY_JSON);
        let sling = weapons(&pcs[1])[0];
        assert_eq!(sling.name, "Sling");
        assert_eq!(sling.to_hit, "+2");
        assert!(!sling.melee);
    }

    #[test]
    fn test_warrior_deed_and_hit_dice() {
        let pcs = parse_pc_stat_blocks(PARTY_JSON);
        let warrior = &pcs[2];
        assert_eq!(field(warrior, "class.className"), "Warrior");
        assert_eq!(field(warrior, "attributes.hitDice.value"), "3d12");
        assert_eq!(warrior.field("details.level.value"), Some(&FieldValue::Integer(3)));
        assert_eq!(weapons(warrior)[0].damage, "1d8+@ab+2");
    }

    #[test]
    fn test_every_record_has_currency() {
        for pc in parse_pc_stat_blocks(PARTY_JSON) {
            let currency = pc.currency().expect("currency item");
            for denomination in Denomination::ALL {
                assert_eq!(currency.amount(denomination), "0");
            }
        }
    }
}

// ============================================================================
// Funnel Sheets
// ============================================================================

#[cfg(test)]
mod funnel_sheets {
    use super::*;

    #[test]
    fn test_one_record_per_sheet() {
        let pcs = parse_pc_stat_blocks(FUNNEL_TEXT);
        let names: Vec<_> = pcs.iter().map(|pc| pc.name()).collect();
        assert_eq!(names, vec!["Gongfarmer", "Elven barrister"]);
    }

    #[test]
    fn test_sheets_do_not_bleed() {
        let pcs = parse_pc_stat_blocks(FUNNEL_TEXT);
        assert_eq!(field(&pcs[0], "abilities.str.value"), "10");
        assert_eq!(field(&pcs[1], "abilities.str.value"), "7");
        assert_eq!(weapon_names(&pcs[0]), vec!["Trowel (as club)"]);
        assert_eq!(weapon_names(&pcs[1]), vec!["Quill (as dart)"]);
        assert_eq!(field(&pcs[1], "details.languages.value"), "Common, Elf");
    }

    #[test]
    fn test_zero_level_defaults() {
        for pc in parse_pc_stat_blocks(FUNNEL_TEXT) {
            assert_eq!(field(&pc, "details.level.value"), "0");
            assert_eq!(field(&pc, "attributes.hitDice.value"), "1d4");
            assert_eq!(field(&pc, "attributes.critical.die"), "1d4");
            assert_eq!(field(&pc, "attributes.critical.table"), "I");
            assert_eq!(field(&pc, "attributes.actionDice.value"), "1d20");
        }
    }

    #[test]
    fn test_explicit_ranged_keyword() {
        let pcs = parse_pc_stat_blocks(FUNNEL_TEXT);
        let quill = weapons(&pcs[1])[0];
        assert_eq!(quill.to_hit, "+1");
        assert_eq!(quill.damage, "1d2");
        assert!(!quill.melee);
    }

    #[test]
    fn test_mixed_coin_funds() {
        let pcs = parse_pc_stat_blocks(FUNNEL_TEXT);
        let funds = pcs[1].currency().expect("currency item");
        assert_eq!(funds.amount(Denomination::Sp), "4");
        assert_eq!(funds.amount(Denomination::Cp), "26");
        assert_eq!(funds.amount(Denomination::Gp), "0");
    }

    #[test]
    fn test_save_class_bonus_strips_ability() {
        let pcs = parse_pc_stat_blocks(FUNNEL_TEXT);
        // agility 14 gives +1 on the barrister's Ref 1
        assert_eq!(field(&pcs[1], "saves.ref.value"), "+1");
        assert_eq!(field(&pcs[1], "saves.ref.classBonus"), "+0");
        // personality 16 gives +2 on Will 2
        assert_eq!(field(&pcs[1], "saves.wil.classBonus"), "+0");
    }
}

// ============================================================================
// Leveled Sheets
// ============================================================================

#[cfg(test)]
mod leveled_sheets {
    use super::*;

    #[test]
    fn test_wizard_header() {
        let pcs = parse_pc_stat_blocks(WIZARD_TEXT);
        assert_eq!(pcs.len(), 1);

        let wizard = &pcs[0];
        assert_eq!(wizard.name(), "Wizard");
        assert_eq!(field(wizard, "class.className"), "Wizard");
        assert_eq!(field(wizard, "details.level.value"), "3");
        assert_eq!(field(wizard, "details.alignment"), "c");
        assert_eq!(field(wizard, "details.occupation.value"), "Astrologer");
        assert_eq!(field(wizard, "attributes.hitDice.value"), "3d4");
        assert_eq!(field(wizard, "details.attackBonus"), "+1");
    }

    #[test]
    fn test_wizard_crit_from_sheet() {
        let wizard = &parse_pc_stat_blocks(WIZARD_TEXT)[0];
        assert_eq!(field(wizard, "attributes.critical.die"), "1d6");
        assert_eq!(field(wizard, "attributes.critical.table"), "I");
    }

    #[test]
    fn test_wizard_spells() {
        let wizard = &parse_pc_stat_blocks(WIZARD_TEXT)[0];
        assert_eq!(field(wizard, "class.spellCheck"), "d20+5");

        let spells: Vec<_> = wizard.spells().map(|s| (s.name.as_str(), s.level)).collect();
        assert_eq!(
            spells,
            vec![("Magic Missile", 1), ("Ward Portal", 1), ("Scorching Ray", 2)]
        );
    }

    #[test]
    fn test_wizard_weapons_and_armor() {
        let wizard = &parse_pc_stat_blocks(WIZARD_TEXT)[0];
        let attacks = weapons(wizard);
        assert_eq!(weapon_names(wizard), vec!["Dart", "Staff"]);
        assert!(!attacks[0].melee);
        assert!(attacks[1].melee);

        assert_eq!(field(wizard, "attributes.ac.value"), "10");
        let armor = wizard
            .items()
            .iter()
            .find_map(|item| match item {
                ParsedItem::Armor(armor) => Some(armor),
                _ => None,
            })
            .expect("armor item");
        assert_eq!(armor.name, "Unarmored");
        assert_eq!(armor.ac_bonus, "+0");
        assert_eq!(armor.fumble_die, "d4");
    }

    #[test]
    fn test_funnel_and_leveled_sheets_together() {
        let text = format!("{}\n\n{}", FUNNEL_TEXT, WIZARD_TEXT);
        let names: Vec<_> = parse_pc_stat_blocks(&text)
            .into_iter()
            .map(|pc| pc.name().to_string())
            .collect();
        assert_eq!(names, vec!["Gongfarmer", "Elven barrister", "Wizard"]);
    }
}
