//! Parsed Character Records
//!
//! Parser output is a flat map of dotted property paths to scalar values
//! (`"attributes.ac.value" -> "15"`) plus an ordered list of items. The host
//! document model applies these as sparse partial updates, so the map must
//! stay flat and scalar when serialized.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name given to records whose source has none.
pub const UNNAMED: &str = "Unnamed";

// ============================================================================
// Field Values
// ============================================================================

/// A scalar stored under a dotted path.
///
/// JSON imports pass values through with their original type: `"18"` stays
/// text and `18` stays a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON scalar. Arrays and objects are not scalars and map to
    /// `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(
                n.as_i64()
                    .map(Self::Integer)
                    .unwrap_or_else(|| Self::Float(n.as_f64().unwrap_or_default())),
            ),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view, parsing text the way a lenient `parseInt` would:
    /// optional sign, then leading digits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Float(f) => Some(f.trunc() as i64),
            Self::Text(s) => leading_int(s),
            Self::Null | Self::Bool(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Parse an optional sign followed by leading digits, ignoring the rest.
pub(crate) fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

// ============================================================================
// Items
// ============================================================================

/// An attack; the first weapon on a record is its default attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponItem {
    pub name: String,
    /// Signed to-hit, e.g. `"+1"`.
    pub to_hit: String,
    /// Dice or flat damage; `"0"` for special-only attacks.
    pub damage: String,
    pub melee: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellItem {
    pub name: String,
    pub level: u32,
}

/// Coin denominations, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    Pp,
    Gp,
    Ep,
    Sp,
    Cp,
}

impl Denomination {
    pub const ALL: [Denomination; 5] = [Self::Pp, Self::Gp, Self::Ep, Self::Sp, Self::Cp];

    pub fn code(self) -> &'static str {
        match self {
            Self::Pp => "pp",
            Self::Gp => "gp",
            Self::Ep => "ep",
            Self::Sp => "sp",
            Self::Cp => "cp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyItem {
    pub denominations: BTreeMap<Denomination, String>,
}

impl CurrencyItem {
    pub fn amount(&self, denomination: Denomination) -> &str {
        self.denominations
            .get(&denomination)
            .map(String::as_str)
            .unwrap_or("0")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorItem {
    pub name: String,
    pub ac_bonus: String,
    pub check_penalty: String,
    pub fumble_die: String,
}

/// One entry of a record's item list, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedItem {
    Weapon(WeaponItem),
    Spell(SpellItem),
    Currency(CurrencyItem),
    Equipment(EquipmentItem),
    Armor(ArmorItem),
}

// ============================================================================
// Character
// ============================================================================

/// One recognized stat block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCharacter {
    name: String,
    fields: IndexMap<String, FieldValue>,
    items: Vec<ParsedItem>,
}

impl ParsedCharacter {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            items: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, path: &str, value: impl Into<FieldValue>) {
        self.fields.insert(path.to_string(), value.into());
    }

    pub(crate) fn push_item(&mut self, item: ParsedItem) {
        self.items.push(item);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn field(&self, path: &str) -> Option<&FieldValue> {
        self.fields.get(path)
    }

    /// Text value at `path`, if the field exists and holds text.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.field(path).and_then(FieldValue::as_str)
    }

    pub fn items(&self) -> &[ParsedItem] {
        &self.items
    }

    pub fn weapons(&self) -> impl Iterator<Item = &WeaponItem> {
        self.items.iter().filter_map(|item| match item {
            ParsedItem::Weapon(weapon) => Some(weapon),
            _ => None,
        })
    }

    pub fn spells(&self) -> impl Iterator<Item = &SpellItem> {
        self.items.iter().filter_map(|item| match item {
            ParsedItem::Spell(spell) => Some(spell),
            _ => None,
        })
    }

    pub fn currency(&self) -> Option<&CurrencyItem> {
        self.items.iter().find_map(|item| match item {
            ParsedItem::Currency(currency) => Some(currency),
            _ => None,
        })
    }

    /// The wire shape handed to the document layer.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "fields": self.fields,
            "items": self.items,
        })
    }
}
