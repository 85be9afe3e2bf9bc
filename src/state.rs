//! Host state snapshot and typed lookups.
//!
//! The host pushes its whole entity table on every update. A
//! [`StateSnapshot`] is that table, read-only: the card never mutates it.
//! Values are strings on the wire; the typed accessors here turn them into
//! numbers, flags, or text without ever failing.
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::state::{StateSnapshot, StateValue, ValueKind};
//!
//! let snapshot = StateSnapshot::new()
//!     .with_state("number.test_throttle", "45")
//!     .with_state("switch.test_lights", "on");
//!
//! assert_eq!(snapshot.number("number.test_throttle"), Some(45.0));
//! assert_eq!(snapshot.flag("switch.test_lights"), Some(true));
//! assert_eq!(
//!     snapshot.read("number.test_throttle", ValueKind::Number),
//!     Some(StateValue::Number(45.0))
//! );
//! assert_eq!(snapshot.number("number.test_horn_volume"), None);
//! ```

use std::collections::BTreeMap;

/// The literal state token for an active switch or binary sensor.
pub const STATE_ON: &str = "on";

/// An entity attribute value.
///
/// Only scalar attributes are interpreted; lists and maps are kept as
/// [`AttrValue::Structured`] so a snapshot containing them still parses.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "serde_json::Value", into = "serde_json::Value")
)]
pub enum AttrValue {
    /// JSON `null`.
    #[default]
    Null,
    /// Boolean attribute.
    Bool(bool),
    /// Numeric attribute.
    Number(f64),
    /// String attribute.
    Text(String),
    /// List or map attribute (contents not interpreted).
    Structured,
}

impl AttrValue {
    /// Loose truthiness: `null`, `false`, `0`, NaN and `""` are false;
    /// everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            AttrValue::Null => false,
            AttrValue::Bool(b) => *b,
            AttrValue::Number(n) => *n != 0.0 && !n.is_nan(),
            AttrValue::Text(s) => !s.is_empty(),
            AttrValue::Structured => true,
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => AttrValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => AttrValue::Text(s),
            Value::Array(_) | Value::Object(_) => AttrValue::Structured,
        }
    }
}

#[cfg(feature = "serde")]
impl From<AttrValue> for serde_json::Value {
    fn from(value: AttrValue) -> Self {
        use serde_json::Value;
        match value {
            AttrValue::Null | AttrValue::Structured => Value::Null,
            AttrValue::Bool(b) => Value::Bool(b),
            AttrValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttrValue::Text(s) => Value::String(s),
        }
    }
}

/// One entity as reported by the host.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    /// Raw state string ("45", "on", "forward", "unavailable", ...).
    pub state: String,
    /// Named attributes (sensor entities).
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl EntityState {
    /// Create an entity state without attributes.
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// Kind of value expected from an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Numeric state (`number` entities).
    Number,
    /// On/off state (`switch`, `binary_sensor`).
    Flag,
    /// Free-form text (`sensor` entities).
    Text,
}

/// A typed reading of one entity's state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateValue<'a> {
    /// Parsed number; malformed input reads as 0.
    Number(f32),
    /// `true` only for the literal `"on"`.
    Flag(bool),
    /// Non-empty state text.
    Text(&'a str),
}

/// Immutable snapshot of the host's entity table.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StateSnapshot {
    entities: BTreeMap<String, EntityState>,
}

impl StateSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from the host's JSON entity table
    /// (`{"number.x_throttle": {"state": "45", "attributes": {}}, ...}`).
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_json::from_str(json).context("invalid state snapshot JSON")
    }

    /// Add an entity (builder style, mostly for tests and hosts).
    pub fn with_entity(mut self, entity_id: impl Into<String>, state: EntityState) -> Self {
        self.entities.insert(entity_id.into(), state);
        self
    }

    /// Add an entity with a bare state string.
    pub fn with_state(self, entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        self.with_entity(entity_id, EntityState::new(state))
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the snapshot holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Raw entity lookup.
    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }

    /// All entity identifiers, in sorted order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Typed lookup. `None` means the entity is absent (or, for text, empty).
    pub fn read(&self, entity_id: &str, kind: ValueKind) -> Option<StateValue<'_>> {
        match kind {
            ValueKind::Number => self.number(entity_id).map(StateValue::Number),
            ValueKind::Flag => self.flag(entity_id).map(StateValue::Flag),
            ValueKind::Text => self.text(entity_id).map(StateValue::Text),
        }
    }

    /// Numeric state of a present entity; malformed values read as 0.
    pub fn number(&self, entity_id: &str) -> Option<f32> {
        self.get(entity_id).map(|e| parse_number(&e.state))
    }

    /// On/off state of a present entity (`true` only for `"on"`).
    pub fn flag(&self, entity_id: &str) -> Option<bool> {
        self.get(entity_id).map(|e| e.state == STATE_ON)
    }

    /// Text state of a present entity with a non-empty state.
    pub fn text(&self, entity_id: &str) -> Option<&str> {
        self.get(entity_id)
            .map(|e| e.state.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Named attribute of a present entity.
    pub fn attribute(&self, entity_id: &str, name: &str) -> Option<&AttrValue> {
        self.get(entity_id).and_then(|e| e.attributes.get(name))
    }
}

impl FromIterator<(String, EntityState)> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, EntityState)>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

/// Parse the leading decimal number of a state string.
///
/// Reads the longest prefix of the form `[+-]digits[.digits][e[+-]digits]`
/// after leading whitespace, so `"45"`, `" 45.5 "` and `"45%"` all parse.
/// Anything without a leading number yields 0; literals beyond the `f32`
/// range saturate to `f32::MAX` or `f32::MIN`.
///
/// ```
/// use lionel_train_card::state::parse_number;
///
/// assert_eq!(parse_number("45"), 45.0);
/// assert_eq!(parse_number("12.5%"), 12.5);
/// assert_eq!(parse_number("unavailable"), 0.0);
/// ```
pub fn parse_number(s: &str) -> f32 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    // out-of-range literals saturate so callers can clamp them
    match s[..end].parse::<f32>() {
        Ok(v) if v.is_nan() => 0.0,
        Ok(v) => v.clamp(f32::MIN, f32::MAX),
        Err(_) => 0.0,
    }
}
