//! Entity addressing: mapping a device name and a logical attribute to the
//! host's entity identifier.
//!
//! The host names every entity of a train as
//! `"{category}.{normalized_device}_{attribute}"`, where the normalized device
//! is the display name lowercased with each run of whitespace collapsed to a
//! single underscore.
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::entity::{resolve, Category};
//!
//! let id = resolve("Polar  Express", Category::Number, "throttle");
//! assert_eq!(id, "number.polar_express_throttle");
//! ```

use core::fmt;

/// Entity category (the host's entity domain).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    /// Numeric entity (throttle, volumes).
    Number,
    /// Boolean switch (lights, auto-reconnect).
    Switch,
    /// Momentary button (horn, bell, announcements, ...).
    Button,
    /// Boolean sensor (connection).
    BinarySensor,
    /// Free-form sensor (train model, direction, status).
    Sensor,
}

impl Category {
    /// Returns the category as it appears in entity identifiers.
    ///
    /// ```
    /// use lionel_train_card::entity::Category;
    ///
    /// assert_eq!(Category::BinarySensor.as_str(), "binary_sensor");
    /// assert_eq!(Category::Number.as_str(), "number");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Number => "number",
            Category::Switch => "switch",
            Category::Button => "button",
            Category::BinarySensor => "binary_sensor",
            Category::Sensor => "sensor",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a device display name into its entity token.
///
/// Lowercases the name and replaces every maximal run of whitespace with a
/// single underscore. Leading and trailing whitespace runs become leading and
/// trailing underscores, the same as any other run.
///
/// ```
/// use lionel_train_card::entity::normalize_device;
///
/// assert_eq!(normalize_device("Polar Express"), "polar_express");
/// assert_eq!(normalize_device("Polar \t Express"), "polar_express");
/// ```
pub fn normalize_device(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
                in_space = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// Resolve a fully-qualified entity identifier.
///
/// Pure and total: never checks whether the entity exists in the host.
pub fn resolve(device: &str, category: Category, attribute: &str) -> String {
    entity_id(category, &normalize_device(device), attribute)
}

/// `"{category}.{token}_{attribute}"` for an already-normalized token.
fn entity_id(category: Category, token: &str, attribute: &str) -> String {
    let mut id = String::with_capacity(category.as_str().len() + token.len() + attribute.len() + 2);
    id.push_str(category.as_str());
    id.push('.');
    id.push_str(token);
    id.push('_');
    id.push_str(attribute);
    id
}

/// Derive a display name from a normalized device token.
///
/// Inverse of [`normalize_device`] up to case: underscores become spaces and
/// the first letter of every word is uppercased.
///
/// ```
/// use lionel_train_card::entity::display_name;
///
/// assert_eq!(display_name("polar_express"), "Polar Express");
/// ```
pub fn display_name(token: &str) -> String {
    token
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A (category, attribute) pair naming one logical entity of a train.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityKey {
    /// Entity category.
    pub category: Category,
    /// Snake-case attribute suffix.
    pub attribute: &'static str,
}

impl EntityKey {
    /// Create a new key.
    pub const fn new(category: Category, attribute: &'static str) -> Self {
        Self {
            category,
            attribute,
        }
    }

    /// Resolve this key against a device name.
    pub fn resolve(&self, device: &str) -> String {
        resolve(device, self.category, self.attribute)
    }
}

/// Well-known entity keys of a LionChief train.
pub mod keys {
    use super::{Category, EntityKey};

    /// Throttle, 0..100.
    pub const THROTTLE: EntityKey = EntityKey::new(Category::Number, "throttle");
    /// Master volume, 0..7.
    pub const MASTER_VOLUME: EntityKey = EntityKey::new(Category::Number, "master_volume");
    /// Horn volume, 0..7.
    pub const HORN_VOLUME: EntityKey = EntityKey::new(Category::Number, "horn_volume");
    /// Bell volume, 0..7.
    pub const BELL_VOLUME: EntityKey = EntityKey::new(Category::Number, "bell_volume");
    /// Speech volume, 0..7.
    pub const SPEECH_VOLUME: EntityKey = EntityKey::new(Category::Number, "speech_volume");
    /// Engine sound volume, 0..7.
    pub const ENGINE_VOLUME: EntityKey = EntityKey::new(Category::Number, "engine_volume");

    /// Headlight switch.
    pub const LIGHTS: EntityKey = EntityKey::new(Category::Switch, "lights");
    /// Auto-reconnect switch.
    pub const AUTO_RECONNECT: EntityKey = EntityKey::new(Category::Switch, "auto_reconnect");

    /// Bluetooth connection sensor.
    pub const CONNECTION: EntityKey = EntityKey::new(Category::BinarySensor, "connection");

    /// Train model sensor.
    pub const TRAIN_MODEL: EntityKey = EntityKey::new(Category::Sensor, "train_model");
    /// Dedicated direction sensor ("forward" / other).
    pub const DIRECTION: EntityKey = EntityKey::new(Category::Sensor, "direction");
    /// Status sensor; carries a `direction_forward` attribute.
    pub const STATUS: EntityKey = EntityKey::new(Category::Sensor, "status");

    /// Forward button.
    pub const FORWARD: EntityKey = EntityKey::new(Category::Button, "forward");
    /// Reverse button.
    pub const REVERSE: EntityKey = EntityKey::new(Category::Button, "reverse");
    /// Horn button.
    pub const HORN: EntityKey = EntityKey::new(Category::Button, "horn");
    /// Bell button.
    pub const BELL: EntityKey = EntityKey::new(Category::Button, "bell");
    /// Emergency stop button.
    pub const STOP: EntityKey = EntityKey::new(Category::Button, "stop");
    /// Connect button.
    pub const CONNECT: EntityKey = EntityKey::new(Category::Button, "connect");
    /// Disconnect button.
    pub const DISCONNECT: EntityKey = EntityKey::new(Category::Button, "disconnect");

    /// Attribute on [`STATUS`] holding the direction flag.
    pub const DIRECTION_FORWARD_ATTR: &str = "direction_forward";
}

/// A train device, identified by its display name.
///
/// Immutable for the lifetime of one card configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    name: String,
    token: String,
}

impl Device {
    /// Create a device from its display name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let token = normalize_device(&name);
        Self { name, token }
    }

    /// Display name as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized token used in entity identifiers.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Resolve a category/attribute pair for this device.
    pub fn entity_id(&self, category: Category, attribute: &str) -> String {
        entity_id(category, &self.token, attribute)
    }

    /// Resolve a well-known key for this device.
    pub fn key(&self, key: EntityKey) -> String {
        self.entity_id(key.category, key.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_simple() {
        assert_eq!(
            resolve("Polar Express", Category::Number, "throttle"),
            "number.polar_express_throttle"
        );
    }

    #[test]
    fn resolve_collapses_whitespace_runs() {
        assert_eq!(
            resolve("Polar  Express", Category::Number, "throttle"),
            "number.polar_express_throttle"
        );
        assert_eq!(
            resolve("Polar\t\n Express", Category::Switch, "lights"),
            "switch.polar_express_lights"
        );
    }

    #[test]
    fn resolve_is_deterministic() {
        let a = resolve("Test", Category::Button, "announcement_random");
        let b = resolve("Test", Category::Button, "announcement_random");
        assert_eq!(a, b);
        assert_eq!(a, "button.test_announcement_random");
    }

    #[test]
    fn resolve_distinguishes_categories() {
        let n = resolve("Test", Category::Number, "x");
        let s = resolve("Test", Category::Sensor, "x");
        assert_ne!(n, s);
    }

    #[test]
    fn normalize_keeps_underscores_and_digits() {
        assert_eq!(normalize_device("Loco_2 B"), "loco_2_b");
    }

    #[test]
    fn normalize_edges() {
        assert_eq!(normalize_device(" Test "), "_test_");
        assert_eq!(normalize_device(""), "");
    }

    #[test]
    fn device_keeps_padding() {
        let dev = Device::new(" Test ");
        assert_eq!(dev.token(), "_test_");
        assert_eq!(dev.key(keys::HORN), resolve(" Test ", Category::Button, "horn"));
        assert_eq!(dev.key(keys::HORN), "button._test__horn");
    }

    #[test]
    fn display_name_title_cases() {
        assert_eq!(display_name("polar_express"), "Polar Express");
        assert_eq!(display_name("test"), "Test");
        assert_eq!(display_name("big_boy_4014"), "Big Boy 4014");
    }

    #[test]
    fn device_matches_free_function() {
        let dev = Device::new("Polar Express");
        assert_eq!(dev.token(), "polar_express");
        assert_eq!(dev.key(keys::HORN), resolve("Polar Express", Category::Button, "horn"));
        assert_eq!(dev.key(keys::CONNECTION), "binary_sensor.polar_express_connection");
    }
}
