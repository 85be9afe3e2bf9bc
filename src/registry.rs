//! Card registration.
//!
//! The hosting application owns a [`CardRegistry`] and registers each card
//! type once at startup. Nothing is registered as a side effect of loading
//! this crate.
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::registry::{lionel_card_info, CardRegistry};
//!
//! let mut registry = CardRegistry::new();
//! registry.register(lionel_card_info()).unwrap();
//! assert!(registry.register(lionel_card_info()).is_err());
//!
//! let info = registry.get("lionel-train-card").unwrap();
//! assert_eq!(info.editor_type, "lionel-train-card-editor");
//! ```

use anyhow::{bail, ensure};
use tracing::info;

/// Element type of the card.
pub const CARD_TYPE: &str = "lionel-train-card";

/// Element type of the card's configuration editor.
pub const EDITOR_TYPE: &str = "lionel-train-card-editor";

/// Metadata the dashboard shows in its card picker.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardInfo {
    /// Element type, unique per registry.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub card_type: String,
    /// Human-readable name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Whether the picker may render a live preview.
    pub preview: bool,
    /// Element type of the configuration editor.
    pub editor_type: String,
}

/// Registration record of the Lionel train card.
pub fn lionel_card_info() -> CardInfo {
    CardInfo {
        card_type: CARD_TYPE.to_string(),
        name: "Lionel Train Controller".to_string(),
        description: "A custom card for controlling Lionel LionChief trains".to_string(),
        preview: true,
        editor_type: EDITOR_TYPE.to_string(),
    }
}

/// Cards known to one hosting application.
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: Vec<CardInfo>,
}

impl CardRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card type. Registering the same type twice is an error.
    pub fn register(&mut self, card: CardInfo) -> anyhow::Result<()> {
        ensure!(!card.card_type.trim().is_empty(), "card type must not be empty");
        if self.get(&card.card_type).is_some() {
            bail!("card type '{}' is already registered", card.card_type);
        }
        info!(
            card = %card.card_type,
            version = env!("CARGO_PKG_VERSION"),
            "card registered"
        );
        self.cards.push(card);
        Ok(())
    }

    /// Look up a card by element type.
    pub fn get(&self, card_type: &str) -> Option<&CardInfo> {
        self.cards.iter().find(|c| c.card_type == card_type)
    }

    /// Registered cards, in registration order.
    pub fn cards(&self) -> &[CardInfo] {
        &self.cards
    }

    /// Number of registered cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
