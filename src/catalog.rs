//! Train model catalog: announcement labels per locomotive model.
//!
//! Every LionChief locomotive exposes the same seven announcement buttons,
//! but the recorded phrases differ per model. The catalog maps a model to the
//! labels shown on those buttons.

use core::fmt;

/// Announcement button key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnnouncementKey {
    /// Random announcement.
    Random,
    /// "Ready to Roll".
    ReadyToRoll,
    /// "Hey There".
    HeyThere,
    /// "Squeaky".
    Squeaky,
    /// "Water & Fire".
    WaterAndFire,
    /// "Fastest Freight".
    FastestFreight,
    /// "Penna Flyer".
    PennaFlyer,
}

impl AnnouncementKey {
    /// All seven keys, in button order.
    pub const ALL: [AnnouncementKey; 7] = [
        AnnouncementKey::Random,
        AnnouncementKey::ReadyToRoll,
        AnnouncementKey::HeyThere,
        AnnouncementKey::Squeaky,
        AnnouncementKey::WaterAndFire,
        AnnouncementKey::FastestFreight,
        AnnouncementKey::PennaFlyer,
    ];

    /// Snake-case key as used in entity attributes.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AnnouncementKey::Random => "random",
            AnnouncementKey::ReadyToRoll => "ready_to_roll",
            AnnouncementKey::HeyThere => "hey_there",
            AnnouncementKey::Squeaky => "squeaky",
            AnnouncementKey::WaterAndFire => "water_and_fire",
            AnnouncementKey::FastestFreight => "fastest_freight",
            AnnouncementKey::PennaFlyer => "penna_flyer",
        }
    }

    /// Parse a key from its snake-case form.
    pub fn from_text(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }

    /// Button entity attribute, e.g. `announcement_ready_to_roll`.
    pub fn button_attribute(&self) -> String {
        let mut attr = String::from("announcement_");
        attr.push_str(self.as_str());
        attr
    }

    fn index(self) -> usize {
        match self {
            AnnouncementKey::Random => 0,
            AnnouncementKey::ReadyToRoll => 1,
            AnnouncementKey::HeyThere => 2,
            AnnouncementKey::Squeaky => 3,
            AnnouncementKey::WaterAndFire => 4,
            AnnouncementKey::FastestFreight => 5,
            AnnouncementKey::PennaFlyer => 6,
        }
    }
}

impl fmt::Display for AnnouncementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locomotive model known to the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrainModel {
    /// Any LionChief locomotive without a dedicated label set.
    #[default]
    Generic,
    /// The Polar Express set.
    #[cfg_attr(feature = "serde", serde(rename = "Polar Express"))]
    PolarExpress,
}

const GENERIC_LABELS: [&str; 7] = [
    "Random",
    "Ready to Roll",
    "Hey There",
    "Squeaky",
    "Water & Fire",
    "Fastest Freight",
    "Penna Flyer",
];

const POLAR_EXPRESS_LABELS: [&str; 7] = [
    "Random",
    "Polar Express",
    "All Aboard",
    "You Coming?",
    "Tickets",
    "First Gift",
    "The King",
];

impl TrainModel {
    /// Every catalog entry.
    pub const ALL: [TrainModel; 2] = [TrainModel::Generic, TrainModel::PolarExpress];

    /// Model name as reported by the train model sensor.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            TrainModel::Generic => "Generic",
            TrainModel::PolarExpress => "Polar Express",
        }
    }

    /// Look up a model by its exact sensor value.
    ///
    /// ```
    /// use lionel_train_card::TrainModel;
    ///
    /// assert_eq!(TrainModel::from_name("Polar Express"), Some(TrainModel::PolarExpress));
    /// assert_eq!(TrainModel::from_name("Big Boy"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Look up a model, falling back to [`TrainModel::Generic`].
    pub fn from_name_or_default(name: Option<&str>) -> Self {
        name.and_then(Self::from_name).unwrap_or_default()
    }

    /// Label set for this model, in [`AnnouncementKey::ALL`] order.
    pub const fn labels(&self) -> &'static [&'static str; 7] {
        match self {
            TrainModel::Generic => &GENERIC_LABELS,
            TrainModel::PolarExpress => &POLAR_EXPRESS_LABELS,
        }
    }

    /// Label for one announcement button.
    pub fn label(&self, key: AnnouncementKey) -> &'static str {
        self.labels()[key.index()]
    }
}

impl fmt::Display for TrainModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
