//! State projection: host snapshot to view model.
//!
//! [`project`] reads the fixed set of entities a train exposes and derives
//! the [`ViewModel`] the card renders from. Every lookup degrades to a
//! default; nothing here can fail.
//!
//! # Defaults
//!
//! | Field | Missing entity |
//! |-------|----------------|
//! | `connected` | `false` |
//! | `speed_percent` | `0` |
//! | `lights_on` | `false` |
//! | `direction_forward` | `true` |
//! | `train_model` | [`TrainModel::Generic`] |
//! | volumes | `0`, or the previously observed value (see [`project_with_previous`]) |
//! | `auto_reconnect` | `false` |

use crate::catalog::TrainModel;
use crate::entity::{keys, Device, EntityKey};
use crate::state::StateSnapshot;

/// Highest throttle percentage.
pub const MAX_SPEED_PERCENT: f32 = 100.0;

/// Highest volume step.
pub const MAX_VOLUME: f32 = 7.0;

/// One of the five sound channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VolumeChannel {
    /// Overall volume.
    Master,
    /// Horn.
    Horn,
    /// Bell.
    Bell,
    /// Announcements.
    Speech,
    /// Engine sounds.
    Engine,
}

impl VolumeChannel {
    /// All channels, in slider order.
    pub const ALL: [VolumeChannel; 5] = [
        VolumeChannel::Master,
        VolumeChannel::Horn,
        VolumeChannel::Bell,
        VolumeChannel::Speech,
        VolumeChannel::Engine,
    ];

    /// Number entity backing this channel.
    pub const fn key(&self) -> EntityKey {
        match self {
            VolumeChannel::Master => keys::MASTER_VOLUME,
            VolumeChannel::Horn => keys::HORN_VOLUME,
            VolumeChannel::Bell => keys::BELL_VOLUME,
            VolumeChannel::Speech => keys::SPEECH_VOLUME,
            VolumeChannel::Engine => keys::ENGINE_VOLUME,
        }
    }

    /// Slider label.
    pub const fn label(&self) -> &'static str {
        match self {
            VolumeChannel::Master => "Master",
            VolumeChannel::Horn => "Horn",
            VolumeChannel::Bell => "Bell",
            VolumeChannel::Speech => "Speech",
            VolumeChannel::Engine => "Engine",
        }
    }

    /// Parse a channel from its lowercase name.
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" => Some(VolumeChannel::Master),
            "horn" => Some(VolumeChannel::Horn),
            "bell" => Some(VolumeChannel::Bell),
            "speech" => Some(VolumeChannel::Speech),
            "engine" => Some(VolumeChannel::Engine),
            _ => None,
        }
    }
}

/// Volume levels, 0..=7 each.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Volumes {
    /// Master volume.
    pub master: f32,
    /// Horn volume.
    pub horn: f32,
    /// Bell volume.
    pub bell: f32,
    /// Speech volume.
    pub speech: f32,
    /// Engine volume.
    pub engine: f32,
}

impl Volumes {
    /// Level of one channel.
    pub fn get(&self, channel: VolumeChannel) -> f32 {
        match channel {
            VolumeChannel::Master => self.master,
            VolumeChannel::Horn => self.horn,
            VolumeChannel::Bell => self.bell,
            VolumeChannel::Speech => self.speech,
            VolumeChannel::Engine => self.engine,
        }
    }

    fn slot(&mut self, channel: VolumeChannel) -> &mut f32 {
        match channel {
            VolumeChannel::Master => &mut self.master,
            VolumeChannel::Horn => &mut self.horn,
            VolumeChannel::Bell => &mut self.bell,
            VolumeChannel::Speech => &mut self.speech,
            VolumeChannel::Engine => &mut self.engine,
        }
    }
}

/// Everything the card displays, derived from one snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewModel {
    /// Bluetooth link to the train is up.
    pub connected: bool,
    /// Throttle, clamped to 0..=100.
    pub speed_percent: f32,
    /// Headlight state.
    pub lights_on: bool,
    /// Travel direction.
    pub direction_forward: bool,
    /// Catalog entry selecting announcement labels.
    pub train_model: TrainModel,
    /// Sound levels.
    pub volumes: Volumes,
    /// Backend reconnects automatically after a drop.
    pub auto_reconnect: bool,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            connected: false,
            speed_percent: 0.0,
            lights_on: false,
            direction_forward: true,
            train_model: TrainModel::Generic,
            volumes: Volumes::default(),
            auto_reconnect: false,
        }
    }
}

/// Project a snapshot into a view model for `device`.
///
/// Pure: projecting the same snapshot twice gives the same result.
pub fn project(snapshot: &StateSnapshot, device: &Device) -> ViewModel {
    project_with_previous(snapshot, device, None)
}

/// Project a snapshot, carrying volumes over from `previous` when their
/// entities are missing from `snapshot`.
///
/// Volume sliders keep their last observed position while the backend is
/// not reporting them; every other field follows the defaults of
/// [`project`].
pub fn project_with_previous(
    snapshot: &StateSnapshot,
    device: &Device,
    previous: Option<&ViewModel>,
) -> ViewModel {
    let number = |key: EntityKey| snapshot.number(&device.key(key));
    let flag = |key: EntityKey| snapshot.flag(&device.key(key)).unwrap_or(false);

    let mut volumes = previous.map(|p| p.volumes).unwrap_or_default();
    for channel in VolumeChannel::ALL {
        if let Some(level) = number(channel.key()) {
            *volumes.slot(channel) = level.clamp(0.0, MAX_VOLUME);
        }
    }

    ViewModel {
        connected: flag(keys::CONNECTION),
        speed_percent: number(keys::THROTTLE)
            .unwrap_or(0.0)
            .clamp(0.0, MAX_SPEED_PERCENT),
        lights_on: flag(keys::LIGHTS),
        direction_forward: direction_forward(snapshot, device),
        train_model: TrainModel::from_name_or_default(
            snapshot.text(&device.key(keys::TRAIN_MODEL)),
        ),
        volumes,
        auto_reconnect: flag(keys::AUTO_RECONNECT),
    }
}

/// Direction with its fallback chain: the direction sensor if it reports a
/// value, else the status sensor's `direction_forward` attribute, else
/// forward.
pub fn direction_forward(snapshot: &StateSnapshot, device: &Device) -> bool {
    if let Some(direction) = snapshot.text(&device.key(keys::DIRECTION)) {
        return direction == "forward";
    }
    snapshot
        .attribute(&device.key(keys::STATUS), keys::DIRECTION_FORWARD_ATTR)
        .map(|attr| attr.truthy())
        .unwrap_or(true)
}
