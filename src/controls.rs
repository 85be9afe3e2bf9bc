//! User controls and the command each one sends.
//!
//! Every control on the card maps to at most one [`ServiceCall`]. The
//! mapping is pure; the card feeds the result to its dispatcher.

use crate::catalog::AnnouncementKey;
use crate::entity::{keys, Category, Device, EntityKey};
use crate::projector::{VolumeChannel, MAX_SPEED_PERCENT, MAX_VOLUME};
use crate::traits::ServiceCall;

/// A user interaction with the card.
///
/// The wire form used by the preview bridge is
/// [`ControlRequest`](crate::messages::ControlRequest).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    /// Throttle slider moved to `value` percent.
    Throttle {
        /// Slider position, 0..=100.
        value: f32,
    },
    /// Emergency stop.
    Stop,
    /// Direction: forward.
    Forward,
    /// Direction: reverse.
    Reverse,
    /// Headlight toggle.
    Lights,
    /// Horn.
    Horn,
    /// Bell.
    Bell,
    /// Connect to the train.
    Connect,
    /// Disconnect from the train.
    Disconnect,
    /// Auto-reconnect toggle.
    AutoReconnect,
    /// One of the seven announcement buttons.
    Announcement {
        /// Which announcement.
        key: AnnouncementKey,
    },
    /// A volume slider moved.
    Volume {
        /// Which channel.
        channel: VolumeChannel,
        /// Slider position, 0..=7.
        value: f32,
    },
    /// Expand or collapse the settings section (local only).
    ToggleSettings,
}

impl Control {
    /// Control name as it appears on the wire.
    pub const fn name(&self) -> &'static str {
        match self {
            Control::Throttle { .. } => "throttle",
            Control::Stop => "stop",
            Control::Forward => "forward",
            Control::Reverse => "reverse",
            Control::Lights => "lights",
            Control::Horn => "horn",
            Control::Bell => "bell",
            Control::Connect => "connect",
            Control::Disconnect => "disconnect",
            Control::AutoReconnect => "auto_reconnect",
            Control::Announcement { .. } => "announcement",
            Control::Volume { .. } => "volume",
            Control::ToggleSettings => "toggle_settings",
        }
    }

    /// The service call this control sends for `device`, if any.
    ///
    /// Slider values are rounded to whole steps and clamped to their range.
    ///
    /// ```
    /// use lionel_train_card::controls::Control;
    /// use lionel_train_card::entity::Device;
    ///
    /// let call = Control::Horn.command(&Device::new("Test")).unwrap();
    /// assert_eq!(call.entity_id, "button.test_horn");
    /// ```
    pub fn command(&self, device: &Device) -> Option<ServiceCall> {
        let press = |key: EntityKey| Some(ServiceCall::press(device.key(key)));
        let toggle = |key: EntityKey| Some(ServiceCall::toggle(device.key(key)));

        match *self {
            Control::Throttle { value } => Some(ServiceCall::set_value(
                device.key(keys::THROTTLE),
                slider_value(value, MAX_SPEED_PERCENT),
            )),
            Control::Stop => press(keys::STOP),
            Control::Forward => press(keys::FORWARD),
            Control::Reverse => press(keys::REVERSE),
            Control::Lights => toggle(keys::LIGHTS),
            Control::Horn => press(keys::HORN),
            Control::Bell => press(keys::BELL),
            Control::Connect => press(keys::CONNECT),
            Control::Disconnect => press(keys::DISCONNECT),
            Control::AutoReconnect => toggle(keys::AUTO_RECONNECT),
            Control::Announcement { key } => Some(ServiceCall::press(
                device.entity_id(Category::Button, &key.button_attribute()),
            )),
            Control::Volume { channel, value } => Some(ServiceCall::set_value(
                device.key(channel.key()),
                slider_value(value, MAX_VOLUME),
            )),
            Control::ToggleSettings => None,
        }
    }
}

/// Round a slider reading to a whole step within `0..=max`.
pub fn slider_value(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.round().clamp(0.0, max)
}
