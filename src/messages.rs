//! Shared message types for the preview bridge (serde-based).
//!
//! # Example
//!
//! ```
//! use lionel_train_card::messages::ControlRequest;
//! use lionel_train_card::Control;
//!
//! let json = r#"{"control": "throttle", "value": 45}"#;
//! let req: ControlRequest = serde_json::from_str(json).unwrap();
//! assert_eq!(req.into_control().unwrap(), Control::Throttle { value: 45.0 });
//! ```

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::catalog::AnnouncementKey;
use crate::config::CardConfig;
use crate::controls::Control;
use crate::projector::VolumeChannel;

// ============================================================================
// Request Types
// ============================================================================

/// A user control on the wire.
///
/// # Fields
///
/// - `control`: control name (`throttle`, `stop`, `horn`, `volume`, ...)
/// - `value`: slider position for `throttle` and `volume`
/// - `key`: announcement key for `announcement`, channel for `volume`
///
/// # JSON Examples
///
/// Momentary button:
/// ```json
/// {"control": "horn"}
/// ```
///
/// Throttle slider:
/// ```json
/// {"control": "throttle", "value": 45}
/// ```
///
/// Announcement:
/// ```json
/// {"control": "announcement", "key": "ready_to_roll"}
/// ```
///
/// Volume slider:
/// ```json
/// {"control": "volume", "key": "horn", "value": 5}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRequest {
    /// Control name.
    pub control: String,
    /// Slider position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    /// Announcement key or volume channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ControlRequest {
    /// A request with no value or key.
    pub fn named(control: &str) -> Self {
        Self {
            control: control.to_string(),
            value: None,
            key: None,
        }
    }

    /// Validate the request into a [`Control`].
    pub fn into_control(self) -> anyhow::Result<Control> {
        let value = || {
            self.value
                .ok_or_else(|| anyhow!("control '{}' needs a numeric value", self.control))
        };
        let key = || {
            self.key
                .as_deref()
                .ok_or_else(|| anyhow!("control '{}' needs a key", self.control))
        };

        let control = match self.control.trim() {
            "throttle" => Control::Throttle { value: value()? },
            "stop" => Control::Stop,
            "forward" => Control::Forward,
            "reverse" => Control::Reverse,
            "lights" => Control::Lights,
            "horn" => Control::Horn,
            "bell" => Control::Bell,
            "connect" => Control::Connect,
            "disconnect" => Control::Disconnect,
            "auto_reconnect" => Control::AutoReconnect,
            "toggle_settings" => Control::ToggleSettings,
            "announcement" => {
                let key = key()?;
                Control::Announcement {
                    key: AnnouncementKey::from_text(key)
                        .ok_or_else(|| anyhow!("unknown announcement '{key}'"))?,
                }
            }
            "volume" => {
                let key = key()?;
                let name = key.strip_suffix("_volume").unwrap_or(key);
                Control::Volume {
                    channel: VolumeChannel::from_text(name)
                        .ok_or_else(|| anyhow!("unknown volume channel '{key}'"))?,
                    value: value()?,
                }
            }
            other => bail!("unknown control '{other}'"),
        };
        Ok(control)
    }
}

impl From<Control> for ControlRequest {
    fn from(control: Control) -> Self {
        let mut req = Self::named(control.name());
        match control {
            Control::Throttle { value } => req.value = Some(value),
            Control::Announcement { key } => req.key = Some(key.as_str().to_string()),
            Control::Volume { channel, value } => {
                req.key = Some(channel.label().to_ascii_lowercase());
                req.value = Some(value);
            }
            _ => {}
        }
        req
    }
}

impl TryFrom<ControlRequest> for Control {
    type Error = anyhow::Error;

    fn try_from(req: ControlRequest) -> anyhow::Result<Self> {
        req.into_control()
    }
}

/// Request to replace the card configuration.
///
/// Same shape as the dashboard's card configuration; unknown keys such as
/// `type` are ignored.
pub type ConfigRequest = CardConfig;
