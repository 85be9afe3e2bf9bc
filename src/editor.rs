//! Configuration editor.
//!
//! The editor offers every train the host knows about. Trains are found by
//! scanning the state snapshot for `number.*_throttle` entities and turning
//! the entity token back into a display name. Changing the device or the
//! title yields a [`ConfigChanged`] event carrying the whole updated
//! configuration, which the dashboard persists.

use crate::config::CardConfig;
use crate::entity::{display_name, keys, Category};
use crate::state::StateSnapshot;

/// Option text when the snapshot holds no trains.
pub const NO_TRAINS_FOUND: &str = "No Lionel trains found";

/// Leading option text prompting a choice.
pub const SELECT_PROMPT: &str = "Select a train...";

/// Emitted whenever the user edits the configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigChanged {
    /// The full updated configuration.
    pub config: CardConfig,
}

/// One entry of the device picker.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceOption {
    /// Value stored in the configuration.
    pub value: String,
    /// Text shown.
    pub label: String,
    /// Currently chosen.
    pub selected: bool,
}

/// Editor state for one card.
#[derive(Clone, Debug, Default)]
pub struct CardEditor {
    config: CardConfig,
    snapshot: Option<StateSnapshot>,
}

impl CardEditor {
    /// Editor for `config`.
    pub fn new(config: CardConfig) -> Self {
        Self {
            config,
            snapshot: None,
        }
    }

    /// Replace the configuration being edited.
    pub fn set_config(&mut self, config: CardConfig) {
        self.config = config;
    }

    /// Configuration being edited.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Accept a state push from the host.
    pub fn set_state(&mut self, snapshot: StateSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Trains known to the host, each once, in entity-id order.
    pub fn devices(&self) -> Vec<String> {
        self.snapshot
            .as_ref()
            .map(discover_devices)
            .unwrap_or_default()
    }

    /// Picker entries: a prompt, then one per train, or a hint when none.
    pub fn device_options(&self) -> Vec<DeviceOption> {
        let mut options = vec![DeviceOption {
            value: String::new(),
            label: SELECT_PROMPT.to_string(),
            selected: false,
        }];
        let devices = self.devices();
        if devices.is_empty() {
            options.push(DeviceOption {
                value: String::new(),
                label: NO_TRAINS_FOUND.to_string(),
                selected: false,
            });
        } else {
            options.extend(devices.into_iter().map(|name| DeviceOption {
                selected: name == self.config.device,
                label: name.clone(),
                value: name,
            }));
        }
        options
    }

    /// User picked a device.
    pub fn set_device(&mut self, device: &str) -> ConfigChanged {
        self.config.device = device.to_string();
        self.changed()
    }

    /// User edited the title override.
    pub fn set_name(&mut self, name: &str) -> ConfigChanged {
        self.config.name = Some(name.to_string());
        self.changed()
    }

    fn changed(&self) -> ConfigChanged {
        ConfigChanged {
            config: self.config.clone(),
        }
    }
}

/// Display names of all trains with a throttle entity in `snapshot`.
pub fn discover_devices(snapshot: &StateSnapshot) -> Vec<String> {
    let prefix = format!("{}.", Category::Number);
    let suffix = format!("_{}", keys::THROTTLE.attribute);

    let mut devices: Vec<String> = Vec::new();
    for id in snapshot.entity_ids() {
        let Some(token) = id
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        else {
            continue;
        };
        if token.is_empty() {
            continue;
        }
        let name = display_name(token);
        if !devices.contains(&name) {
            devices.push(name);
        }
    }
    devices
}
