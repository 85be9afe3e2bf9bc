//! Render output: a plain description of what the card shows.
//!
//! Rendering is a pure function of the configuration, the projected
//! [`ViewModel`], any optimistic local echo, and the current animation
//! frame. A DOM or canvas layer turns a [`CardView`] into pixels; this crate
//! never touches one.

use crate::animator::{Frame, Phase};
use crate::catalog::{AnnouncementKey, TrainModel};
use crate::projector::{ViewModel, VolumeChannel};

/// Placeholder text shown before a device is chosen.
pub const UNCONFIGURED_MESSAGE: &str = "Select a Lionel train in the card editor";

/// Motion status line under the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotionStatus {
    /// Speed 0.
    Stopped,
    /// Below 30%, forward.
    CrawlingForward,
    /// Below 30%, reverse.
    CrawlingBackward,
    /// Below 60%, forward.
    MovingForward,
    /// Below 60%, reverse.
    MovingBackward,
    /// 60% and up, forward.
    FullSpeedAhead,
    /// 60% and up, reverse.
    FullSpeedReverse,
}

impl MotionStatus {
    /// Classify a speed and direction.
    pub fn from_motion(speed_percent: f32, forward: bool) -> Self {
        if speed_percent <= 0.0 {
            MotionStatus::Stopped
        } else if speed_percent < 30.0 {
            if forward {
                MotionStatus::CrawlingForward
            } else {
                MotionStatus::CrawlingBackward
            }
        } else if speed_percent < 60.0 {
            if forward {
                MotionStatus::MovingForward
            } else {
                MotionStatus::MovingBackward
            }
        } else if forward {
            MotionStatus::FullSpeedAhead
        } else {
            MotionStatus::FullSpeedReverse
        }
    }

    /// Status text.
    pub const fn label(&self) -> &'static str {
        match self {
            MotionStatus::Stopped => "Stopped",
            MotionStatus::CrawlingForward => "Crawling Forward",
            MotionStatus::CrawlingBackward => "Crawling Backward",
            MotionStatus::MovingForward => "Moving Forward",
            MotionStatus::MovingBackward => "Moving Backward",
            MotionStatus::FullSpeedAhead => "Full Speed Ahead!",
            MotionStatus::FullSpeedReverse => "Full Speed Reverse!",
        }
    }
}

/// Smoke opacity for a speed: `min(0.3 + speed/100 * 0.7, 1)`, 0 when stopped.
pub fn smoke_opacity(speed_percent: f32) -> f32 {
    if speed_percent > 0.0 {
        (0.3 + speed_percent / 100.0 * 0.7).min(1.0)
    } else {
        0.0
    }
}

/// Connection badge text.
pub const fn connection_label(connected: bool) -> &'static str {
    if connected {
        "Connected"
    } else {
        "Disconnected"
    }
}

/// One volume slider.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VolumeSlider {
    /// Channel driven by the slider.
    pub channel: VolumeChannel,
    /// Slider label.
    pub label: &'static str,
    /// Slider position, 0..=7.
    pub value: f32,
    /// Rounded value shown next to the slider.
    pub display: u8,
}

/// One announcement button.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnnouncementButton {
    /// Which announcement the button plays.
    pub key: AnnouncementKey,
    /// Label from the train model catalog.
    pub label: &'static str,
}

/// Optimistic values shown between a user action and the next host push.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LocalEcho {
    /// Throttle position the user just chose.
    pub speed_percent: Option<f32>,
    /// Direction the user just chose.
    pub forward: Option<bool>,
}

impl LocalEcho {
    /// Whether any optimistic value is pending.
    pub fn is_empty(&self) -> bool {
        self.speed_percent.is_none() && self.forward.is_none()
    }
}

/// The control panel of a configured card.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PanelView {
    /// Card title.
    pub title: String,
    /// Catalog entry in use.
    pub train_model: TrainModel,
    /// Connection state.
    pub connected: bool,
    /// Connection badge text.
    pub connection_label: &'static str,
    /// Throttle slider position.
    pub speed_percent: f32,
    /// Speed readout, e.g. `"45%"`.
    pub speed_label: String,
    /// Direction indicator.
    pub direction_forward: bool,
    /// Lights button active.
    pub lights_on: bool,
    /// Headlight drawn on the train.
    pub headlight_on: bool,
    /// Motion status.
    pub motion: MotionStatus,
    /// Motion status text.
    pub motion_label: &'static str,
    /// Smoke opacity, 0..=1.
    pub smoke_opacity: f32,
    /// Auto-reconnect toggle active.
    pub auto_reconnect: bool,
    /// Settings section expanded.
    pub settings_expanded: bool,
    /// Volume sliders, in channel order.
    pub volumes: [VolumeSlider; 5],
    /// Announcement buttons, in key order.
    pub announcements: [AnnouncementButton; 7],
    /// Animation phase.
    pub phase: Phase,
    /// Train poses for this frame.
    pub train: Frame,
}

/// Everything the card shows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CardView {
    /// No device chosen yet.
    Unconfigured {
        /// Placeholder text.
        message: &'static str,
    },
    /// Full control panel.
    Panel(Box<PanelView>),
}

impl CardView {
    /// The panel, if configured.
    pub fn panel(&self) -> Option<&PanelView> {
        match self {
            CardView::Panel(panel) => Some(panel),
            CardView::Unconfigured { .. } => None,
        }
    }
}

/// Inputs to [`render_panel`].
#[derive(Clone, Copy, Debug)]
pub struct PanelInputs<'a> {
    /// Card title.
    pub title: &'a str,
    /// Projected host state.
    pub view_model: &'a ViewModel,
    /// Optimistic overrides.
    pub echo: &'a LocalEcho,
    /// Settings section expanded.
    pub settings_expanded: bool,
    /// Animation phase.
    pub phase: Phase,
}

/// Build the panel description.
pub fn render_panel(inputs: PanelInputs<'_>, train: Frame) -> PanelView {
    let vm = inputs.view_model;
    let speed = inputs.echo.speed_percent.unwrap_or(vm.speed_percent);
    let forward = inputs.echo.forward.unwrap_or(vm.direction_forward);
    let motion = MotionStatus::from_motion(speed, forward);
    let model = vm.train_model;

    PanelView {
        title: inputs.title.to_string(),
        train_model: model,
        connected: vm.connected,
        connection_label: connection_label(vm.connected),
        speed_percent: speed,
        speed_label: format!("{}%", speed.round() as i32),
        direction_forward: forward,
        lights_on: vm.lights_on,
        headlight_on: vm.lights_on,
        motion,
        motion_label: motion.label(),
        smoke_opacity: smoke_opacity(speed),
        auto_reconnect: vm.auto_reconnect,
        settings_expanded: inputs.settings_expanded,
        volumes: VolumeChannel::ALL.map(|channel| {
            let value = vm.volumes.get(channel);
            VolumeSlider {
                channel,
                label: channel.label(),
                value,
                display: value.round() as u8,
            }
        }),
        announcements: AnnouncementKey::ALL.map(|key| AnnouncementButton {
            key,
            label: model.label(key),
        }),
        phase: inputs.phase,
        train,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::PathAnimator;
    use crate::traits::Ellipse;

    fn frame() -> Frame {
        PathAnimator::new(Ellipse::default()).frame()
    }

    fn inputs<'a>(vm: &'a ViewModel, echo: &'a LocalEcho) -> PanelInputs<'a> {
        PanelInputs {
            title: "Test",
            view_model: vm,
            echo,
            settings_expanded: false,
            phase: Phase::Idle,
        }
    }

    #[test]
    fn motion_thresholds() {
        assert_eq!(MotionStatus::from_motion(0.0, true), MotionStatus::Stopped);
        assert_eq!(MotionStatus::from_motion(0.0, false), MotionStatus::Stopped);
        assert_eq!(MotionStatus::from_motion(29.0, true), MotionStatus::CrawlingForward);
        assert_eq!(MotionStatus::from_motion(30.0, false), MotionStatus::MovingBackward);
        assert_eq!(MotionStatus::from_motion(59.9, true), MotionStatus::MovingForward);
        assert_eq!(MotionStatus::from_motion(60.0, true), MotionStatus::FullSpeedAhead);
        assert_eq!(MotionStatus::FullSpeedReverse.label(), "Full Speed Reverse!");
    }

    #[test]
    fn smoke() {
        assert_eq!(smoke_opacity(0.0), 0.0);
        assert!((smoke_opacity(50.0) - 0.65).abs() < 1e-6);
        assert_eq!(smoke_opacity(100.0), 1.0);
    }

    #[test]
    fn panel_from_view_model() {
        let vm = ViewModel {
            connected: true,
            speed_percent: 44.6,
            lights_on: true,
            train_model: TrainModel::PolarExpress,
            ..ViewModel::default()
        };
        let panel = render_panel(inputs(&vm, &LocalEcho::default()), frame());
        assert_eq!(panel.connection_label, "Connected");
        assert_eq!(panel.speed_label, "45%");
        assert!(panel.headlight_on);
        assert_eq!(panel.motion, MotionStatus::MovingForward);
        assert_eq!(panel.announcements[1].label, "Polar Express");
        assert_eq!(panel.volumes[0].label, "Master");
    }

    #[test]
    fn echo_overrides_view_model() {
        let vm = ViewModel {
            speed_percent: 80.0,
            ..ViewModel::default()
        };
        let echo = LocalEcho {
            speed_percent: Some(0.0),
            forward: Some(false),
        };
        let panel = render_panel(inputs(&vm, &echo), frame());
        assert_eq!(panel.speed_label, "0%");
        assert!(!panel.direction_forward);
        assert_eq!(panel.motion, MotionStatus::Stopped);
    }
}
