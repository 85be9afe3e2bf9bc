//! Card configuration.
//!
//! The dashboard stores one [`CardConfig`] per card: which train to address
//! and an optional title override. The remaining fields choose the track
//! drawn by the animation and tune it; they have sensible defaults and are
//! usually omitted.
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::config::{AnimationConfig, CardConfig, TrackShape};
//!
//! let config = CardConfig::default()
//!     .with_device("Polar Express")
//!     .with_name("Living Room Loop")
//!     .with_track(TrackShape::Stadium)
//!     .with_animation(AnimationConfig::default().with_coaches(4));
//!
//! assert_eq!(config.title(), "Living Room Loop");
//! assert!(config.validate().is_ok());
//! ```

use anyhow::ensure;

use crate::animator::{DEFAULT_MAX_FRAME_GAP_MS, DEFAULT_STEP_PER_FRAME, FRAME_MS, MAX_CARS};
use crate::traits::{Ellipse, Stadium};

/// Largest accepted progress per frame at full speed.
pub const MAX_STEP_PER_FRAME: f32 = 0.05;

// ============================================================================
// Card Config
// ============================================================================

/// Configuration of one card.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CardConfig {
    /// Display name of the train device (e.g. "Polar Express"). Empty means
    /// not yet chosen.
    pub device: String,
    /// Title override; empty or absent shows the device name.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Track drawn by the animation.
    pub track: TrackShape,
    /// Animation tuning.
    pub animation: AnimationConfig,
}

impl CardConfig {
    /// The configuration the dashboard editor starts from.
    pub fn stub() -> Self {
        Self {
            device: String::new(),
            name: Some(String::new()),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// Unknown keys (such as the dashboard's own `type`) are ignored.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        let config: Self = serde_json::from_str(json).context("invalid card configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Set the device name
    pub fn with_device(mut self, device: &str) -> Self {
        self.device = device.to_string();
        self
    }

    /// Set the title override
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the track shape
    pub fn with_track(mut self, track: TrackShape) -> Self {
        self.track = track;
        self
    }

    /// Set the animation tuning
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Whether a device has been chosen.
    ///
    /// Any non-empty name counts, padding included; the name is used for
    /// addressing exactly as configured.
    pub fn has_device(&self) -> bool {
        !self.device.is_empty()
    }

    /// Title shown on the card: the override if non-empty, else the device.
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.device,
        }
    }

    /// Check the configuration.
    ///
    /// Device and title are free text; an empty device is accepted and the
    /// card shows a placeholder until one is chosen. Only the animation
    /// tuning can be out of range.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.animation.validate()
    }
}

// ============================================================================
// Track
// ============================================================================

/// Shape of the animated track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrackShape {
    /// Ellipse filling the card's scene.
    #[default]
    Oval,
    /// Two semicircles joined by straights.
    Stadium,
}

impl TrackShape {
    /// Build the curve for this shape.
    pub fn curve(&self) -> Track {
        match self {
            TrackShape::Oval => Track::Oval(Ellipse::default()),
            TrackShape::Stadium => Track::Stadium(Stadium::default()),
        }
    }
}

/// A concrete track curve chosen by [`TrackShape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Track {
    /// Elliptical track.
    Oval(Ellipse),
    /// Stadium track.
    Stadium(Stadium),
}

impl crate::traits::Curve for Track {
    fn point(&self, t: f32) -> crate::traits::Point {
        match self {
            Track::Oval(c) => c.point(t),
            Track::Stadium(c) => c.point(t),
        }
    }

    fn tangent(&self, t: f32) -> crate::traits::Vector {
        match self {
            Track::Oval(c) => c.tangent(t),
            Track::Stadium(c) => c.tangent(t),
        }
    }
}

// ============================================================================
// Animation Config
// ============================================================================

/// Animation tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationConfig {
    /// Progress per frame at 100% speed.
    pub step_per_frame: f32,
    /// Nominal frame length in milliseconds.
    pub frame_ms: f32,
    /// Longest frame gap honored before clamping.
    pub max_frame_gap_ms: f32,
    /// Coaches behind the tender.
    pub coaches: u8,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_per_frame: DEFAULT_STEP_PER_FRAME,
            frame_ms: FRAME_MS,
            max_frame_gap_ms: DEFAULT_MAX_FRAME_GAP_MS,
            coaches: 3,
        }
    }
}

impl AnimationConfig {
    /// Set the progress per frame at full speed
    pub fn with_step_per_frame(mut self, k: f32) -> Self {
        self.step_per_frame = k;
        self
    }

    /// Set the maximum frame gap
    pub fn with_max_frame_gap_ms(mut self, ms: f32) -> Self {
        self.max_frame_gap_ms = ms;
        self
    }

    /// Set the number of coaches (capped to what the consist can hold)
    pub fn with_coaches(mut self, coaches: u8) -> Self {
        self.coaches = coaches.min((MAX_CARS - 2) as u8);
        self
    }

    /// Check the tuning values.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.step_per_frame > 0.0 && self.step_per_frame <= MAX_STEP_PER_FRAME,
            "step_per_frame must be in (0, {MAX_STEP_PER_FRAME}], got {}",
            self.step_per_frame
        );
        ensure!(
            self.frame_ms > 0.0 && self.max_frame_gap_ms >= self.frame_ms,
            "frame timing must satisfy 0 < frame_ms <= max_frame_gap_ms"
        );
        Ok(())
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Preview bridge configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Interval of the frame loop in milliseconds
    pub frame_interval_ms: u32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
            frame_interval_ms: 16,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Set the frame loop interval
    pub fn with_frame_interval_ms(mut self, ms: u32) -> Self {
        self.frame_interval_ms = ms.max(1);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CardConfig::default();
        assert!(!config.has_device());
        assert_eq!(config.track, TrackShape::Oval);
        assert_eq!(config.animation.step_per_frame, DEFAULT_STEP_PER_FRAME);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stub_is_valid_and_empty() {
        let stub = CardConfig::stub();
        assert_eq!(stub.device, "");
        assert_eq!(stub.name.as_deref(), Some(""));
        assert!(stub.validate().is_ok());
        assert_eq!(stub.title(), "");
    }

    #[test]
    fn title_prefers_name() {
        let config = CardConfig::default().with_device("Polar Express");
        assert_eq!(config.title(), "Polar Express");

        let config = config.with_name("Kids' Train");
        assert_eq!(config.title(), "Kids' Train");

        let config = config.with_name("");
        assert_eq!(config.title(), "Polar Express");
    }

    #[test]
    fn long_name_accepted() {
        let name = "Living Room Loop ".repeat(20);
        let config = CardConfig::default().with_device("Test").with_name(&name);
        assert!(config.validate().is_ok());
        assert_eq!(config.title(), name);
    }

    #[test]
    fn padded_device_is_configured() {
        assert!(CardConfig::default().with_device(" ").has_device());
        assert!(!CardConfig::default().with_device("").has_device());
    }

    #[test]
    fn step_bounds() {
        let bad = AnimationConfig::default().with_step_per_frame(0.0);
        assert!(bad.validate().is_err());
        let bad = AnimationConfig::default().with_step_per_frame(0.5);
        assert!(bad.validate().is_err());
        let ok = AnimationConfig::default().with_step_per_frame(0.0034);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn coaches_capped() {
        assert_eq!(AnimationConfig::default().with_coaches(200).coaches, 6);
    }

    #[test]
    fn frame_gap_must_cover_frame() {
        let bad = AnimationConfig::default().with_max_frame_gap_ms(1.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn web_config_builder() {
        let web = WebConfig::default()
            .with_port(3000)
            .with_cors(false)
            .with_frame_interval_ms(0);
        assert_eq!(web.port, 3000);
        assert!(!web.cors_permissive);
        assert_eq!(web.frame_interval_ms, 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_json_dashboard_shape() {
        let json = r#"{"type": "custom:lionel-train-card", "device": "Polar Express", "name": ""}"#;
        let config = CardConfig::from_json(json).unwrap();
        assert_eq!(config.device, "Polar Express");
        assert_eq!(config.title(), "Polar Express");
        assert_eq!(config.track, TrackShape::Oval);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_json_with_track() {
        let json = r#"{"device": "Test", "track": "stadium", "animation": {"coaches": 1}}"#;
        let config = CardConfig::from_json(json).unwrap();
        assert_eq!(config.track, TrackShape::Stadium);
        assert_eq!(config.animation.coaches, 1);
        assert_eq!(config.animation.step_per_frame, DEFAULT_STEP_PER_FRAME);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_json_errors() {
        assert!(CardConfig::from_json("{").is_err());
        assert!(CardConfig::from_json(r#"{"animation": {"step_per_frame": 2.0}}"#).is_err());
    }
}
