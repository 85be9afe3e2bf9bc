//! # lionel-train-card
//!
//! A dashboard control card for Lionel LionChief model trains. The card
//! reads the train's state from the home-automation host, draws a control
//! panel with an animated train, and turns user input into host service
//! calls. The host owns all I/O; the card only projects and dispatches.
//!
//! ## Features
//!
//! - **Entity addressing**: device name + attribute to `category.device_attribute`
//! - **State projection**: typed, defaulting lookups over the host's state bag
//! - **Command dispatch**: one fire-and-forget service call per user action
//! - **Track animation**: progress along a closed curve with true-tangent heading
//! - **Preview bridge**: optional HTTP stand-in for the host (`web` feature)
//!
//! ## Architecture
//!
//! The crate is structured to run and test without a dashboard:
//!
//! - `traits` - Host seams (service calls, frame scheduling, curves)
//! - `entity` / `state` / `projector` - From host state to a view model
//! - `controls` / `dispatch` - From user input to service calls
//! - `animator` - Per-frame path animation
//! - `card` - One card instance tying it all together
//! - `view` - Render output
//! - `hal` - Mock host and scheduler for testing
//!
//! ## Example
//!
//! ```rust
//! use lionel_train_card::{
//!     CardConfig, CardView, Control, StateSnapshot, TrainCard,
//!     hal::{MockHost, MockScheduler},
//! };
//!
//! let config = CardConfig::default().with_device("Polar Express");
//! let mut card: TrainCard<MockHost, MockScheduler> = TrainCard::new(config).unwrap();
//! card.set_host(MockHost::new());
//!
//! // Host pushes state
//! let snapshot = StateSnapshot::new()
//!     .with_state("number.polar_express_throttle", "45")
//!     .with_state("binary_sensor.polar_express_connection", "on");
//! card.set_state(snapshot);
//!
//! let CardView::Panel(panel) = card.render() else { unreachable!() };
//! assert_eq!(panel.speed_label, "45%");
//! assert_eq!(panel.connection_label, "Connected");
//!
//! // User presses the horn
//! card.handle(Control::Horn);
//! assert_eq!(card.host().unwrap().calls[0].entity_id, "button.polar_express_horn");
//! ```

#![warn(missing_docs)]

/// Path animation along a closed curve.
pub mod animator;
/// The card instance: state in, commands out.
pub mod card;
/// Train model catalog and announcement labels.
pub mod catalog;
/// Card, animation and bridge configuration.
pub mod config;
/// User controls and the service call each one sends.
pub mod controls;
/// Fire-and-forget command dispatch to the host.
pub mod dispatch;
/// Configuration editor and device discovery.
pub mod editor;
/// Entity addressing.
pub mod entity;
/// Host seam implementations, including mocks for testing.
pub mod hal;
/// View model projection from host state.
pub mod projector;
/// Explicit card registration.
pub mod registry;
/// Host state snapshot with typed lookups.
pub mod state;
/// Host seams: service calls, frame scheduling, curves.
pub mod traits;
/// Render output.
pub mod view;

/// Wire message types for the preview bridge (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

/// HTTP preview bridge (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use animator::{AnimationState, Frame, PathAnimator, Phase, Pose, Transition};
pub use card::{StateChange, TrainCard, CARD_SIZE};
pub use catalog::{AnnouncementKey, TrainModel};
pub use controls::Control;
pub use dispatch::CommandDispatcher;
pub use editor::{CardEditor, ConfigChanged};
pub use entity::{resolve, Category, Device, EntityKey};
pub use projector::{project, ViewModel, VolumeChannel, Volumes};
pub use registry::{CardInfo, CardRegistry};
pub use state::{EntityState, StateSnapshot};
pub use traits::{
    // Curves
    Curve,
    Ellipse,
    // Host
    FrameHandle,
    FrameScheduler,
    HostConnection,
    Point,
    Service,
    ServiceCall,
    Stadium,
    Vector,
};
pub use view::{CardView, MotionStatus, PanelView};

// Config re-exports
pub use config::{AnimationConfig, CardConfig, TrackShape, WebConfig};

// Message re-exports (for the preview bridge)
#[cfg(feature = "serde")]
pub use messages::{ConfigRequest, ControlRequest};
