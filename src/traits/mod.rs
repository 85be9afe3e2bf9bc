//! Trait definitions for the seams between the card and its host.
//!
//! The card never talks to a browser, a dashboard runtime, or a train
//! directly. Everything outside the crate is reached through these traits:
//!
//! - `host`: outbound service calls ([`HostConnection`], [`ServiceCall`])
//! - `frame`: display-refresh callbacks ([`FrameScheduler`])
//! - `curve`: closed track curves for the animation ([`Curve`])
//!
//! Test doubles for the first two live in [`crate::hal::mock`].

pub mod curve;
pub mod frame;
pub mod host;

pub use curve::*;
pub use frame::*;
pub use host::*;
