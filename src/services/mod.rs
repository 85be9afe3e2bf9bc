//! Preview bridge: an HTTP stand-in for the dashboard host.
//!
//! This module lets the card run outside a dashboard:
//! - `shared`: one `TrainCard` behind a `Mutex`, with a host that records
//!   service calls and a timer-fed frame scheduler
//! - `api`: JSON request and response types
//! - `web`: Axum router, frame loop and server
//!
//! # Shared State Pattern
//!
//! The HTTP handlers and the frame loop share a single card through
//! `Arc<SharedCardState>`:
//!
//! ```ignore
//! use std::sync::Arc;
//! use lionel_train_card::services::{build_router, spawn_frame_loop, SharedCardState};
//!
//! let state = Arc::new(SharedCardState::new(config)?);
//! spawn_frame_loop(Arc::clone(&state), web_config.frame_interval);
//! let router = build_router(state, &web_config);
//! ```

pub mod api;
pub mod shared;
pub mod web;

// Re-exports
pub use api::*;
pub use shared::*;
pub use web::*;
