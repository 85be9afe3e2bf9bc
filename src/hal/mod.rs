//! Host seam implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] that are not tied to a particular host.
//!
//! # Available Implementations
//!
//! - `mock`: Recording doubles for tests and doctests

pub mod mock;

pub use mock::*;
