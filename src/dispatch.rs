//! Command dispatch to the host.
//!
//! [`CommandDispatcher`] turns card actions into [`ServiceCall`]s and hands
//! them to the attached [`HostConnection`]. Every call is fire-and-forget:
//! exactly one outbound call per operation, in the order operations are
//! made, with no batching, retry, or deduplication.
//!
//! When no host is attached the call is dropped. It is not queued and no
//! error reaches the caller; the drop is only logged.
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::dispatch::CommandDispatcher;
//! use lionel_train_card::hal::MockHost;
//!
//! let mut dispatcher = CommandDispatcher::new();
//! dispatcher.press("button.test_horn"); // no host yet: dropped
//!
//! dispatcher.attach(MockHost::new());
//! dispatcher.press("button.test_horn");
//!
//! let host = dispatcher.host().unwrap();
//! assert_eq!(host.calls.len(), 1);
//! assert_eq!(host.calls[0].entity_id, "button.test_horn");
//! ```

use tracing::{debug, warn};

use crate::traits::{HostConnection, ServiceCall};

/// Sends service calls to an optional host.
#[derive(Debug)]
pub struct CommandDispatcher<H: HostConnection> {
    host: Option<H>,
}

impl<H: HostConnection> Default for CommandDispatcher<H> {
    fn default() -> Self {
        Self { host: None }
    }
}

impl<H: HostConnection> CommandDispatcher<H> {
    /// Create a dispatcher with no host attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with a host attached.
    pub fn with_host(host: H) -> Self {
        Self { host: Some(host) }
    }

    /// Attach (or replace) the host connection.
    pub fn attach(&mut self, host: H) {
        self.host = Some(host);
    }

    /// Whether a host is attached.
    pub fn is_attached(&self) -> bool {
        self.host.is_some()
    }

    /// The attached host.
    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// The attached host, mutably.
    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    /// `number.set_value` (throttle, volumes).
    pub fn set_value(&mut self, entity_id: &str, value: f32) {
        self.send(ServiceCall::set_value(entity_id, value));
    }

    /// `button.press` (momentary actions).
    pub fn press(&mut self, entity_id: &str) {
        self.send(ServiceCall::press(entity_id));
    }

    /// `switch.toggle` (lights, auto-reconnect).
    pub fn toggle(&mut self, entity_id: &str) {
        self.send(ServiceCall::toggle(entity_id));
    }

    /// Send a prepared call.
    pub fn send(&mut self, call: ServiceCall) {
        let Some(host) = self.host.as_mut() else {
            debug!(%call, "no host attached, dropping command");
            return;
        };
        match host.call_service(&call) {
            Ok(()) => debug!(%call, "dispatched"),
            Err(e) => warn!(%call, error = ?e, "host rejected command"),
        }
    }
}
