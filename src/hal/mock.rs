//! Mock implementations for testing without a dashboard host.
//!
//! This module provides test doubles for the host seams, so the card can be
//! driven end to end from unit tests, doctests, and the `tests/` suite.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockHost`] | [`HostConnection`] | Records every service call |
//! | [`MockScheduler`] | [`FrameScheduler`] | Tracks frame requests and cancellations |
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::{CardConfig, Control, TrainCard};
//! use lionel_train_card::hal::{MockHost, MockScheduler};
//!
//! let config = CardConfig::default().with_device("Polar Express");
//! let mut card: TrainCard<MockHost, MockScheduler> = TrainCard::new(config).unwrap();
//! card.set_host(MockHost::new());
//!
//! card.handle(Control::Horn);
//!
//! let calls = &card.host().unwrap().calls;
//! assert_eq!(calls.len(), 1);
//! assert_eq!(calls[0].entity_id, "button.polar_express_horn");
//! ```
//!
//! [`HostConnection`]: crate::traits::HostConnection
//! [`FrameScheduler`]: crate::traits::FrameScheduler

use crate::traits::{FrameHandle, FrameScheduler, HostConnection, ServiceCall};

// ============================================================================
// Host Mock
// ============================================================================

/// Mock host connection.
///
/// Records every accepted call in order. A failing mock rejects calls and
/// only counts them.
///
/// # Example
///
/// ```rust
/// use lionel_train_card::hal::MockHost;
/// use lionel_train_card::traits::{HostConnection, ServiceCall};
///
/// let mut host = MockHost::new();
/// host.call_service(&ServiceCall::press("button.test_bell")).unwrap();
/// assert_eq!(host.calls.len(), 1);
///
/// let mut broken = MockHost::new().failing();
/// assert!(broken.call_service(&ServiceCall::press("button.test_bell")).is_err());
/// assert_eq!(broken.rejected, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockHost {
    /// Accepted calls, oldest first.
    pub calls: Vec<ServiceCall>,
    /// Number of rejected calls.
    pub rejected: usize,
    /// Whether calls are rejected.
    pub fail: bool,
}

impl MockHost {
    /// Creates a host that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the host reject every call.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Entity ids of the accepted calls.
    pub fn entity_ids(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.entity_id.as_str()).collect()
    }
}

impl HostConnection for MockHost {
    type Error = ();

    fn call_service(&mut self, call: &ServiceCall) -> Result<(), ()> {
        if self.fail {
            self.rejected += 1;
            return Err(());
        }
        self.calls.push(call.clone());
        Ok(())
    }
}

// ============================================================================
// Scheduler Mock
// ============================================================================

/// Mock frame scheduler.
///
/// Hands out increasing handles and tracks which are still outstanding.
/// Tests fire a frame by calling the card's `on_frame` themselves.
///
/// # Example
///
/// ```rust
/// use lionel_train_card::hal::MockScheduler;
/// use lionel_train_card::traits::FrameScheduler;
///
/// let mut scheduler = MockScheduler::new();
/// let handle = scheduler.request_frame();
/// assert!(scheduler.is_pending());
///
/// scheduler.cancel_frame(handle);
/// assert!(!scheduler.is_pending());
/// assert_eq!(scheduler.cancelled, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockScheduler {
    next: u64,
    /// Outstanding handles.
    pub pending: Vec<FrameHandle>,
    /// Number of `request_frame` calls.
    pub requested: usize,
    /// Number of requests withdrawn before they fired.
    pub cancelled: usize,
}

impl MockScheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any frame is outstanding.
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Marks the oldest outstanding frame as delivered.
    ///
    /// Call this before driving the card's frame callback, as a real
    /// scheduler would.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for MockScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() < before {
            self.cancelled += 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_records_in_order() {
        let mut host = MockHost::new();
        host.call_service(&ServiceCall::press("button.a_horn")).unwrap();
        host.call_service(&ServiceCall::toggle("switch.a_lights")).unwrap();
        assert_eq!(host.entity_ids(), vec!["button.a_horn", "switch.a_lights"]);
    }

    #[test]
    fn failing_host_records_nothing() {
        let mut host = MockHost::new().failing();
        assert_eq!(host.call_service(&ServiceCall::press("button.a_bell")), Err(()));
        assert!(host.calls.is_empty());
        assert_eq!(host.rejected, 1);
    }

    #[test]
    fn scheduler_handles_are_unique() {
        let mut s = MockScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        assert_eq!(s.requested, 2);
        assert_eq!(s.fire(), Some(a));
        s.cancel_frame(b);
        assert!(!s.is_pending());
        assert_eq!(s.fire(), None);
    }

    #[test]
    fn cancelling_a_fired_frame_is_a_no_op() {
        let mut s = MockScheduler::new();
        let a = s.request_frame();
        s.fire();
        s.cancel_frame(a);
        assert_eq!(s.cancelled, 0);
    }
}
