//! Shared card state for the preview bridge.
//!
//! `SharedCardState` wraps a single [`TrainCard`] so the HTTP handlers and the
//! frame loop can drive it from different tasks. The bridge plays the part
//! of the dashboard host: it records outbound service calls instead of
//! talking to a train, and it delivers display frames from a timer.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lionel_train_card::services::SharedCardState;
//!
//! let state = Arc::new(SharedCardState::new(config)?);
//!
//! // Web handlers push state and controls
//! state.push_state(snapshot);
//! state.apply_control(Control::Horn);
//!
//! // The frame loop advances the animation
//! state.tick_frame();
//! ```

use std::convert::Infallible;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::animator::{Frame, FRAME_MS};
use crate::card::{StateChange, TrainCard};
use crate::config::CardConfig;
use crate::controls::Control;
use crate::editor::{CardEditor, DeviceOption};
use crate::state::StateSnapshot;
use crate::traits::{FrameHandle, FrameScheduler, HostConnection, ServiceCall};
use crate::view::CardView;

// ============================================================================
// Bridge Host
// ============================================================================

/// Host connection that keeps outbound calls until they are collected.
#[derive(Debug, Default)]
pub struct BridgeHost {
    outbox: Vec<ServiceCall>,
}

impl BridgeHost {
    /// Remove and return every recorded call, oldest first.
    pub fn drain(&mut self) -> Vec<ServiceCall> {
        std::mem::take(&mut self.outbox)
    }

    /// Number of calls waiting to be collected.
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }
}

impl HostConnection for BridgeHost {
    type Error = Infallible;

    fn call_service(&mut self, call: &ServiceCall) -> Result<(), Infallible> {
        self.outbox.push(call.clone());
        Ok(())
    }
}

// ============================================================================
// Bridge Scheduler
// ============================================================================

/// Frame scheduler fed by a timer.
///
/// Holds at most one outstanding request and remembers when the previous
/// frame fired so each frame reports the real elapsed time.
#[derive(Debug, Default)]
pub struct BridgeScheduler {
    next: u64,
    pending: Option<FrameHandle>,
    last_fired_ms: Option<u64>,
}

impl BridgeScheduler {
    /// Whether a frame has been requested.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deliver the outstanding frame at `now_ms`, returning the elapsed
    /// time since the previous one. `None` if nothing was requested.
    pub fn fire(&mut self, now_ms: u64) -> Option<f32> {
        self.pending.take()?;
        let dt = match self.last_fired_ms {
            Some(last) => now_ms.saturating_sub(last) as f32,
            None => FRAME_MS,
        };
        self.last_fired_ms = Some(now_ms);
        Some(dt)
    }
}

impl FrameScheduler for BridgeScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            // next run starts with a nominal frame, not the idle gap
            self.last_fired_ms = None;
        }
    }
}

/// Card type driven by the bridge.
pub type BridgeCard = TrainCard<BridgeHost, BridgeScheduler>;

// ============================================================================
// Shared Card State
// ============================================================================

/// Thread-safe wrapper around one bridge-driven card and its editor.
///
/// Uses `Mutex` for both; every operation holds a lock only for the
/// duration of one card call.
pub struct SharedCardState {
    card: Mutex<BridgeCard>,
    editor: Mutex<CardEditor>,
    start_time: Instant,
}

impl SharedCardState {
    /// Create a card for `config` with the bridge host and scheduler attached.
    pub fn new(config: CardConfig) -> anyhow::Result<Self> {
        let mut card = BridgeCard::new(config.clone())?;
        card.set_host(BridgeHost::default());
        card.attach(BridgeScheduler::default());
        Ok(Self {
            card: Mutex::new(card),
            editor: Mutex::new(CardEditor::new(config)),
            start_time: Instant::now(),
        })
    }

    /// Milliseconds since the state was created.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    fn card(&self) -> MutexGuard<'_, BridgeCard> {
        self.card.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn editor(&self) -> MutexGuard<'_, CardEditor> {
        self.editor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Access the card with a mutable lock.
    pub fn with_card<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut BridgeCard) -> R,
    {
        f(&mut *self.card())
    }

    /// Current render output.
    pub fn view(&self) -> CardView {
        self.card().render()
    }

    /// Push a host state snapshot to the card and the editor.
    pub fn push_state(&self, snapshot: StateSnapshot) -> StateChange {
        self.editor().set_state(snapshot.clone());
        self.card().set_state(snapshot)
    }

    /// Apply one user control.
    pub fn apply_control(&self, control: Control) {
        self.card().handle(control);
    }

    /// Collect the service calls the card has sent.
    pub fn drain_commands(&self) -> Vec<ServiceCall> {
        self.card()
            .host_mut()
            .map(BridgeHost::drain)
            .unwrap_or_default()
    }

    /// Replace the card configuration.
    pub fn set_config(&self, config: CardConfig) -> anyhow::Result<()> {
        self.card().set_config(config.clone())?;
        self.editor().set_config(config);
        Ok(())
    }

    /// Current configuration.
    pub fn config(&self) -> CardConfig {
        self.card().config().clone()
    }

    /// Trains the editor offers, and its picker entries.
    pub fn devices(&self) -> (Vec<String>, Vec<DeviceOption>) {
        let editor = self.editor();
        (editor.devices(), editor.device_options())
    }

    /// Deliver a display frame if the card asked for one.
    pub fn tick_frame(&self) -> Option<Frame> {
        let now_ms = self.now_ms();
        let mut card = self.card();
        let dt = card.scheduler_mut()?.fire(now_ms)?;
        card.on_frame(dt)
    }
}
