//! The train card: state in, commands out, frames in between.
//!
//! [`TrainCard`] ties the pieces together for one card instance:
//!
//! - the host pushes a [`StateSnapshot`] through [`TrainCard::set_state`];
//!   it is projected into a [`ViewModel`] and the animation follows the
//!   projected speed and direction
//! - user input arrives as [`Control`]s through [`TrainCard::handle`] and
//!   leaves as one service call each through the [`CommandDispatcher`]
//! - the display refresh drives [`TrainCard::on_frame`] while the train is
//!   moving and the card is attached to a [`FrameScheduler`]
//! - [`TrainCard::render`] describes what to draw
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::{CardConfig, StateSnapshot, TrainCard};
//! use lionel_train_card::hal::{MockHost, MockScheduler};
//!
//! let config = CardConfig::default().with_device("Test");
//! let mut card: TrainCard<MockHost, MockScheduler> = TrainCard::new(config).unwrap();
//! card.attach(MockScheduler::new());
//!
//! let snapshot = StateSnapshot::new().with_state("number.test_throttle", "40");
//! card.set_state(snapshot);
//! assert!(card.scheduler().unwrap().is_pending());
//!
//! let before = card.animator().progress();
//! card.on_frame(1000.0 / 60.0);
//! assert!(card.animator().progress() > before);
//! ```

use tracing::{debug, info};

use crate::animator::{consist, Frame, PathAnimator, Phase, Transition};
use crate::config::{CardConfig, Track};
use crate::controls::{slider_value, Control};
use crate::dispatch::CommandDispatcher;
use crate::entity::Device;
use crate::projector::{project_with_previous, ViewModel, MAX_SPEED_PERCENT};
use crate::state::StateSnapshot;
use crate::traits::{FrameHandle, FrameScheduler, HostConnection};
use crate::view::{render_panel, CardView, LocalEcho, PanelInputs, UNCONFIGURED_MESSAGE};

/// Layout height hint reported to the dashboard, in rows.
pub const CARD_SIZE: u32 = 7;

/// What a state push changed, for render layers that cache their output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    /// No device configured; nothing to show.
    Ignored,
    /// Values changed; repaint in place.
    Repaint,
    /// The train model changed; announcement labels must be rebuilt.
    Rebuild,
}

impl StateChange {
    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StateChange::Ignored => "ignored",
            StateChange::Repaint => "repaint",
            StateChange::Rebuild => "rebuild",
        }
    }
}

/// One card instance.
///
/// Generic over the host connection `H` and the display scheduler `S`, both
/// of which are attached after construction.
#[derive(Debug)]
pub struct TrainCard<H: HostConnection, S: FrameScheduler> {
    config: CardConfig,
    device: Option<Device>,
    dispatcher: CommandDispatcher<H>,
    animator: PathAnimator<Track>,
    snapshot: Option<StateSnapshot>,
    view_model: ViewModel,
    echo: LocalEcho,
    settings_expanded: bool,
    scheduler: Option<S>,
    pending_frame: Option<FrameHandle>,
}

impl<H: HostConnection, S: FrameScheduler> TrainCard<H, S> {
    /// Create a card for `config`. The card starts without a host, detached,
    /// idle at progress 0.
    pub fn new(config: CardConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let mut card = Self {
            device: None,
            animator: build_animator(&config),
            config,
            dispatcher: CommandDispatcher::new(),
            snapshot: None,
            view_model: ViewModel::default(),
            echo: LocalEcho::default(),
            settings_expanded: false,
            scheduler: None,
            pending_frame: None,
        };
        card.device = card.configured_device();
        Ok(card)
    }

    /// The configuration the dashboard editor starts from.
    pub fn stub_config() -> CardConfig {
        CardConfig::stub()
    }

    /// Layout height hint.
    pub const fn card_size(&self) -> u32 {
        CARD_SIZE
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Apply a new configuration and re-render from scratch.
    ///
    /// The frame loop is cancelled, the animator is rebuilt at progress 0,
    /// and the last state push is projected again for the new device. An
    /// invalid configuration is rejected and the current one kept.
    pub fn set_config(&mut self, config: CardConfig) -> anyhow::Result<()> {
        config.validate()?;
        self.cancel_pending();
        self.animator = build_animator(&config);
        self.config = config;
        self.device = self.configured_device();
        self.echo = LocalEcho::default();
        self.settings_expanded = false;
        self.view_model = ViewModel::default();
        info!(
            device = %self.config.device,
            track = ?self.config.track,
            "card configured"
        );
        if let Some(snapshot) = self.snapshot.take() {
            self.set_state(snapshot);
        }
        Ok(())
    }

    /// Current configuration.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Device addressed by this card, if one is configured.
    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    fn configured_device(&self) -> Option<Device> {
        self.config
            .has_device()
            .then(|| Device::new(self.config.device.as_str()))
    }

    // ========================================================================
    // Host
    // ========================================================================

    /// Attach (or replace) the host connection.
    pub fn set_host(&mut self, host: H) {
        self.dispatcher.attach(host);
    }

    /// The attached host.
    pub fn host(&self) -> Option<&H> {
        self.dispatcher.host()
    }

    /// The attached host, mutably.
    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.dispatcher.host_mut()
    }

    /// Accept a state push from the host.
    ///
    /// Host state is authoritative: any optimistic echo is dropped. The
    /// animation follows the projected speed and direction, arming or
    /// cancelling the frame loop on phase changes.
    pub fn set_state(&mut self, snapshot: StateSnapshot) -> StateChange {
        let change = match &self.device {
            None => StateChange::Ignored,
            Some(device) => {
                let previous = self.view_model;
                let vm = project_with_previous(&snapshot, device, Some(&previous));
                self.view_model = vm;
                self.echo = LocalEcho::default();

                match self.animator.set_motion(vm.speed_percent, vm.direction_forward) {
                    Transition::Started | Transition::Stopped => self.sync_frame_loop(),
                    Transition::None => {}
                }

                if vm.train_model != previous.train_model {
                    info!(model = vm.train_model.name(), "train model changed");
                    StateChange::Rebuild
                } else {
                    StateChange::Repaint
                }
            }
        };
        self.snapshot = Some(snapshot);
        change
    }

    /// Last state push, if any.
    pub fn snapshot(&self) -> Option<&StateSnapshot> {
        self.snapshot.as_ref()
    }

    /// Projected host state.
    pub fn view_model(&self) -> &ViewModel {
        &self.view_model
    }

    /// Optimistic values shown until the next state push.
    pub fn echo(&self) -> &LocalEcho {
        &self.echo
    }

    // ========================================================================
    // User input
    // ========================================================================

    /// Handle one user control.
    ///
    /// Sends at most one service call. Without a configured device the
    /// control is ignored.
    pub fn handle(&mut self, control: Control) {
        let Some(device) = &self.device else {
            debug!(?control, "no device configured, ignoring control");
            return;
        };
        let call = control.command(device);

        match control {
            Control::Throttle { value } => {
                self.echo.speed_percent = Some(slider_value(value, MAX_SPEED_PERCENT));
            }
            Control::Stop => self.echo.speed_percent = Some(0.0),
            Control::Forward => self.set_local_direction(true),
            Control::Reverse => self.set_local_direction(false),
            Control::ToggleSettings => self.settings_expanded = !self.settings_expanded,
            _ => {}
        }

        if let Some(call) = call {
            self.dispatcher.send(call);
        }
    }

    fn set_local_direction(&mut self, forward: bool) {
        self.echo.forward = Some(forward);
        self.animator.set_direction(forward);
    }

    /// Whether the settings section is expanded.
    pub fn settings_expanded(&self) -> bool {
        self.settings_expanded
    }

    // ========================================================================
    // Display lifecycle
    // ========================================================================

    /// Attach to a display. Arms the frame loop if the train is moving.
    pub fn attach(&mut self, scheduler: S) {
        self.cancel_pending();
        self.scheduler = Some(scheduler);
        self.sync_frame_loop();
    }

    /// Detach from the display, cancelling the frame loop. Progress is kept.
    pub fn detach(&mut self) -> Option<S> {
        self.cancel_pending();
        self.scheduler.take()
    }

    /// Whether the card is attached to a display.
    pub fn is_attached(&self) -> bool {
        self.scheduler.is_some()
    }

    /// The attached scheduler.
    pub fn scheduler(&self) -> Option<&S> {
        self.scheduler.as_ref()
    }

    /// The attached scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> Option<&mut S> {
        self.scheduler.as_mut()
    }

    /// Outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Display refresh callback: `dt_ms` since the previous frame.
    ///
    /// Advances the animation and requests the next frame while running.
    /// A callback with no request outstanding is ignored, so at most one
    /// request is ever in flight. Returns the new poses, or `None` when
    /// idle, detached, or not expecting a frame.
    pub fn on_frame(&mut self, dt_ms: f32) -> Option<Frame> {
        let scheduler = self.scheduler.as_mut()?;
        let Some(handle) = self.pending_frame.take() else {
            debug!("unrequested frame ignored");
            return None;
        };
        // no-op if this is the callback for `handle`
        scheduler.cancel_frame(handle);
        let frame = self.animator.step(dt_ms);
        self.sync_frame_loop();
        frame
    }

    /// Path animator state.
    pub fn animator(&self) -> &PathAnimator<Track> {
        &self.animator
    }

    fn sync_frame_loop(&mut self) {
        let Some(scheduler) = self.scheduler.as_mut() else {
            return;
        };
        let running = self.animator.phase() == Phase::Running;
        match (running, self.pending_frame) {
            (true, None) => {
                self.pending_frame = Some(scheduler.request_frame());
            }
            (false, Some(handle)) => {
                scheduler.cancel_frame(handle);
                self.pending_frame = None;
                debug!("frame loop cancelled");
            }
            _ => {}
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel_frame(handle);
                debug!("frame loop cancelled");
            }
        }
    }

    // ========================================================================
    // Render
    // ========================================================================

    /// Describe what the card shows right now.
    pub fn render(&self) -> CardView {
        if self.device.is_none() {
            return CardView::Unconfigured {
                message: UNCONFIGURED_MESSAGE,
            };
        }
        let inputs = PanelInputs {
            title: self.config.title(),
            view_model: &self.view_model,
            echo: &self.echo,
            settings_expanded: self.settings_expanded,
            phase: self.animator.phase(),
        };
        CardView::Panel(Box::new(render_panel(inputs, self.animator.frame())))
    }
}

impl<H: HostConnection, S: FrameScheduler> Drop for TrainCard<H, S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn build_animator(config: &CardConfig) -> PathAnimator<Track> {
    let tuning = &config.animation;
    PathAnimator::new(config.track.curve())
        .with_step_per_frame(tuning.step_per_frame)
        .with_frame_ms(tuning.frame_ms)
        .with_max_gap_ms(tuning.max_frame_gap_ms)
        .with_consist(consist(tuning.coaches))
}
