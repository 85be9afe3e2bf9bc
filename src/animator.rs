//! Path animation: moving the train icon around a closed track.
//!
//! The animation is cosmetic; it never influences what the real train does.
//! What it must get right is that the drawn train travels in the reported
//! direction at a rate proportional to the reported speed, and that its body
//! points along the direction of travel.
//!
//! # Model
//!
//! [`AnimationState`] holds `progress ∈ [0, 1)` along a [`Curve`]. Each display
//! frame advances it by `speed / 100 * K` (forward increases, reverse
//! decreases), wrapping modulo 1. Position is `C(progress)`; heading is the
//! angle of the curve's true tangent, flipped by 180° in reverse.
//!
//! ```text
//!   Idle (progress held) --speed > 0--> Running (progress advancing)
//!        ^                                  |
//!        +------------ speed == 0 ----------+
//! ```
//!
//! # Example
//!
//! ```rust
//! use lionel_train_card::animator::{PathAnimator, Phase, Transition};
//! use lionel_train_card::traits::Ellipse;
//!
//! let mut animator = PathAnimator::new(Ellipse::default());
//! assert_eq!(animator.phase(), Phase::Idle);
//!
//! assert_eq!(animator.set_motion(50.0, true), Transition::Started);
//! let frame = animator.tick().unwrap();
//! assert!(frame.progress > 0.0);
//!
//! assert_eq!(animator.set_motion(0.0, true), Transition::Stopped);
//! assert!(animator.tick().is_none());
//! ```

use heapless::Vec as HVec;
use tracing::debug;

use crate::traits::{normalize_deg, Curve, Point};

/// Maximum number of segments (locomotive, tender, coaches).
pub const MAX_CARS: usize = 8;

/// Default progress per frame at 100% speed (0.2% of the track).
pub const DEFAULT_STEP_PER_FRAME: f32 = 0.002;

/// Nominal display frame length (60 Hz).
pub const FRAME_MS: f32 = 1000.0 / 60.0;

/// Longest frame gap honored by [`PathAnimator::step`]; longer gaps (tab in
/// background, stalled host) are treated as this long.
pub const DEFAULT_MAX_FRAME_GAP_MS: f32 = 250.0;

/// Lag of the tender behind the locomotive.
pub const TENDER_LAG: f32 = 0.045;
/// Lag of the first coach.
pub const FIRST_COACH_LAG: f32 = 0.095;
/// Additional lag per further coach.
pub const COACH_SPACING: f32 = 0.048;

/// Wrap any real value into `[0, 1)`.
///
/// ```
/// use lionel_train_card::animator::wrap;
///
/// assert_eq!(wrap(0.25), 0.25);
/// assert_eq!(wrap(1.25), 0.25);
/// assert_eq!(wrap(-0.25), 0.75);
/// ```
pub fn wrap(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    let mut w = x % 1.0;
    if w < 0.0 {
        w += 1.0;
    }
    // -tiny + 1.0 rounds to exactly 1.0
    if w >= 1.0 {
        w -= 1.0;
    }
    w
}

/// Animation phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    /// Speed is zero; progress is held.
    #[default]
    Idle,
    /// Speed is positive; progress advances every frame.
    Running,
}

/// Phase change caused by [`PathAnimator::set_motion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Phase unchanged.
    None,
    /// Idle to Running: the frame loop should be armed.
    Started,
    /// Running to Idle: the frame loop should be cancelled.
    Stopped,
}

/// Mutable animation state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationState {
    /// Position along the curve, `[0, 1)`.
    pub progress: f32,
    /// Speed, 0..=100.
    pub speed: f32,
    /// Direction of travel.
    pub forward: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            speed: 0.0,
            forward: true,
        }
    }
}

/// Kind of train segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CarKind {
    /// Lead engine.
    Locomotive,
    /// Coal tender.
    Tender,
    /// Passenger coach.
    Coach,
}

/// One segment of the train and its fixed lag behind the locomotive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Car {
    /// Segment kind.
    pub kind: CarKind,
    /// Fraction of the track this segment trails the locomotive by.
    pub lag: f32,
}

/// The segments of a train.
pub type Consist = HVec<Car, MAX_CARS>;

/// Locomotive, tender and up to `coaches` coaches (capped by [`MAX_CARS`]).
pub fn consist(coaches: u8) -> Consist {
    let mut cars = Consist::new();
    let _ = cars.push(Car {
        kind: CarKind::Locomotive,
        lag: 0.0,
    });
    let _ = cars.push(Car {
        kind: CarKind::Tender,
        lag: TENDER_LAG,
    });
    for i in 0..coaches {
        let car = Car {
            kind: CarKind::Coach,
            lag: FIRST_COACH_LAG + COACH_SPACING * f32::from(i),
        };
        if cars.push(car).is_err() {
            break;
        }
    }
    cars
}

/// Position and heading at one point of the track.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    /// Position on the track plane.
    pub position: Point,
    /// Heading in degrees, `[0, 360)`, along the direction of travel.
    pub heading_deg: f32,
}

/// Pose of one train segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarPose {
    /// Segment kind.
    pub kind: CarKind,
    /// Curve parameter of this segment.
    pub progress: f32,
    /// Where it is and where it points.
    pub pose: Pose,
}

/// Everything needed to draw the train for one frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Locomotive progress.
    pub progress: f32,
    /// One pose per segment, locomotive first.
    pub cars: HVec<CarPose, MAX_CARS>,
}

impl Frame {
    /// Pose of the locomotive.
    pub fn lead(&self) -> Option<&Pose> {
        self.cars.first().map(|c| &c.pose)
    }
}

/// Steps [`AnimationState`] along a curve once per display frame.
#[derive(Clone, Debug)]
pub struct PathAnimator<C: Curve> {
    curve: C,
    state: AnimationState,
    step_per_frame: f32,
    frame_ms: f32,
    max_gap_ms: f32,
    cars: Consist,
}

impl<C: Curve> PathAnimator<C> {
    /// Create an idle animator at progress 0 with a locomotive and tender.
    pub fn new(curve: C) -> Self {
        Self {
            curve,
            state: AnimationState::default(),
            step_per_frame: DEFAULT_STEP_PER_FRAME,
            frame_ms: FRAME_MS,
            max_gap_ms: DEFAULT_MAX_FRAME_GAP_MS,
            cars: consist(0),
        }
    }

    /// Set the progress per frame at 100% speed (the constant `K`).
    pub fn with_step_per_frame(mut self, k: f32) -> Self {
        self.step_per_frame = k;
        self
    }

    /// Set the nominal frame length used to scale [`step`](Self::step).
    pub fn with_frame_ms(mut self, ms: f32) -> Self {
        if ms > 0.0 {
            self.frame_ms = ms;
        }
        self
    }

    /// Set the longest frame gap honored by [`step`](Self::step).
    pub fn with_max_gap_ms(mut self, ms: f32) -> Self {
        self.max_gap_ms = ms.max(0.0);
        self
    }

    /// Replace the train segments.
    pub fn with_consist(mut self, cars: Consist) -> Self {
        self.cars = cars;
        self
    }

    /// The track curve.
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Current animation state.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Current progress, `[0, 1)`.
    pub fn progress(&self) -> f32 {
        self.state.progress
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.state.speed > 0.0 {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Train segments.
    pub fn cars(&self) -> &Consist {
        &self.cars
    }

    /// Update speed and direction; reports the resulting phase change.
    ///
    /// Speed is clamped to `0..=100`; NaN counts as 0. Progress is untouched.
    pub fn set_motion(&mut self, speed: f32, forward: bool) -> Transition {
        let before = self.phase();
        self.state.speed = if speed.is_nan() { 0.0 } else { speed.clamp(0.0, 100.0) };
        self.state.forward = forward;
        match (before, self.phase()) {
            (Phase::Idle, Phase::Running) => {
                debug!(speed = self.state.speed, forward, "animation started");
                Transition::Started
            }
            (Phase::Running, Phase::Idle) => {
                debug!(progress = self.state.progress, "animation stopped");
                Transition::Stopped
            }
            _ => Transition::None,
        }
    }

    /// Change direction only.
    pub fn set_direction(&mut self, forward: bool) {
        self.state.forward = forward;
    }

    /// Signed progress change for one nominal frame.
    pub fn delta_per_frame(&self) -> f32 {
        let magnitude = self.state.speed / 100.0 * self.step_per_frame;
        if self.state.forward {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Advance by exactly one display frame.
    ///
    /// Returns `None` while idle; progress and position are held.
    pub fn tick(&mut self) -> Option<Frame> {
        self.advance(1.0)
    }

    /// Advance by the elapsed time since the previous frame.
    ///
    /// The step is scaled by `dt_ms` over the nominal frame length so the on-screen speed does
    /// not depend on the refresh rate. Gaps longer than the configured
    /// maximum are clamped.
    pub fn step(&mut self, dt_ms: f32) -> Option<Frame> {
        let dt = if dt_ms.is_nan() { 0.0 } else { dt_ms.clamp(0.0, self.max_gap_ms) };
        self.advance(dt / self.frame_ms)
    }

    fn advance(&mut self, frames: f32) -> Option<Frame> {
        if self.phase() == Phase::Idle {
            return None;
        }
        self.state.progress = wrap(self.state.progress + self.delta_per_frame() * frames);
        Some(self.frame())
    }

    /// Poses for the current progress, without advancing.
    pub fn frame(&self) -> Frame {
        let mut cars = HVec::new();
        for car in &self.cars {
            let t = wrap(self.state.progress - car.lag);
            let _ = cars.push(CarPose {
                kind: car.kind,
                progress: t,
                pose: self.pose_at(t),
            });
        }
        Frame {
            progress: self.state.progress,
            cars,
        }
    }

    /// Position and heading at parameter `t` for the current direction.
    pub fn pose_at(&self, t: f32) -> Pose {
        let t = wrap(t);
        let mut heading = self.curve.tangent(t).angle_deg();
        if !self.state.forward {
            heading = normalize_deg(heading + 180.0);
        }
        Pose {
            position: self.curve.point(t),
            heading_deg: heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Ellipse;

    #[test]
    fn wrap_range() {
        for x in [-2.5_f32, -1.0, -0.0001, 0.0, 0.5, 0.9999, 1.0, 3.75] {
            let w = wrap(x);
            assert!((0.0..1.0).contains(&w), "wrap({x}) = {w}");
        }
        assert_eq!(wrap(f32::NAN), 0.0);
        assert_eq!(wrap(-f32::EPSILON * 0.01), 0.0);
    }

    #[test]
    fn idle_holds_progress() {
        let mut a = PathAnimator::new(Ellipse::default());
        assert!(a.tick().is_none());
        assert_eq!(a.progress(), 0.0);
    }

    #[test]
    fn forward_increases_reverse_decreases() {
        let mut a = PathAnimator::new(Ellipse::default());
        a.set_motion(100.0, true);
        a.tick();
        assert!((a.progress() - DEFAULT_STEP_PER_FRAME).abs() < 1e-6);

        a.set_motion(100.0, false);
        a.tick();
        a.tick();
        assert!((a.progress() - (1.0 - DEFAULT_STEP_PER_FRAME)).abs() < 1e-5);
    }

    #[test]
    fn step_scales_with_elapsed_time() {
        let mut a = PathAnimator::new(Ellipse::default());
        a.set_motion(50.0, true);
        a.step(FRAME_MS * 2.0);
        assert!((a.progress() - DEFAULT_STEP_PER_FRAME).abs() < 1e-6);
    }

    #[test]
    fn step_clamps_long_gaps() {
        let mut a = PathAnimator::new(Ellipse::default()).with_max_gap_ms(100.0);
        a.set_motion(100.0, true);
        a.step(10_000.0);
        let expected = DEFAULT_STEP_PER_FRAME * (100.0 / FRAME_MS);
        assert!((a.progress() - expected).abs() < 1e-5);
    }

    #[test]
    fn speed_clamped() {
        let mut a = PathAnimator::new(Ellipse::default());
        a.set_motion(250.0, true);
        assert_eq!(a.state().speed, 100.0);
        assert_eq!(a.set_motion(-3.0, true), Transition::Stopped);
        assert_eq!(a.set_motion(f32::NAN, true), Transition::None);
        assert_eq!(a.phase(), Phase::Idle);
    }

    #[test]
    fn reverse_flips_heading() {
        let mut a = PathAnimator::new(Ellipse::new(2.0, 1.0));
        a.set_motion(10.0, true);
        let fwd = a.pose_at(0.2).heading_deg;
        a.set_direction(false);
        let rev = a.pose_at(0.2).heading_deg;
        assert!((normalize_deg(rev - fwd) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn consist_lags() {
        let cars = consist(3);
        assert_eq!(cars.len(), 5);
        assert_eq!(cars[0].lag, 0.0);
        assert_eq!(cars[1].lag, TENDER_LAG);
        assert!((cars[4].lag - (FIRST_COACH_LAG + 2.0 * COACH_SPACING)).abs() < 1e-6);
    }

    #[test]
    fn consist_capped() {
        assert_eq!(consist(50).len(), MAX_CARS);
    }

    #[test]
    fn trailing_cars_wrap() {
        let a = PathAnimator::new(Ellipse::default()).with_consist(consist(1));
        let frame = a.frame();
        assert_eq!(frame.cars.len(), 3);
        assert_eq!(frame.cars[0].progress, 0.0);
        assert!((frame.cars[1].progress - (1.0 - TENDER_LAG)).abs() < 1e-6);
        assert!((frame.cars[2].progress - (1.0 - FIRST_COACH_LAG)).abs() < 1e-6);
    }
}
