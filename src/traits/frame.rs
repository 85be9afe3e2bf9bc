//! Display-refresh scheduling.
//!
//! The animation advances once per rendered frame. A [`FrameScheduler`] is
//! the card's handle on the rendering surface's refresh callback: the card
//! asks for the next frame, and the host later calls
//! [`TrainCard::on_frame`](crate::card::TrainCard::on_frame) when it fires.
//! One request yields one callback; the card re-requests after every frame
//! it consumes, so cancelling the outstanding handle stops the loop.

/// Opaque handle of a pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of display-refresh callbacks.
pub trait FrameScheduler {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending request. Cancelling a handle that already fired
    /// is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}
