//! The capability every time-varying object implements.

use super::scheduler::{AnimationId, Scheduler};

/// What an [`Animatable`] wants after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Keep receiving updates.
    Continue,
    /// Unregister after this update.
    Finished,
}

/// Anything that receives per-frame time updates from a [`Scheduler`].
///
/// `C` is the shared state the scheduler lends to every update (the cube
/// model in this crate). An update may read and write that state and its
/// own fields; it has no access to the scheduler, so it cannot register or
/// unregister anything else mid-tick. Returning [`Tick::Finished`] is the
/// only way to stop from inside an update.
///
/// See [`LayerRotation`], [`OrientationTransition`] and [`RenderDriver`].
///
/// [`LayerRotation`]: crate::moves::LayerRotation
/// [`OrientationTransition`]: super::OrientationTransition
/// [`RenderDriver`]: crate::engine::RenderDriver
pub trait Animatable<C: ?Sized> {
    /// Advance by `delta_ms` milliseconds of elapsed time.
    fn update(&mut self, delta_ms: f64, ctx: &mut C) -> Tick;

    /// Optional name for debugging/logging.
    fn name(&self) -> &'static str {
        "unnamed"
    }

    /// Register with `scheduler`, starting its loop if it was idle.
    fn start(self, scheduler: &mut Scheduler<C>) -> AnimationId
    where
        Self: Sized + 'static,
    {
        scheduler.register(Box::new(self))
    }

    /// Unregister the animation `id` from `scheduler`.
    ///
    /// Returns `false` if it had already stopped.
    fn stop(id: AnimationId, scheduler: &mut Scheduler<C>) -> bool
    where
        Self: Sized,
    {
        scheduler.unregister(id).is_some()
    }
}
