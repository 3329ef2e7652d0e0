//! Frame scheduling for everything that moves.
//!
//! - [`Scheduler`]: the single loop, ticked by the host's frame callback
//! - [`Animatable`]: the `{start, stop, update}` capability it drives
//! - [`Easing`]: pure progress curves shared by every animation
//! - [`OrientationTransition`]: eased re-orientation of the whole cube

mod animatable;
mod clock;
mod easing;
mod scheduler;
mod transition;

pub use animatable::{Animatable, Tick};
pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::Easing;
pub use scheduler::{AnimationId, Scheduler, TickReport};
pub use transition::OrientationTransition;
