//! The single frame loop that drives every animation.
//!
//! The scheduler does not own a thread or a timer. The host calls
//! [`Scheduler::tick`] from its frame callback (`requestAnimationFrame`,
//! a winit redraw, a test loop) and re-arms that callback only while
//! [`TickReport::rearm`] is `true`. Registering into an idle scheduler
//! captures a fresh timestamp, so the first delta after a pause never
//! includes the idle gap.

use rustc_hash::FxHashMap;
use web_time::Instant;

use super::animatable::{Animatable, Tick};
use super::clock::{Clock, SystemClock};

/// Handle returned by [`Scheduler::register`].
///
/// Drawn from a monotonic per-scheduler counter, so an ID is never handed
/// out twice while its animation is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Raw counter value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Outcome of one [`Scheduler::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Milliseconds since the previous tick (or registration).
    pub delta_ms: f64,
    /// Number of animations updated this tick.
    pub updated: usize,
    /// Animations that finished and were unregistered this tick.
    pub finished: Vec<AnimationId>,
    /// Whether the host should schedule another tick.
    pub rearm: bool,
}

impl TickReport {
    /// Whether the animation `id` finished during this tick.
    #[must_use]
    pub fn finished(&self, id: AnimationId) -> bool {
        self.finished.contains(&id)
    }
}

/// Registry of active animations plus the timing state of the loop.
///
/// `order` keeps registration order; `entries` maps IDs to the boxed
/// animations. `last_time` is `Some` exactly while the registry is
/// non-empty, i.e. while the loop is running.
pub struct Scheduler<C: ?Sized> {
    order: Vec<AnimationId>,
    entries: FxHashMap<AnimationId, Box<dyn Animatable<C>>>,
    next_id: u64,
    last_time: Option<Instant>,
    clock: Box<dyn Clock>,
}

impl<C: ?Sized> Scheduler<C> {
    /// Scheduler reading the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Scheduler reading timestamps from `clock`.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            order: Vec::new(),
            entries: FxHashMap::default(),
            next_id: 0,
            last_time: None,
            clock: Box::new(clock),
        }
    }

    /// Add an animation, starting the loop if it was idle.
    pub fn register(
        &mut self,
        animatable: Box<dyn Animatable<C>>,
    ) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        log::debug!("scheduler: register {} as #{}", animatable.name(), id.0);
        self.order.push(id);
        let _ = self.entries.insert(id, animatable);

        if self.last_time.is_none() {
            self.last_time = Some(self.clock.now());
            log::debug!("scheduler: loop started");
        }
        id
    }

    /// Remove an animation. Returns it, or `None` if it was not active.
    ///
    /// Emptying the registry stops the loop: the next tick is a no-op
    /// that does not ask to be re-armed.
    pub fn unregister(
        &mut self,
        id: AnimationId,
    ) -> Option<Box<dyn Animatable<C>>> {
        let index = self.order.iter().position(|&other| other == id)?;
        let _ = self.order.remove(index);
        let removed = self.entries.remove(&id);

        if self.order.is_empty() {
            self.last_time = None;
            log::debug!("scheduler: loop stopped");
        }
        removed
    }

    /// Advance every active animation by the time since the last tick.
    ///
    /// Animations update in reverse registration order over a snapshot of
    /// the registry; those returning [`Tick::Finished`] are removed after
    /// their own update and listed in [`TickReport::finished`].
    pub fn tick(&mut self, ctx: &mut C) -> TickReport {
        let Some(last_time) = self.last_time else {
            return TickReport::default();
        };

        let now = self.clock.now();
        let delta_ms =
            now.saturating_duration_since(last_time).as_secs_f64() * 1000.0;
        self.last_time = Some(now);

        let snapshot = self.order.clone();
        let mut updated = 0;
        let mut finished = Vec::new();
        for id in snapshot.iter().rev() {
            let Some(animatable) = self.entries.get_mut(id) else {
                continue;
            };
            updated += 1;
            if animatable.update(delta_ms, ctx) == Tick::Finished {
                finished.push(*id);
            }
        }

        for &id in &finished {
            let _ = self.unregister(id);
        }

        TickReport {
            delta_ms,
            updated,
            finished,
            rearm: self.is_running(),
        }
    }

    /// Whether the loop is running (at least one animation is active).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.last_time.is_some()
    }

    /// Whether `id` is still registered.
    #[must_use]
    pub fn contains(&self, id: AnimationId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of active animations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no animation is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Active IDs in registration order.
    #[must_use]
    pub fn active(&self) -> &[AnimationId] {
        &self.order
    }
}

impl<C: ?Sized> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self
            .order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|a| a.name()))
            .collect();
        f.debug_struct("Scheduler")
            .field("active", &names)
            .field("next_id", &self.next_id)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
