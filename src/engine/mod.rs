//! The facade a host embeds: one cube, one frame loop, one move queue.

mod accessors;
mod render;

use glam::Quat;

pub use self::render::{
    Frame, InstanceKind, InstanceRaw, MeshInstance, RenderBackend,
    RenderDriver,
};
use crate::animation::{
    Animatable, AnimationId, Clock, OrientationTransition, Scheduler,
    SystemClock,
};
use crate::cube::{Axis, Cube, CubeState, MIN_SIZE};
use crate::error::{CubeError, LoadError};
use crate::moves::{Abort, CompletedMove, Move, MoveController, MoveRequest};
use crate::options::Options;

/// Callback fired once per committed move, after the cube is back on the
/// grid.
pub type MoveListener = Box<dyn FnMut(&CompletedMove, &Cube)>;

/// The cube simulation behind one interactive puzzle.
///
/// Owns the only [`Scheduler`] (so at most one frame loop ever runs), the
/// [`Cube`] model and the [`MoveController`] that serializes turns.
///
/// # Frame loop
///
/// The host calls [`frame`](Self::frame) from its frame callback and keeps
/// calling it while it returns `true`. Nothing moves between calls.
///
/// # Moves
///
/// [`request_move`](Self::request_move) validates and queues a turn;
/// listeners registered with [`on_move_completed`](Self::on_move_completed)
/// hear about every commit, animated or not.
///
/// # Rendering
///
/// The engine draws nothing. [`attach_renderer`](Self::attach_renderer)
/// installs a [`RenderDriver`] that hands a [`Frame`] of mesh instances to
/// the host's [`RenderBackend`] on every scheduler tick.
pub struct CubeEngine {
    pub(crate) cube: Cube,
    pub(crate) scheduler: Scheduler<Cube>,
    pub(crate) moves: MoveController,
    pub(crate) options: Options,
    orientation_anim: Option<AnimationId>,
    render_driver: Option<AnimationId>,
    listeners: Vec<MoveListener>,
}

impl CubeEngine {
    /// Engine on the wall clock with a solved cube built from `options`.
    ///
    /// # Errors
    ///
    /// [`CubeError::InvalidSize`] if `options.cube.size < 2`.
    pub fn new(options: Options) -> Result<Self, CubeError> {
        Self::with_clock(options, SystemClock)
    }

    /// Engine whose scheduler reads time from `clock`.
    ///
    /// # Errors
    ///
    /// [`CubeError::InvalidSize`] if `options.cube.size < 2`.
    pub fn with_clock(
        options: Options,
        clock: impl Clock + 'static,
    ) -> Result<Self, CubeError> {
        let cube = Cube::initialized(&options.cube, options.colors.clone())?;
        let moves = MoveController::new(&options.animation);
        Ok(Self {
            cube,
            scheduler: Scheduler::with_clock(clock),
            moves,
            options,
            orientation_anim: None,
            render_driver: None,
            listeners: Vec::new(),
        })
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Run one scheduler tick and settle its consequences: start the next
    /// queued move, notify listeners.
    ///
    /// Returns whether the host should schedule another frame.
    pub fn frame(&mut self) -> bool {
        let report = self.scheduler.tick(&mut self.cube);
        self.moves
            .on_tick(&report, &mut self.cube, &mut self.scheduler);
        if self.orientation_anim.is_some_and(|id| report.finished(id)) {
            self.orientation_anim = None;
        }
        self.notify();
        self.scheduler.is_running()
    }

    // =========================================================================
    // Moves
    // =========================================================================

    /// Turn `layer` on `axis` by `direction` quarter turns.
    ///
    /// # Errors
    ///
    /// [`CubeError::ZeroTurns`] or [`CubeError::LayerOutOfRange`]; the
    /// request is not queued.
    pub fn request_move(
        &mut self,
        axis: Axis,
        layer: usize,
        direction: i32,
        animated: bool,
    ) -> Result<(), CubeError> {
        self.request(MoveRequest {
            mv: Move::new(axis, layer, direction),
            animated,
        })
    }

    /// Queue `request`. Instant moves reached without waiting are applied
    /// and announced before this returns.
    ///
    /// # Errors
    ///
    /// See [`request_move`](Self::request_move).
    pub fn request(&mut self, request: MoveRequest) -> Result<(), CubeError> {
        self.moves
            .request(request, &mut self.cube, &mut self.scheduler)?;
        self.notify();
        Ok(())
    }

    /// End the animating move now. Queued moves carry on.
    pub fn abort_move(&mut self, how: Abort) -> Option<Move> {
        let aborted = self
            .moves
            .abort(how, &mut self.cube, &mut self.scheduler);
        self.notify();
        aborted
    }

    /// Roll back the animating move and drop the queue.
    pub fn cancel_moves(&mut self) -> usize {
        self.moves.cancel_all(&mut self.cube, &mut self.scheduler)
    }

    /// Register a callback for every committed move.
    pub fn on_move_completed(
        &mut self,
        listener: impl FnMut(&CompletedMove, &Cube) + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        let completed = self.moves.take_completed();
        for done in &completed {
            log::debug!("engine: move #{} {} committed", done.sequence, done.mv);
            for listener in &mut self.listeners {
                listener(done, &self.cube);
            }
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Rebuild at `new_size`, solved. Pending moves are cancelled first.
    ///
    /// Returns whether the cube was regenerated.
    ///
    /// # Errors
    ///
    /// [`CubeError::InvalidSize`]; nothing changes.
    pub fn resize(&mut self, new_size: usize) -> Result<bool, CubeError> {
        if new_size < MIN_SIZE {
            return Err(CubeError::InvalidSize(new_size));
        }
        if new_size == self.cube.size() && self.cube.is_ready() {
            return Ok(false);
        }
        self.settle();
        self.options.cube.size = new_size;
        self.cube.resize(new_size)
    }

    /// Replace the puzzle with `data`. Pending moves are cancelled once the
    /// payload has been validated.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`]; the puzzle and the move queue are untouched.
    pub fn load_from_data(&mut self, data: &CubeState) -> Result<(), LoadError> {
        let _ = data.validate()?;
        self.settle();
        self.cube.load_from_data(data)?;
        self.options.cube.size = data.size;
        Ok(())
    }

    /// Committed pose of every piece.
    ///
    /// # Errors
    ///
    /// [`CubeError::NotReady`] before the model is built.
    pub fn serialize_state(&self) -> Result<CubeState, CubeError> {
        self.cube.serialize_state()
    }

    /// Stop everything that would keep writing to the cube across a
    /// rebuild.
    fn settle(&mut self) {
        let _ = self.cancel_moves();
        if let Some(id) = self.orientation_anim.take() {
            let _ = OrientationTransition::stop(id, &mut self.scheduler);
        }
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Ease the whole cube to `target` over the configured orientation
    /// duration, replacing any orientation change in progress.
    pub fn animate_orientation(&mut self, target: Quat) -> AnimationId {
        if let Some(id) = self.orientation_anim.take() {
            let _ = OrientationTransition::stop(id, &mut self.scheduler);
        }
        let anim = &self.options.animation;
        let id = OrientationTransition::new(
            self.cube.orientation().holder,
            target,
            anim.orientation_duration_ms,
            anim.orientation_easing,
        )
        .start(&mut self.scheduler);
        self.orientation_anim = Some(id);
        id
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Feed `backend` from the frame loop, replacing any previous renderer.
    pub fn attach_renderer(&mut self, backend: Box<dyn RenderBackend>) {
        let _ = self.detach_renderer();
        let driver =
            RenderDriver::new(backend, self.options.animation.target_fps);
        self.render_driver = Some(driver.start(&mut self.scheduler));
        log::info!("engine: renderer attached");
    }

    /// Stop feeding the renderer. Returns `false` if none was attached.
    pub fn detach_renderer(&mut self) -> bool {
        self.render_driver
            .take()
            .is_some_and(|id| RenderDriver::stop(id, &mut self.scheduler))
    }
}

impl std::fmt::Debug for CubeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubeEngine")
            .field("size", &self.cube.size())
            .field("moves", &self.moves.state())
            .field("scheduler", &self.scheduler)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    use super::*;
    use crate::animation::ManualClock;
    use crate::cube::test_support::cube;

    fn engine(size: usize) -> (CubeEngine, ManualClock) {
        let clock = ManualClock::new();
        let mut options = Options::default();
        options.cube.size = size;
        let engine = CubeEngine::with_clock(options, clock.clone()).unwrap();
        (engine, clock)
    }

    fn run(engine: &mut CubeEngine, clock: &ManualClock) -> usize {
        let mut frames = 0;
        loop {
            clock.advance_ms(16.0);
            frames += 1;
            if !engine.frame() {
                return frames;
            }
            assert!(frames < 10_000, "frame loop never settled");
        }
    }

    fn recorder(engine: &mut CubeEngine) -> Rc<RefCell<Vec<Move>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.on_move_completed(move |done, cube| {
            assert!(cube.coordinates_form_grid());
            sink.borrow_mut().push(done.mv);
        });
        seen
    }

    #[test]
    fn test_rejects_small_cube() {
        let mut options = Options::default();
        options.cube.size = 1;
        assert_eq!(
            CubeEngine::new(options).unwrap_err(),
            CubeError::InvalidSize(1)
        );
    }

    #[test]
    fn test_animated_moves_notify_in_order() {
        let (mut engine, clock) = engine(3);
        let seen = recorder(&mut engine);

        engine.request_move(Axis::Y, 2, 1, true).unwrap();
        engine.request_move(Axis::X, 0, -1, true).unwrap();
        assert!(seen.borrow().is_empty());

        let frames = run(&mut engine, &clock);
        // Two 200 ms turns at 16 ms per frame.
        assert!((24..=28).contains(&frames), "{frames}");
        assert_eq!(
            *seen.borrow(),
            vec![Move::new(Axis::Y, 2, 1), Move::new(Axis::X, 0, -1)]
        );
        assert!(!engine.frame());
    }

    #[test]
    fn test_instant_move_notifies_synchronously() {
        let (mut engine, _clock) = engine(2);
        let seen = recorder(&mut engine);
        engine.request_move(Axis::Z, 1, 2, false).unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert!(!engine.scheduler().is_running());
        assert!(!engine.cube().is_solved());
    }

    #[test]
    fn test_invalid_request_leaves_engine_idle() {
        let (mut engine, _clock) = engine(3);
        assert_eq!(
            engine.request_move(Axis::X, 7, 1, true),
            Err(CubeError::LayerOutOfRange { layer: 7, size: 3 })
        );
        assert!(engine.is_idle());
    }

    #[test]
    fn test_abort_commit_notifies() {
        let (mut engine, clock) = engine(3);
        let seen = recorder(&mut engine);
        engine.request_move(Axis::Y, 0, 1, true).unwrap();
        clock.advance_ms(50.0);
        assert!(engine.frame());

        assert_eq!(
            engine.abort_move(Abort::Commit),
            Some(Move::new(Axis::Y, 0, 1))
        );
        assert_eq!(seen.borrow().len(), 1);
        assert!(!engine.frame());
    }

    #[test]
    fn test_load_cancels_pending_moves() {
        let (mut engine, clock) = engine(3);
        let mut scrambled = cube(3);
        for mv in Move::parse_sequence("y2+ x0- z1+2").unwrap() {
            scrambled.apply_move(mv).unwrap();
        }
        let saved = scrambled.serialize_state().unwrap();

        engine.request_move(Axis::X, 1, 1, true).unwrap();
        engine.request_move(Axis::X, 2, 1, true).unwrap();
        clock.advance_ms(40.0);
        let _ = engine.frame();

        engine.load_from_data(&saved).unwrap();
        assert!(engine.is_idle());
        assert_eq!(engine.pending_moves(), 0);
        // Euler triples are not unique at gimbal lock; compare placements.
        let loaded = engine.serialize_state().unwrap();
        assert_eq!(loaded.validate().unwrap(), saved.validate().unwrap());
        assert!(!engine.frame());
    }

    #[test]
    fn test_rejected_load_keeps_queue() {
        let (mut engine, _clock) = engine(3);
        engine.request_move(Axis::X, 1, 1, true).unwrap();
        engine.request_move(Axis::X, 2, 1, true).unwrap();

        let mut bad = engine.serialize_state().unwrap();
        let _ = bad.names.swap_remove(0);
        assert!(engine.load_from_data(&bad).is_err());
        assert!(!engine.is_idle());
        assert_eq!(engine.pending_moves(), 1);
    }

    #[test]
    fn test_resize_rebuilds_solved() {
        let (mut engine, _clock) = engine(3);
        engine.request_move(Axis::Y, 2, 1, true).unwrap();

        assert_eq!(engine.resize(3), Ok(false));
        assert!(!engine.is_idle());

        assert_eq!(engine.resize(5), Ok(true));
        assert!(engine.is_idle());
        assert_eq!(engine.cube().pieces().len(), 125);
        assert!(engine.cube().is_solved());
        assert_eq!(engine.options().cube.size, 5);
        assert_eq!(engine.resize(1), Err(CubeError::InvalidSize(1)));
    }

    #[test]
    fn test_orientation_animation_runs_to_target() {
        let (mut engine, clock) = engine(3);
        let target = Quat::from_rotation_y(FRAC_PI_2);
        let _ = engine.animate_orientation(target);
        let frames = run(&mut engine, &clock);
        assert!((50..=51).contains(&frames), "{frames}");
        assert!(engine.cube().orientation().holder.angle_between(target) < 1e-5);
    }

    #[test]
    fn test_renderer_keeps_loop_alive_until_detached() {
        struct Count(Rc<RefCell<usize>>);
        impl RenderBackend for Count {
            fn render(&mut self, frame: &Frame) {
                assert_eq!(frame.instances.len(), 27 + 54);
                *self.0.borrow_mut() += 1;
            }
        }

        let (mut engine, clock) = engine(3);
        let count = Rc::new(RefCell::new(0));
        engine.attach_renderer(Box::new(Count(Rc::clone(&count))));
        for _ in 0..5 {
            clock.advance_ms(16.0);
            assert!(engine.frame());
        }
        assert_eq!(*count.borrow(), 5);

        assert!(engine.detach_renderer());
        assert!(!engine.detach_renderer());
        assert!(!engine.frame());
    }
}
