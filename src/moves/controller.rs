//! The move state machine: `idle → animating → idle`.
//!
//! Requests are validated on arrival and queued FIFO. At most one layer is
//! ever in flight, because two turning layers can share pieces. An
//! instantaneous request never jumps ahead of an animated one: it waits in
//! the queue and is applied synchronously once its turn comes.

use std::collections::VecDeque;

use super::{LayerRotation, Move, MoveRequest};
use crate::animation::{Animatable, AnimationId, Easing, Scheduler, TickReport};
use crate::cube::Cube;
use crate::error::CubeError;
use crate::options::AnimationOptions;

/// Where the state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveState {
    /// No layer is turning.
    Idle,
    /// One layer is turning.
    Animating {
        /// The move in flight.
        mv: Move,
        /// Its [`LayerRotation`] in the scheduler.
        id: AnimationId,
    },
}

/// How to end a move that is still animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    /// Snap to the target angle and commit the move.
    Commit,
    /// Snap back to the starting angle; the move never happened.
    Rollback,
}

/// Notification emitted each time a move has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedMove {
    /// The committed move.
    pub mv: Move,
    /// Whether it was animated.
    pub animated: bool,
    /// Running count of committed moves since the controller was created.
    pub sequence: u64,
}

/// Serializes move requests and drives one [`LayerRotation`] at a time.
#[derive(Debug)]
pub struct MoveController {
    state: MoveState,
    queue: VecDeque<MoveRequest>,
    completed: Vec<CompletedMove>,
    committed: u64,
    duration_ms: f64,
    easing: Easing,
}

impl MoveController {
    /// Idle controller using the turn timing from `options`.
    #[must_use]
    pub fn new(options: &AnimationOptions) -> Self {
        Self {
            state: MoveState::Idle,
            queue: VecDeque::new(),
            completed: Vec::new(),
            committed: 0,
            duration_ms: options.turn_duration_ms,
            easing: options.turn_easing,
        }
    }

    /// Change the turn timing. Applies from the next move started.
    pub fn set_timing(&mut self, duration_ms: f64, easing: Easing) {
        self.duration_ms = duration_ms;
        self.easing = easing;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MoveState {
        self.state
    }

    /// Whether no move is animating.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == MoveState::Idle
    }

    /// Number of queued requests (excluding the one in flight).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Validate `request` and queue it, starting it at once if idle.
    ///
    /// # Errors
    ///
    /// [`CubeError::NotReady`], [`CubeError::ZeroTurns`] or
    /// [`CubeError::LayerOutOfRange`]; nothing is queued.
    pub fn request(
        &mut self,
        request: MoveRequest,
        cube: &mut Cube,
        scheduler: &mut Scheduler<Cube>,
    ) -> Result<(), CubeError> {
        if !cube.is_ready() {
            return Err(CubeError::NotReady);
        }
        request.mv.validate(cube.size())?;
        self.queue.push_back(request);
        self.pump(cube, scheduler);
        Ok(())
    }

    /// React to a scheduler tick: if the move in flight finished, record it
    /// and start the next queued one.
    pub fn on_tick(
        &mut self,
        report: &TickReport,
        cube: &mut Cube,
        scheduler: &mut Scheduler<Cube>,
    ) {
        let MoveState::Animating { mv, id } = self.state else {
            return;
        };
        if !report.finished(id) {
            return;
        }
        self.state = MoveState::Idle;
        self.record(mv, true);
        self.pump(cube, scheduler);
    }

    /// End the move in flight now, snapping to its target or origin.
    ///
    /// Queued moves are kept and the next one starts. Returns the aborted
    /// move, or `None` if nothing was animating.
    pub fn abort(
        &mut self,
        how: Abort,
        cube: &mut Cube,
        scheduler: &mut Scheduler<Cube>,
    ) -> Option<Move> {
        let aborted = self.stop_in_flight(how, cube, scheduler);
        self.pump(cube, scheduler);
        aborted
    }

    /// Drop every queued move and roll back the one in flight.
    ///
    /// Returns how many requests were discarded, in-flight included.
    pub fn cancel_all(
        &mut self,
        cube: &mut Cube,
        scheduler: &mut Scheduler<Cube>,
    ) -> usize {
        let queued = self.queue.len();
        self.queue.clear();
        let in_flight =
            self.stop_in_flight(Abort::Rollback, cube, scheduler).is_some();
        let dropped = queued + usize::from(in_flight);
        if dropped > 0 {
            log::warn!("moves: cancelled {dropped} pending move(s)");
        }
        dropped
    }

    /// Drain the completion notifications gathered so far.
    ///
    /// Notifications accumulate until drained; a host driving the
    /// controller directly should call this after every
    /// [`request`](Self::request), [`on_tick`](Self::on_tick) and
    /// [`abort`](Self::abort). [`CubeEngine`] does so itself.
    ///
    /// [`CubeEngine`]: crate::engine::CubeEngine
    pub fn take_completed(&mut self) -> Vec<CompletedMove> {
        std::mem::take(&mut self.completed)
    }

    fn stop_in_flight(
        &mut self,
        how: Abort,
        cube: &mut Cube,
        scheduler: &mut Scheduler<Cube>,
    ) -> Option<Move> {
        let MoveState::Animating { mv, id } = self.state else {
            return None;
        };
        let _ = LayerRotation::stop(id, scheduler);
        self.state = MoveState::Idle;
        match how {
            Abort::Commit => {
                if cube.commit_rotation(mv.turns).is_some() {
                    self.record(mv, true);
                } else {
                    log::warn!("moves: {mv} had no group to commit");
                }
            }
            Abort::Rollback => {
                if cube.rollback_rotation().is_some() {
                    log::warn!("moves: rolled back {mv}");
                } else {
                    log::warn!("moves: {mv} had no group to roll back");
                }
            }
        }
        Some(mv)
    }

    /// Start queued requests until one is animating or the queue is empty.
    fn pump(&mut self, cube: &mut Cube, scheduler: &mut Scheduler<Cube>) {
        while self.is_idle() {
            let Some(MoveRequest { mv, animated }) = self.queue.pop_front()
            else {
                return;
            };

            if !animated {
                match cube.apply_move(mv) {
                    Ok(()) => self.record(mv, false),
                    Err(err) => log::warn!("moves: dropped {mv}: {err}"),
                }
                continue;
            }

            if let Err(err) = cube.begin_rotation(mv.axis, mv.layer) {
                log::warn!("moves: dropped {mv}: {err}");
                continue;
            }
            let id = LayerRotation::new(mv, self.duration_ms, self.easing)
                .start(scheduler);
            log::debug!("moves: animating {mv} as #{}", id.raw());
            self.state = MoveState::Animating { mv, id };
        }
    }

    fn record(&mut self, mv: Move, animated: bool) {
        self.committed += 1;
        self.completed.push(CompletedMove {
            mv,
            animated,
            sequence: self.committed,
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;
    use crate::animation::ManualClock;
    use crate::cube::test_support::{cube, sticker_map};
    use crate::cube::Axis;

    struct Rig {
        cube: Cube,
        scheduler: Scheduler<Cube>,
        clock: ManualClock,
        moves: MoveController,
    }

    impl Rig {
        fn new(size: usize) -> Self {
            let clock = ManualClock::new();
            Self {
                cube: cube(size),
                scheduler: Scheduler::with_clock(clock.clone()),
                clock,
                moves: MoveController::new(&AnimationOptions::default()),
            }
        }

        fn request(&mut self, request: MoveRequest) -> Result<(), CubeError> {
            self.moves
                .request(request, &mut self.cube, &mut self.scheduler)
        }

        fn frame(&mut self, ms: f64) -> TickReport {
            self.clock.advance_ms(ms);
            let report = self.scheduler.tick(&mut self.cube);
            self.moves
                .on_tick(&report, &mut self.cube, &mut self.scheduler);
            report
        }

        fn run_until_idle(&mut self) -> usize {
            let mut frames = 0;
            while self.scheduler.is_running() {
                let _ = self.frame(16.0);
                frames += 1;
                assert!(frames < 10_000, "animation never finished");
            }
            frames
        }
    }

    #[test]
    fn test_animated_move_lifecycle() {
        let mut rig = Rig::new(3);
        let mv = Move::new(Axis::Y, 2, 1);
        rig.request(MoveRequest::animated(mv)).unwrap();
        assert!(matches!(rig.moves.state(), MoveState::Animating { .. }));
        assert!(rig.scheduler.is_running());

        let _ = rig.frame(100.0);
        let angle = rig.cube.rotation_group().unwrap().angle();
        assert!(angle > 0.0 && angle < mv.angle());
        assert!(rig.moves.take_completed().is_empty());

        let report = rig.frame(100.0);
        assert_eq!(report.finished.len(), 1);
        assert!(rig.moves.is_idle());
        assert!(!rig.scheduler.is_running());
        assert_eq!(
            rig.moves.take_completed(),
            vec![CompletedMove {
                mv,
                animated: true,
                sequence: 1
            }]
        );

        let mut instant = cube(3);
        instant.apply_move(mv).unwrap();
        assert_eq!(sticker_map(&rig.cube), sticker_map(&instant));
    }

    #[test]
    fn test_requests_are_serialized_fifo() {
        let mut rig = Rig::new(3);
        let seq = [
            MoveRequest::animated(Move::new(Axis::Y, 2, 1)),
            MoveRequest::instant(Move::new(Axis::X, 0, 1)),
            MoveRequest::animated(Move::new(Axis::Z, 2, -1)),
        ];
        for request in seq {
            rig.request(request).unwrap();
        }
        // Only the first is in flight; the instant one waits its turn.
        assert_eq!(rig.moves.pending(), 2);
        assert_eq!(rig.scheduler.len(), 1);

        let _ = rig.run_until_idle();
        let completed = rig.moves.take_completed();
        let order: Vec<Move> = completed.iter().map(|c| c.mv).collect();
        assert_eq!(order, seq.map(|r| r.mv).to_vec());
        assert!(!completed[1].animated);

        let mut reference = cube(3);
        for request in seq {
            reference.apply_move(request.mv).unwrap();
        }
        assert_eq!(sticker_map(&rig.cube), sticker_map(&reference));
    }

    #[test]
    fn test_invalid_request_rejected_synchronously() {
        let mut rig = Rig::new(3);
        assert_eq!(
            rig.request(MoveRequest::animated(Move::new(Axis::X, 3, 1))),
            Err(CubeError::LayerOutOfRange { layer: 3, size: 3 })
        );
        assert_eq!(
            rig.request(MoveRequest::instant(Move::new(Axis::X, 0, 0))),
            Err(CubeError::ZeroTurns)
        );
        assert!(rig.moves.is_idle());
        assert_eq!(rig.moves.pending(), 0);
        assert!(!rig.scheduler.is_running());
    }

    #[test]
    fn test_abort_commit_snaps_to_target() {
        let mut rig = Rig::new(3);
        let mv = Move::new(Axis::X, 2, 1);
        rig.request(MoveRequest::animated(mv)).unwrap();
        let _ = rig.frame(50.0);

        assert_eq!(rig.moves.abort(Abort::Commit, &mut rig.cube, &mut rig.scheduler), Some(mv));
        assert!(rig.moves.is_idle());
        assert!(!rig.scheduler.is_running());
        assert!(rig.cube.rotation_group().is_none());
        assert_eq!(rig.moves.take_completed().len(), 1);

        let mut reference = cube(3);
        reference.apply_move(mv).unwrap();
        assert_eq!(sticker_map(&rig.cube), sticker_map(&reference));
    }

    #[test]
    fn test_abort_rollback_restores_origin_and_continues_queue() {
        let mut rig = Rig::new(3);
        let first = Move::new(Axis::Y, 0, 1);
        let second = Move::new(Axis::Z, 0, 1);
        rig.request(MoveRequest::animated(first)).unwrap();
        rig.request(MoveRequest::animated(second)).unwrap();
        let _ = rig.frame(120.0);

        let aborted = rig
            .moves
            .abort(Abort::Rollback, &mut rig.cube, &mut rig.scheduler);
        assert_eq!(aborted, Some(first));
        assert!(rig.moves.take_completed().is_empty());
        // The queued move took over.
        assert!(matches!(
            rig.moves.state(),
            MoveState::Animating { mv, .. } if mv == second
        ));

        let _ = rig.run_until_idle();
        let mut reference = cube(3);
        reference.apply_move(second).unwrap();
        assert_eq!(sticker_map(&rig.cube), sticker_map(&reference));
    }

    #[test]
    fn test_cancel_all() {
        let mut rig = Rig::new(3);
        for layer in 0..3 {
            rig.request(MoveRequest::animated(Move::new(Axis::X, layer, 1)))
                .unwrap();
        }
        let _ = rig.frame(16.0);
        let dropped =
            rig.moves.cancel_all(&mut rig.cube, &mut rig.scheduler);
        assert_eq!(dropped, 3);
        assert!(rig.moves.is_idle());
        assert!(!rig.scheduler.is_running());
        assert!(rig.cube.is_solved());
        assert_eq!(rig.moves.abort(Abort::Commit, &mut rig.cube, &mut rig.scheduler), None);
    }

    #[test]
    fn test_abort_after_group_was_dropped() {
        let mut rig = Rig::new(3);
        let mv = Move::new(Axis::Y, 1, 1);
        rig.request(MoveRequest::animated(mv)).unwrap();
        let _ = rig.frame(50.0);
        rig.cube.reset();

        let aborted =
            rig.moves.abort(Abort::Commit, &mut rig.cube, &mut rig.scheduler);
        assert_eq!(aborted, Some(mv));
        assert!(rig.moves.is_idle());
        assert!(!rig.scheduler.is_running());
        // Nothing was baked, so nothing is reported.
        assert!(rig.moves.take_completed().is_empty());
        assert!(rig.cube.is_solved());
    }

    #[test]
    fn test_slow_frames_still_land_on_grid() {
        let mut rig = Rig::new(4);
        rig.request(MoveRequest::animated(Move::new(Axis::Z, 3, 2)))
            .unwrap();
        // One giant delta jumps straight to commit.
        let _ = rig.frame(5_000.0);
        assert!(rig.moves.is_idle());
        assert!(rig.cube.coordinates_form_grid());
        let corner = rig
            .cube
            .pieces()
            .iter()
            .find(|p| p.id() == 3)
            .unwrap();
        // (0, 0, 3) turned 180° about Z lands on (3, 3, 3).
        assert_eq!(corner.coord(), IVec3::new(3, 3, 3));
    }

    #[test]
    fn test_completed_sequence_counts_up() {
        let mut rig = Rig::new(2);
        for _ in 0..3 {
            rig.request(MoveRequest::instant(Move::new(Axis::Y, 0, 1)))
                .unwrap();
        }
        let seqs: Vec<u64> =
            rig.moves.take_completed().iter().map(|c| c.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert!(rig.moves.take_completed().is_empty());
    }
}
