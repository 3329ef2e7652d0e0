//! One layer turning as a unit.
//!
//! A [`RotationGroup`] is created when a turn starts and destroyed when it
//! commits or rolls back. It lists the turning pieces by index and holds
//! the one shared angle; pieces keep their committed poses until the
//! rotation is baked in, so the grid state is never half-applied.

use std::f32::consts::FRAC_PI_2;

use glam::Quat;

use super::Move;
use crate::animation::{Animatable, Easing, Tick};
use crate::cube::{Axis, Cube, SNAP_TOLERANCE};
use crate::error::CubeError;

/// Transient selection of one layer plus its shared rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationGroup {
    axis: Axis,
    layer: usize,
    members: Vec<usize>,
    angle: f32,
}

impl RotationGroup {
    /// Rotation axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Selected layer.
    #[must_use]
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Indices of the pieces turning together.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Current angle in radians.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Current shared rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.axis.rotation(self.angle)
    }

    /// Whether piece `index` is part of the group.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }
}

// =============================================================================
// Cube operations
// =============================================================================

impl Cube {
    /// The layer rotation in progress, if any.
    #[must_use]
    pub fn rotation_group(&self) -> Option<&RotationGroup> {
        self.group.as_ref()
    }

    /// Select `layer` on `axis` into a new rotation group at angle 0.
    ///
    /// # Errors
    ///
    /// [`CubeError::NotReady`], [`CubeError::RotationInProgress`],
    /// [`CubeError::LayerOutOfRange`] or [`CubeError::EmptyLayer`]; the
    /// cube is unchanged on error.
    pub fn begin_rotation(
        &mut self,
        axis: Axis,
        layer: usize,
    ) -> Result<&RotationGroup, CubeError> {
        if !self.is_ready() {
            return Err(CubeError::NotReady);
        }
        if self.group.is_some() {
            return Err(CubeError::RotationInProgress);
        }
        if layer >= self.size {
            return Err(CubeError::LayerOutOfRange {
                layer,
                size: self.size,
            });
        }
        let members = self.layer(axis, layer);
        if members.is_empty() {
            return Err(CubeError::EmptyLayer { axis, layer });
        }

        log::debug!("rotation: begin {axis}{layer} ({} pieces)", members.len());
        Ok(self.group.insert(RotationGroup {
            axis,
            layer,
            members,
            angle: 0.0,
        }))
    }

    /// Set the angle of the rotation in progress. Returns `false` if there
    /// is none.
    pub fn set_rotation_angle(&mut self, angle: f32) -> bool {
        match &mut self.group {
            Some(group) => {
                group.angle = angle;
                true
            }
            None => false,
        }
    }

    /// Bake `quarter_turns` × 90° into every member, snap each onto the
    /// grid and destroy the group. Returns the destroyed group.
    pub fn commit_rotation(&mut self, quarter_turns: i32) -> Option<RotationGroup> {
        let mut group = self.group.take()?;
        group.angle = quarter_turns as f32 * FRAC_PI_2;
        let by = group.rotation();
        let size = self.size;

        for &index in &group.members {
            let Some(piece) = self.pieces.get_mut(index) else {
                continue;
            };
            let error = piece.bake(by, size);
            if error > SNAP_TOLERANCE {
                log::warn!(
                    "rotation: piece {} drifted {error:.4} before snapping",
                    piece.id()
                );
            }
        }
        debug_assert!(self.coordinates_form_grid());

        log::debug!(
            "rotation: commit {}{} by {quarter_turns}",
            group.axis,
            group.layer
        );
        Some(group)
    }

    /// Destroy the group without touching any piece.
    pub fn rollback_rotation(&mut self) -> Option<RotationGroup> {
        let group = self.group.take()?;
        log::debug!("rotation: rollback {}{}", group.axis, group.layer);
        Some(group)
    }

    /// Apply `mv` at once: select, then commit at full progress.
    ///
    /// # Errors
    ///
    /// Same as [`begin_rotation`](Self::begin_rotation), plus
    /// [`CubeError::ZeroTurns`].
    pub fn apply_move(&mut self, mv: Move) -> Result<(), CubeError> {
        mv.validate(self.size)?;
        let _ = self.begin_rotation(mv.axis, mv.layer)?;
        let _ = self.commit_rotation(mv.turns);
        Ok(())
    }
}

// =============================================================================
// Animation
// =============================================================================

/// Animates the cube's rotation group toward a move's target angle, then
/// commits it.
///
/// The group must already exist when the first update arrives; the
/// controller creates it before registering this animation.
#[derive(Debug, Clone)]
pub struct LayerRotation {
    mv: Move,
    duration_ms: f64,
    easing: Easing,
    elapsed_ms: f64,
}

impl LayerRotation {
    /// Rotation for `mv` lasting `duration_ms`.
    #[must_use]
    pub fn new(mv: Move, duration_ms: f64, easing: Easing) -> Self {
        Self {
            mv,
            duration_ms: duration_ms.max(0.0),
            easing,
            elapsed_ms: 0.0,
        }
    }

    /// The move being animated.
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Normalized time in `[0, 1]`.
    #[must_use]
    pub fn time(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0) as f32
        }
    }
}

impl Animatable<Cube> for LayerRotation {
    fn update(&mut self, delta_ms: f64, cube: &mut Cube) -> Tick {
        self.elapsed_ms += delta_ms.max(0.0);
        let t = self.time();
        if t >= 1.0 {
            if cube.commit_rotation(self.mv.turns).is_none() {
                log::warn!("rotation: {} finished without a group", self.mv);
            }
            return Tick::Finished;
        }

        // Overshooting curves leave [0, 1] on purpose.
        let progress = self.easing.evaluate(t);
        if cube.set_rotation_angle(progress * self.mv.angle()) {
            Tick::Continue
        } else {
            log::warn!("rotation: {} lost its group", self.mv);
            Tick::Finished
        }
    }

    fn name(&self) -> &'static str {
        "layer_rotation"
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::cube::test_support::{cube, sticker_map};
    use crate::cube::{is_quarter_turn_matrix, Face};

    fn piece_at(cube: &Cube, coord: IVec3) -> usize {
        cube.pieces()
            .iter()
            .position(|p| p.coord() == coord)
            .unwrap()
    }

    #[test]
    fn test_top_layer_quarter_turn() {
        let mut c = cube(3);
        let edge = piece_at(&c, IVec3::new(0, 2, 1));
        let front = piece_at(&c, IVec3::new(1, 2, 2));

        c.apply_move(Move::new(Axis::Y, 2, 1)).unwrap();

        let moved = &c.pieces()[edge];
        assert_eq!(moved.coord(), IVec3::new(1, 2, 2));
        assert_eq!(moved.membership().to_string(), "UF");

        let front_edge = &c.pieces()[front];
        assert_eq!(front_edge.coord(), IVec3::new(2, 2, 1));
        assert_eq!(front_edge.facing(Face::F), Some(Face::R));
        assert_eq!(front_edge.facing(Face::U), Some(Face::U));

        // Nothing outside the layer moved.
        for piece in c.pieces().iter().filter(|p| p.start().position.y < 0.1) {
            assert_eq!(piece.pose(), piece.start());
        }
        assert!(c.coordinates_form_grid());
    }

    #[test]
    fn test_move_then_inverse_restores() {
        let mut c = cube(4);
        let before = sticker_map(&c);
        let mv = Move::new(Axis::Z, 1, 1);
        c.apply_move(mv).unwrap();
        assert_ne!(sticker_map(&c), before);
        c.apply_move(mv.inverse()).unwrap();
        assert_eq!(sticker_map(&c), before);
        assert!(c.is_solved());
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let mut c = cube(3);
        let before = c.serialize_state().unwrap();
        for _ in 0..4 {
            c.apply_move(Move::new(Axis::X, 0, -1)).unwrap();
        }
        assert_eq!(c.serialize_state().unwrap(), before);

        // A single move of four turns too.
        c.apply_move(Move::new(Axis::X, 0, 4)).unwrap();
        assert_eq!(c.serialize_state().unwrap(), before);
    }

    #[test]
    fn test_random_sequences_keep_grid_and_quarter_turns() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for size in [2, 3, 5] {
            let mut c = cube(size);
            let mut history = Vec::new();
            for _ in 0..200 {
                let axis = Axis::ALL[rng.random_range(0..3)];
                let layer = rng.random_range(0..size);
                let turns = [-2, -1, 1, 2][rng.random_range(0..4)];
                let mv = Move::new(axis, layer, turns);
                c.apply_move(mv).unwrap();
                history.push(mv);

                assert!(c.coordinates_form_grid());
                for piece in c.pieces() {
                    let m = glam::Mat3::from_quat(piece.pose().rotation);
                    let rounded = glam::Mat3::from_cols(
                        m.x_axis.round(),
                        m.y_axis.round(),
                        m.z_axis.round(),
                    );
                    assert!(is_quarter_turn_matrix(rounded));
                    let drift = (0..3)
                        .map(|i| (m.col(i) - rounded.col(i)).abs().max_element())
                        .fold(0.0, f32::max);
                    assert!(drift < 1e-5, "drift {drift}");
                }
            }
            for mv in history.into_iter().rev() {
                c.apply_move(mv.inverse()).unwrap();
            }
            assert!(c.is_solved());
            for piece in c.pieces() {
                assert_eq!(piece.coord(), crate::cube::slot_coord(piece.id(), size));
            }
        }
    }

    #[test]
    fn test_begin_rejects_bad_requests() {
        let mut c = cube(3);
        assert_eq!(
            c.begin_rotation(Axis::X, 3).unwrap_err(),
            CubeError::LayerOutOfRange { layer: 3, size: 3 }
        );
        let _ = c.begin_rotation(Axis::X, 0).unwrap();
        assert_eq!(
            c.begin_rotation(Axis::Y, 0).unwrap_err(),
            CubeError::RotationInProgress
        );
        assert_eq!(c.apply_move(Move::new(Axis::Y, 0, 1)), Err(CubeError::RotationInProgress));
        assert!(c.rollback_rotation().is_some());
        assert!(c.rollback_rotation().is_none());
        assert!(c.is_solved());
    }

    #[test]
    fn test_group_angle_moves_members_only() {
        let mut c = cube(3);
        let group = c.begin_rotation(Axis::Y, 2).unwrap();
        assert_eq!(group.members().len(), 9);
        let member = group.members()[0];
        let outsider = c.layer(Axis::Y, 0)[0];

        assert!(c.set_rotation_angle(FRAC_PI_2 / 2.0));
        let turned = c.piece_transform(member).unwrap();
        let resting = c.piece_transform(outsider).unwrap();
        assert_ne!(turned, c.pieces()[member].pose().to_mat4());
        assert_eq!(resting, c.pieces()[outsider].pose().to_mat4());

        // Committed pose is untouched until the bake.
        assert_eq!(c.pieces()[member].pose(), c.pieces()[member].start());
    }

    #[test]
    fn test_layer_rotation_eases_then_commits() {
        let mut c = cube(3);
        let mv = Move::new(Axis::Y, 2, 1);
        let _ = c.begin_rotation(mv.axis, mv.layer).unwrap();
        let mut anim = LayerRotation::new(mv, 100.0, Easing::power_out(2));

        assert_eq!(anim.update(50.0, &mut c), Tick::Continue);
        let angle = c.rotation_group().unwrap().angle();
        assert!((angle - 0.75 * FRAC_PI_2).abs() < 1e-6);

        assert_eq!(anim.update(60.0, &mut c), Tick::Finished);
        assert!(c.rotation_group().is_none());
        assert!(c.coordinates_form_grid());
        assert!(!c.is_solved());
    }

    #[test]
    fn test_overshoot_is_applied_unclamped() {
        let mut c = cube(3);
        let mv = Move::new(Axis::X, 0, 1);
        let _ = c.begin_rotation(mv.axis, mv.layer).unwrap();
        let mut anim = LayerRotation::new(mv, 100.0, Easing::back_out(Easing::BACK_OVERSHOOT));
        let _ = anim.update(60.0, &mut c);
        assert!(c.rotation_group().unwrap().angle() > mv.angle());
    }

    #[test]
    fn test_finishing_without_group_changes_nothing() {
        let mut c = cube(3);
        let mv = Move::new(Axis::Y, 0, 1);
        let _ = c.begin_rotation(mv.axis, mv.layer).unwrap();
        c.reset();
        let mut anim = LayerRotation::new(mv, 10.0, Easing::Linear);
        assert_eq!(anim.update(20.0, &mut c), Tick::Finished);
        assert!(c.is_solved());
        assert!(c.commit_rotation(mv.turns).is_none());
        assert!(c.rollback_rotation().is_none());
    }

    #[test]
    fn test_zero_duration_commits_on_first_update() {
        let mut c = cube(2);
        let mv = Move::new(Axis::Z, 1, -1);
        let _ = c.begin_rotation(mv.axis, mv.layer).unwrap();
        let mut anim = LayerRotation::new(mv, 0.0, Easing::Linear);
        assert_eq!(anim.update(0.0, &mut c), Tick::Finished);
        assert!(c.rotation_group().is_none());
    }
}
