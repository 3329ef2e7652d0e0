//! Pieces (cubies) and their stickers.

use std::sync::Arc;

use glam::{IVec3, Mat3, Mat4, Quat, Vec3};

use super::face::{Face, FaceSet};
use crate::geometry::MeshData;

/// Edge length of one piece in cube-local units.
pub const PIECE_SIZE: f32 = 1.0 / 3.0;

/// Largest deviation (in grid steps, or matrix entries for rotations) the
/// snapping step absorbs silently. Anything between this and half a grid
/// step is still snapped but logged; saved states beyond it are rejected.
pub const SNAP_TOLERANCE: f32 = 1e-2;

/// Position and orientation relative to the cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Translation in cube-local units.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
}

impl Pose {
    /// Origin, no rotation.
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Pose at `position` with no rotation.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// This pose carried along by a rotation about the cube center.
    #[must_use]
    pub fn rotated(self, by: Quat) -> Self {
        Self {
            position: by * self.position,
            rotation: (by * self.rotation).normalize(),
        }
    }

    /// Affine transform of this pose.
    #[must_use]
    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-instance surface properties. Every piece body and every sticker
/// owns its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGB.
    pub color: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// A colored plate glued to one side of a piece.
///
/// `label` is fixed at creation; only the owning piece's pose changes
/// where it points.
#[derive(Debug, Clone)]
pub struct Facelet {
    label: Face,
    local: Pose,
    scale: f32,
    material: Material,
    mesh: Arc<MeshData>,
}

impl Facelet {
    pub(crate) fn new(label: Face, scale: f32, mesh: Arc<MeshData>) -> Self {
        let distance = PIECE_SIZE / 2.0;
        Self {
            label,
            local: Pose {
                position: label.normal().as_vec3() * distance,
                rotation: label.sticker_rotation(),
            },
            scale,
            material: Material::default(),
            mesh,
        }
    }

    /// Color label (the face this sticker started on).
    #[must_use]
    pub fn label(&self) -> Face {
        self.label
    }

    /// Placement relative to the piece.
    #[must_use]
    pub fn local_pose(&self) -> Pose {
        self.local
    }

    /// Uniform sticker scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Surface color.
    #[must_use]
    pub fn material(&self) -> Material {
        self.material
    }

    /// Shared sticker mesh.
    #[must_use]
    pub fn mesh(&self) -> &Arc<MeshData> {
        &self.mesh
    }

    /// Transform relative to the piece, including scale.
    #[must_use]
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.local.rotation,
            self.local.position,
        )
    }

    pub(crate) fn set_color(&mut self, color: [f32; 3]) {
        self.material.color = color;
    }
}

/// One of the `size³` small cubes.
#[derive(Debug, Clone)]
pub struct Piece {
    id: usize,
    coord: IVec3,
    pose: Pose,
    start: Pose,
    membership: FaceSet,
    facelets: Vec<Facelet>,
    material: Material,
    mesh: Arc<MeshData>,
}

impl Piece {
    pub(crate) fn new(
        id: usize,
        coord: IVec3,
        size: usize,
        mesh: Arc<MeshData>,
        facelets: Vec<Facelet>,
    ) -> Self {
        let pose = Pose::at(grid_position(coord, size));
        Self {
            id,
            coord,
            pose,
            start: pose,
            membership: FaceSet::from_coord(coord, size),
            facelets,
            material: Material::default(),
            mesh,
        }
    }

    /// Stable name: the index the piece was generated with.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current logical grid coordinate in `[0, size)³`.
    #[must_use]
    pub fn coord(&self) -> IVec3 {
        self.coord
    }

    /// Current committed pose.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Pose the piece was generated with.
    #[must_use]
    pub fn start(&self) -> Pose {
        self.start
    }

    /// Faces of the cube the piece's current slot touches.
    #[must_use]
    pub fn membership(&self) -> FaceSet {
        self.membership
    }

    /// Stickers, one per face the piece started on.
    #[must_use]
    pub fn facelets(&self) -> &[Facelet] {
        &self.facelets
    }

    /// Body surface color.
    #[must_use]
    pub fn material(&self) -> Material {
        self.material
    }

    /// Shared body mesh.
    #[must_use]
    pub fn mesh(&self) -> &Arc<MeshData> {
        &self.mesh
    }

    /// Cube face a sticker with color `label` currently points at.
    #[must_use]
    pub fn facing(&self, label: Face) -> Option<Face> {
        Face::from_direction(self.pose.rotation * label.normal().as_vec3())
    }

    /// `(label, facing)` for every sticker.
    pub fn sticker_facings(
        &self,
    ) -> impl Iterator<Item = (Face, Option<Face>)> + '_ {
        self.facelets
            .iter()
            .map(|facelet| (facelet.label, self.facing(facelet.label)))
    }

    pub(crate) fn set_body_color(&mut self, color: [f32; 3]) {
        self.material.color = color;
    }

    pub(crate) fn facelets_mut(&mut self) -> &mut [Facelet] {
        &mut self.facelets
    }

    /// Bake `by` into the pose and snap back onto the grid lattice.
    ///
    /// Returns the larger of the position and rotation corrections so the
    /// caller can report drift.
    pub(crate) fn bake(&mut self, by: Quat, size: usize) -> f32 {
        let turned = self.pose.rotated(by);
        let (coord, position_error) = snap_coord(turned.position, size);
        let (rotation, rotation_error) = snap_rotation(turned.rotation);
        self.place(coord, rotation, size);
        position_error.max(rotation_error)
    }

    /// Put the piece in slot `coord` with an already-snapped rotation.
    pub(crate) fn place(&mut self, coord: IVec3, rotation: Quat, size: usize) {
        self.coord = coord;
        self.pose = Pose {
            position: grid_position(coord, size),
            rotation,
        };
        self.membership = FaceSet::from_coord(coord, size);
    }

    pub(crate) fn restore_start(&mut self, size: usize) {
        let (coord, _) = snap_coord(self.start.position, size);
        self.place(coord, self.start.rotation, size);
    }
}

/// Offset of grid index 0 from the cube center, in grid steps:
/// `-(size - 1) / 2`, which lands on half steps for even sizes.
#[must_use]
pub fn first_offset(size: usize) -> f32 {
    -((size as f32 - 1.0) / 2.0)
}

/// Cube-local position of the center of slot `coord`.
#[must_use]
pub fn grid_position(coord: IVec3, size: usize) -> Vec3 {
    (coord.as_vec3() + Vec3::splat(first_offset(size))) * PIECE_SIZE
}

/// Slot of the piece generated at `index`: X-major, then Y, then Z.
#[must_use]
pub fn slot_coord(index: usize, size: usize) -> IVec3 {
    let z = index % size;
    let y = (index / size) % size;
    let x = index / (size * size);
    IVec3::new(x as i32, y as i32, z as i32)
}

/// Nearest slot to a cube-local position, plus the distance to it in grid
/// steps (max over axes). A non-finite position is infinitely far from
/// every slot.
#[must_use]
pub fn snap_coord(position: Vec3, size: usize) -> (IVec3, f32) {
    if !position.is_finite() {
        return (IVec3::ZERO, f32::INFINITY);
    }
    let steps = position / PIECE_SIZE - Vec3::splat(first_offset(size));
    let rounded = steps.round();
    (rounded.as_ivec3(), (steps - rounded).abs().max_element())
}

/// Nearest rotation made of quarter turns, plus the largest matrix-entry
/// correction applied to reach it.
///
/// Rounds every matrix entry to -1, 0 or 1. The result is only a rotation
/// if the input was within 45° of one; check [`is_quarter_turn_matrix`]
/// when the input is untrusted.
#[must_use]
pub fn snap_rotation(rotation: Quat) -> (Quat, f32) {
    let matrix = Mat3::from_quat(rotation.normalize());
    let rounded = round_matrix(matrix);
    let error = (0..3)
        .map(|i| (matrix.col(i) - rounded.col(i)).abs().max_element())
        .fold(0.0, f32::max);
    if is_quarter_turn_matrix(rounded) {
        (Quat::from_mat3(&rounded).normalize(), error)
    } else {
        (rotation.normalize(), f32::INFINITY)
    }
}

fn round_matrix(m: Mat3) -> Mat3 {
    Mat3::from_cols(m.x_axis.round(), m.y_axis.round(), m.z_axis.round())
}

/// Whether `m` is a signed permutation matrix with determinant 1.
#[must_use]
pub fn is_quarter_turn_matrix(m: Mat3) -> bool {
    let unit_cols = (0..3).all(|i| {
        let col = m.col(i);
        col.abs().element_sum() == 1.0 && col.abs().max_element() == 1.0
    });
    unit_cols && m.determinant() == 1.0
}
