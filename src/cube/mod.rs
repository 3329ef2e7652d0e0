//! The cube model: pieces, their poses and face colors.
//!
//! A [`Cube`] starts uninitialized and becomes ready after [`Cube::init`].
//! Pieces are stored in generation order, so a piece's index in
//! [`Cube::pieces`] is also its stable name in saved states.
//!
//! Layer turns are driven from [`crate::moves`]; this module only knows
//! how to generate, recolor, persist and inspect the committed state.

mod face;
mod piece;
mod state;

use std::sync::Arc;

pub use face::{Axis, Face, FaceSet};
use glam::{IVec3, Mat4, Quat, Vec3};
pub use piece::{
    first_offset, grid_position, is_quarter_turn_matrix, slot_coord,
    snap_coord, snap_rotation, Facelet, Material, Piece, Pose, PIECE_SIZE,
    SNAP_TOLERANCE,
};
use rustc_hash::{FxHashMap, FxHashSet};
pub use state::{rotation_from_euler, rotation_to_euler, CubeState, Xyz};

use crate::error::{CubeError, LoadError};
use crate::geometry::{rounded_box, rounded_plate, MeshData};
use crate::moves::RotationGroup;
use crate::options::{CubeOptions, FaceColors};

/// Smallest supported cube.
pub const MIN_SIZE: usize = 2;

/// Cube-level scale for `size`: 2×2×2 is drawn slightly larger, 3×3×3 at
/// unit scale and larger cubes shrink so the whole puzzle keeps the same
/// extent.
#[must_use]
pub fn scale_for_size(size: usize) -> f32 {
    match size {
        0..=2 => 1.25,
        3 => 1.0,
        _ => 3.0 / size as f32,
    }
}

/// The three stacked orientations applied to the whole cube.
///
/// `holder` is driven by [`OrientationTransition`], `animator` by the host
/// (e.g. a drag preview) and `object` is a fixed presentation tilt.
///
/// [`OrientationTransition`]: crate::animation::OrientationTransition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Outer orientation.
    pub holder: Quat,
    /// Middle orientation.
    pub animator: Quat,
    /// Inner orientation.
    pub object: Quat,
}

impl Orientation {
    /// No rotation on any holder.
    pub const IDENTITY: Orientation = Orientation {
        holder: Quat::IDENTITY,
        animator: Quat::IDENTITY,
        object: Quat::IDENTITY,
    };

    /// `holder * animator * object`.
    #[must_use]
    pub fn combined(&self) -> Quat {
        (self.holder * self.animator * self.object).normalize()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One grid slot, as produced by [`Cube::generate_positions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Generation index.
    pub id: usize,
    /// Integer grid coordinate.
    pub coord: IVec3,
    /// Offset from the cube center in grid steps.
    pub offset: Vec3,
    /// Faces the slot touches.
    pub membership: FaceSet,
}

/// Meshes shared by every piece of one generation.
#[derive(Debug, Clone)]
pub struct PieceMeshes {
    /// Rounded piece body.
    pub body: Arc<MeshData>,
    /// Sticker plate.
    pub sticker: Arc<MeshData>,
}

/// The puzzle: `size³` pieces plus the transforms applied to all of them.
#[derive(Debug)]
pub struct Cube {
    pub(crate) size: usize,
    /// Size of the current piece set; `None` before the first generation.
    generated_size: Option<usize>,
    scale: f32,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) group: Option<RotationGroup>,
    pub(crate) orientation: Orientation,
    meshes: Option<PieceMeshes>,
    options: CubeOptions,
    colors: FaceColors,
}

impl Cube {
    /// Uninitialized cube; call [`init`](Self::init) before use.
    ///
    /// # Errors
    ///
    /// [`CubeError::InvalidSize`] if `options.size < 2`.
    pub fn new(
        options: &CubeOptions,
        colors: FaceColors,
    ) -> Result<Self, CubeError> {
        if options.size < MIN_SIZE {
            return Err(CubeError::InvalidSize(options.size));
        }
        Ok(Self {
            size: options.size,
            generated_size: None,
            scale: scale_for_size(options.size),
            pieces: Vec::new(),
            group: None,
            orientation: Orientation::IDENTITY,
            meshes: None,
            options: options.clone(),
            colors,
        })
    }

    /// [`new`](Self::new) followed by [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// [`CubeError::InvalidSize`] if `options.size < 2`.
    pub fn initialized(
        options: &CubeOptions,
        colors: FaceColors,
    ) -> Result<Self, CubeError> {
        let mut cube = Self::new(options, colors)?;
        cube.init();
        Ok(cube)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Every grid slot for the current size, X-major.
    #[must_use]
    pub fn generate_positions(&self) -> Vec<Slot> {
        let size = self.size;
        let first = first_offset(size);
        (0..size * size * size)
            .map(|id| {
                let coord = slot_coord(id, size);
                Slot {
                    id,
                    coord,
                    offset: coord.as_vec3() + Vec3::splat(first),
                    membership: FaceSet::from_coord(coord, size),
                }
            })
            .collect()
    }

    /// Build the shared meshes and one piece per slot, each with a sticker
    /// for every face it touches. Replaces any existing pieces.
    pub fn generate_model(&mut self) {
        let opts = &self.options;
        let meshes = PieceMeshes {
            body: Arc::new(rounded_box(
                PIECE_SIZE,
                opts.piece_corner_radius,
                opts.radius_segments,
            )),
            sticker: Arc::new(rounded_plate(
                PIECE_SIZE,
                opts.sticker_corner_roundness,
                opts.sticker_depth,
            )),
        };

        let sticker_scale = opts.sticker_scale;
        self.pieces = self
            .generate_positions()
            .into_iter()
            .map(|slot| {
                let facelets = slot
                    .membership
                    .iter()
                    .map(|face| {
                        Facelet::new(
                            face,
                            sticker_scale,
                            Arc::clone(&meshes.sticker),
                        )
                    })
                    .collect();
                Piece::new(
                    slot.id,
                    slot.coord,
                    self.size,
                    Arc::clone(&meshes.body),
                    facelets,
                )
            })
            .collect();

        self.group = None;
        self.meshes = Some(meshes);
        self.generated_size = Some(self.size);
    }

    /// Reset, generate, scale and color. Leaves the cube ready and solved.
    pub fn init(&mut self) {
        self.reset();
        self.rebuild();
        log::info!(
            "cube: initialized {n}×{n}×{n} ({} pieces)",
            self.pieces.len(),
            n = self.size
        );
    }

    fn rebuild(&mut self) {
        self.generate_model();
        self.scale = scale_for_size(self.size);
        self.update_colors(self.colors.clone());
    }

    /// Regenerate at `new_size` if it differs from the generated size.
    ///
    /// Rotation state is not carried over: the result is a solved cube.
    /// Returns whether anything was regenerated.
    ///
    /// # Errors
    ///
    /// [`CubeError::InvalidSize`] if `new_size < 2`; nothing changes.
    pub fn resize(&mut self, new_size: usize) -> Result<bool, CubeError> {
        if new_size < MIN_SIZE {
            return Err(CubeError::InvalidSize(new_size));
        }
        if self.generated_size == Some(new_size) {
            return Ok(false);
        }
        self.size = new_size;
        self.options.size = new_size;
        self.init();
        Ok(true)
    }

    /// Zero the whole-cube orientation and drop any uncommitted layer
    /// rotation. Piece poses and geometry are untouched.
    pub fn reset(&mut self) {
        self.orientation = Orientation::IDENTITY;
        if self.group.take().is_some() {
            log::debug!("cube: reset discarded an uncommitted rotation");
        }
    }

    /// Put every piece back at its generated pose without regenerating.
    pub fn restore_start(&mut self) {
        self.group = None;
        let size = self.size;
        for piece in &mut self.pieces {
            piece.restore_start(size);
        }
    }

    /// Replace the puzzle with a saved state.
    ///
    /// The payload is validated in full first; on error the current puzzle
    /// is left exactly as it was. On success the model is regenerated at
    /// the saved size and every piece is placed at its saved pose.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`] found by validation.
    pub fn load_from_data(&mut self, data: &CubeState) -> Result<(), LoadError> {
        let placements = data.validate()?;

        self.reset();
        self.size = data.size;
        self.options.size = data.size;
        self.rebuild();
        let size = self.size;
        for (piece, placement) in self.pieces.iter_mut().zip(placements) {
            piece.place(placement.coord, placement.rotation, size);
        }
        log::info!("cube: loaded {} pieces at size {size}", data.len());
        Ok(())
    }

    /// Committed pose of every piece, the inverse of
    /// [`load_from_data`](Self::load_from_data).
    ///
    /// An in-flight layer rotation is not included: pieces are reported at
    /// their last committed pose.
    ///
    /// # Errors
    ///
    /// [`CubeError::NotReady`] before [`init`](Self::init).
    pub fn serialize_state(&self) -> Result<CubeState, CubeError> {
        if !self.is_ready() {
            return Err(CubeError::NotReady);
        }
        Ok(CubeState {
            size: self.size,
            names: self.pieces.iter().map(Piece::id).collect(),
            positions: self.pieces.iter().map(|p| p.pose().position.into()).collect(),
            rotations: self
                .pieces
                .iter()
                .map(|p| rotation_to_euler(p.pose().rotation))
                .collect(),
        })
    }

    // =========================================================================
    // Colors
    // =========================================================================

    /// Current color theme.
    #[must_use]
    pub fn colors(&self) -> &FaceColors {
        &self.colors
    }

    /// Recolor every piece body with `colors.body` and every sticker with
    /// the color of its label.
    pub fn update_colors(&mut self, colors: FaceColors) {
        for piece in &mut self.pieces {
            piece.set_body_color(colors.body);
            for facelet in piece.facelets_mut() {
                facelet.set_color(colors.get(facelet.label()));
            }
        }
        self.colors = colors;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Pieces per edge.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cube-level scale (see [`scale_for_size`]).
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Geometry options the model was built with.
    #[must_use]
    pub fn options(&self) -> &CubeOptions {
        &self.options
    }

    /// Whether the piece set matches the current size.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.generated_size == Some(self.size)
    }

    /// All pieces in generation order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Piece by name.
    #[must_use]
    pub fn piece(&self, id: usize) -> Option<&Piece> {
        self.pieces.get(id)
    }

    /// Meshes shared by the current pieces.
    #[must_use]
    pub fn meshes(&self) -> Option<&PieceMeshes> {
        self.meshes.as_ref()
    }

    /// Whole-cube orientation holders.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Mutable access to the orientation holders.
    pub fn orientation_mut(&mut self) -> &mut Orientation {
        &mut self.orientation
    }

    /// Pieces whose coordinate along `axis` equals `layer`.
    #[must_use]
    pub fn layer(&self, axis: Axis, layer: usize) -> Vec<usize> {
        let Ok(layer) = i32::try_from(layer) else {
            return Vec::new();
        };
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| axis.component(piece.coord()) == layer)
            .map(|(index, _)| index)
            .collect()
    }

    /// Cube-to-world transform: scale and the combined orientation.
    #[must_use]
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.orientation.combined(),
            Vec3::ZERO,
        )
    }

    /// Piece-to-cube transform, including an in-flight layer rotation.
    #[must_use]
    pub fn piece_transform(&self, index: usize) -> Option<Mat4> {
        let piece = self.pieces.get(index)?;
        let pose = match &self.group {
            Some(group) if group.contains(index) => {
                piece.pose().rotated(group.rotation())
            }
            _ => piece.pose(),
        };
        Some(pose.to_mat4())
    }

    /// Whether the piece coordinates are exactly the full grid.
    #[must_use]
    pub fn coordinates_form_grid(&self) -> bool {
        let max = self.size as i32 - 1;
        let mut seen = FxHashSet::default();
        self.pieces.len() == self.size.pow(3)
            && self.pieces.iter().all(|piece| {
                let c = piece.coord();
                c.min_element() >= 0 && c.max_element() <= max && seen.insert(c)
            })
    }

    /// Whether every face of the cube shows a single sticker color.
    ///
    /// Reads committed poses only; an in-flight layer rotation is ignored.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let mut shown: FxHashMap<Face, Face> = FxHashMap::default();
        self.pieces.iter().all(|piece| {
            piece.sticker_facings().all(|(label, facing)| {
                facing.is_some_and(|face| *shown.entry(face).or_insert(label) == label)
            })
        })
    }
}
