//! Saved-state shape and its validation.
//!
//! [`CubeState`] is the persistence format exchanged with the host:
//! `{size, names, positions, rotations}` where entry `i` of each array
//! describes the piece named `names[i]`. Positions are cube-local,
//! rotations are XYZ Euler angles in radians.

use glam::{EulerRot, IVec3, Quat, Vec3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::face::FaceSet;
use super::piece::{slot_coord, snap_coord, snap_rotation, SNAP_TOLERANCE};
use super::Face;
use crate::error::{CubeError, LoadError};

/// `{x, y, z}` triple as stored in saved states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl From<Vec3> for Xyz {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Xyz> for Vec3 {
    fn from(v: Xyz) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Snapshot of every piece's committed pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeState {
    /// Cube size.
    pub size: usize,
    /// Piece names (generation indices).
    pub names: Vec<usize>,
    /// Cube-local piece positions.
    pub positions: Vec<Xyz>,
    /// Piece rotations as XYZ Euler angles.
    pub rotations: Vec<Xyz>,
}

/// A validated slot and orientation for one piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub coord: IVec3,
    pub rotation: Quat,
}

/// Encode a rotation for [`CubeState::rotations`].
#[must_use]
pub fn rotation_to_euler(rotation: Quat) -> Xyz {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Xyz { x, y, z }
}

/// Decode an entry of [`CubeState::rotations`].
#[must_use]
pub fn rotation_from_euler(euler: Xyz) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

fn within_tolerance(error: f32) -> bool {
    error.is_finite() && error <= SNAP_TOLERANCE
}

impl CubeState {
    /// Number of pieces described.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no pieces are described.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check the whole payload and resolve one placement per piece,
    /// indexed by piece name.
    ///
    /// Nothing is returned unless every check passes, so callers can apply
    /// the result without a partial-failure path.
    pub(crate) fn validate(&self) -> Result<Vec<Placement>, LoadError> {
        let size = self.size;
        if size < 2 {
            return Err(CubeError::InvalidSize(size).into());
        }
        let expected = size * size * size;
        if self.names.len() != expected
            || self.positions.len() != expected
            || self.rotations.len() != expected
        {
            return Err(LoadError::LengthMismatch {
                names: self.names.len(),
                positions: self.positions.len(),
                rotations: self.rotations.len(),
                expected,
            });
        }

        let mut placements: Vec<Option<Placement>> = vec![None; expected];
        let mut occupied: FxHashMap<IVec3, usize> = FxHashMap::default();
        let max = size as i32 - 1;

        for ((&name, &position), &rotation) in
            self.names.iter().zip(&self.positions).zip(&self.rotations)
        {
            let slot = placements
                .get_mut(name)
                .ok_or(LoadError::UnknownPiece(name))?;
            if slot.is_some() {
                return Err(LoadError::DuplicatePiece(name));
            }

            let (coord, position_error) = snap_coord(position.into(), size);
            let in_range = coord.min_element() >= 0 && coord.max_element() <= max;
            if !in_range || !within_tolerance(position_error) {
                return Err(LoadError::OffGrid { piece: name });
            }

            let (rotation, rotation_error) =
                snap_rotation(rotation_from_euler(rotation));
            if !within_tolerance(rotation_error) {
                return Err(LoadError::Misaligned { piece: name });
            }

            if let Some(&first) = occupied.get(&coord) {
                return Err(LoadError::DuplicateCoordinate {
                    first,
                    second: name,
                    coord: coord.to_array(),
                });
            }
            let _ = occupied.insert(coord, name);

            check_stickers(name, size, coord, rotation)?;
            *slot = Some(Placement { coord, rotation });
        }

        placements
            .into_iter()
            .enumerate()
            .map(|(name, placement)| placement.ok_or(LoadError::MissingPiece(name)))
            .collect()
    }
}

/// Every sticker of piece `name` must point at an outward face of `coord`.
fn check_stickers(
    name: usize,
    size: usize,
    coord: IVec3,
    rotation: Quat,
) -> Result<(), LoadError> {
    let labels = FaceSet::from_coord(slot_coord(name, size), size);
    let outward = FaceSet::from_coord(coord, size);
    for label in labels.iter() {
        let facing = Face::from_direction(rotation * label.normal().as_vec3());
        if !facing.is_some_and(|face| outward.contains(face)) {
            return Err(LoadError::InwardSticker { piece: name, label });
        }
    }
    Ok(())
}
