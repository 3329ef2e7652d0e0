//! Axis and face labels.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::{EulerRot, IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One of the three principal rotation axes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left → right.
    X,
    /// Down → up.
    Y,
    /// Back → front.
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// 0, 1 or 2.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit vector along the positive axis.
    #[must_use]
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Component of `v` along this axis.
    #[must_use]
    pub const fn component(self, v: IVec3) -> i32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    /// Right-handed rotation of `angle` radians about the positive axis.
    #[must_use]
    pub fn rotation(self, angle: f32) -> Quat {
        Quat::from_axis_angle(self.unit(), angle)
    }

    /// Face at the low end of the axis.
    #[must_use]
    pub const fn min_face(self) -> Face {
        match self {
            Self::X => Face::L,
            Self::Y => Face::D,
            Self::Z => Face::B,
        }
    }

    /// Face at the high end of the axis.
    #[must_use]
    pub const fn max_face(self) -> Face {
        match self {
            Self::X => Face::R,
            Self::Y => Face::U,
            Self::Z => Face::F,
        }
    }

    /// Parse `x`, `y` or `z` (either case).
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'x' | 'X' => Some(Self::X),
            'y' | 'Y' => Some(Self::Y),
            'z' | 'Z' => Some(Self::Z),
            _ => None,
        }
    }

    /// Lowercase letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Cube face label: left, right, down, up, back, front.
///
/// Doubles as the color key of a sticker. The declaration order is the
/// membership order used when stickers are generated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum Face {
    /// -X.
    L,
    /// +X.
    R,
    /// -Y.
    D,
    /// +Y.
    U,
    /// -Z.
    B,
    /// +Z.
    F,
}

impl Face {
    /// All faces in membership order.
    pub const ALL: [Face; 6] = [Face::L, Face::R, Face::D, Face::U, Face::B, Face::F];

    /// Position in [`Face::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Axis the face is perpendicular to.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::L | Self::R => Axis::X,
            Self::D | Self::U => Axis::Y,
            Self::B | Self::F => Axis::Z,
        }
    }

    /// Whether the face sits at the positive end of its axis.
    #[must_use]
    pub const fn is_max(self) -> bool {
        matches!(self, Self::R | Self::U | Self::F)
    }

    /// Face on the opposite side of the cube.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::L => Self::R,
            Self::R => Self::L,
            Self::D => Self::U,
            Self::U => Self::D,
            Self::B => Self::F,
            Self::F => Self::B,
        }
    }

    /// Integer outward normal.
    #[must_use]
    pub const fn normal(self) -> IVec3 {
        match self {
            Self::L => IVec3::NEG_X,
            Self::R => IVec3::X,
            Self::D => IVec3::NEG_Y,
            Self::U => IVec3::Y,
            Self::B => IVec3::NEG_Z,
            Self::F => IVec3::Z,
        }
    }

    /// Face whose normal is exactly `normal`.
    #[must_use]
    pub fn from_normal(normal: IVec3) -> Option<Self> {
        Self::ALL.into_iter().find(|face| face.normal() == normal)
    }

    /// Face whose normal is nearest to `direction`, if `direction` is
    /// within 45° of one.
    #[must_use]
    pub fn from_direction(direction: Vec3) -> Option<Self> {
        let rounded = direction.normalize_or_zero().round().as_ivec3();
        Self::from_normal(rounded)
    }

    /// Sticker orientation against this face: the sticker mesh is built
    /// in the XY plane facing +Z.
    #[must_use]
    pub fn sticker_rotation(self) -> Quat {
        let (x, y) = match self {
            Self::L => (0.0, -FRAC_PI_2),
            Self::R => (0.0, FRAC_PI_2),
            Self::D => (FRAC_PI_2, 0.0),
            Self::U => (-FRAC_PI_2, 0.0),
            Self::B => (0.0, PI),
            Self::F => (0.0, 0.0),
        };
        Quat::from_euler(EulerRot::XYZ, x, y, 0.0)
    }

    /// Single-letter label.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::L => 'L',
            Self::R => 'R',
            Self::D => 'D',
            Self::U => 'U',
            Self::B => 'B',
            Self::F => 'F',
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Set of up to six faces, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaceSet(u8);

impl FaceSet {
    /// The empty set.
    pub const EMPTY: FaceSet = FaceSet(0);

    /// Faces a grid coordinate touches on a cube of `size`: an axis at
    /// index 0 adds the min face, at `size - 1` the max face.
    #[must_use]
    pub fn from_coord(coord: IVec3, size: usize) -> Self {
        let last = size as i32 - 1;
        let mut set = Self::EMPTY;
        for axis in Axis::ALL {
            let c = axis.component(coord);
            if c == 0 {
                set.insert(axis.min_face());
            }
            if c == last {
                set.insert(axis.max_face());
            }
        }
        set
    }

    /// Add a face.
    pub fn insert(&mut self, face: Face) {
        self.0 |= 1 << face.index();
    }

    /// Whether `face` is in the set.
    #[must_use]
    pub const fn contains(self, face: Face) -> bool {
        self.0 & (1 << face.index()) != 0
    }

    /// Number of faces.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Faces in membership order.
    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |&face| self.contains(face))
    }
}

impl FromIterator<Face> for FaceSet {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for face in iter {
            set.insert(face);
        }
        set
    }
}

impl fmt::Display for FaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for face in self.iter() {
            write!(f, "{face}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_round_trip() {
        for face in Face::ALL {
            assert_eq!(Face::from_normal(face.normal()), Some(face));
            assert_eq!(face.opposite().normal(), -face.normal());
            assert_eq!(face.axis().component(face.normal()).abs(), 1);
        }
        assert_eq!(Face::from_normal(IVec3::ZERO), None);
    }

    #[test]
    fn test_sticker_rotation_points_outward() {
        for face in Face::ALL {
            let facing = face.sticker_rotation() * Vec3::Z;
            assert_eq!(Face::from_direction(facing), Some(face), "{face}");
        }
    }

    #[test]
    fn test_membership_counts() {
        let size = 3;
        assert_eq!(FaceSet::from_coord(IVec3::new(0, 0, 0), size).len(), 3);
        assert_eq!(FaceSet::from_coord(IVec3::new(1, 0, 0), size).len(), 2);
        assert_eq!(FaceSet::from_coord(IVec3::new(1, 1, 2), size).len(), 1);
        assert!(FaceSet::from_coord(IVec3::new(1, 1, 1), size).is_empty());

        let corner = FaceSet::from_coord(IVec3::new(2, 0, 2), size);
        assert_eq!(corner.to_string(), "RDF");
    }

    #[test]
    fn test_two_by_two_pieces_are_all_corners() {
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    let set = FaceSet::from_coord(IVec3::new(x, y, z), 2);
                    assert_eq!(set.len(), 3);
                }
            }
        }
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!(Axis::from_char('Y'), Some(Axis::Y));
        assert_eq!(Axis::from_char('w'), None);
        assert_eq!(Axis::Z.to_string(), "z");
    }
}
