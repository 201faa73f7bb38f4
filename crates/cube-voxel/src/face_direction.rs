//! The six cardinal directions a voxel face can point.

/// One of the six cardinal directions a voxel face can point.
///
/// The `repr(u8)` discriminant doubles as the bit index inside [`super::VisibleFaces`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// +X direction ("right").
    PosX = 0,
    /// −X direction ("left").
    NegX = 1,
    /// +Y direction ("top").
    PosY = 2,
    /// −Y direction ("bottom").
    NegY = 3,
    /// +Z direction ("front").
    PosZ = 4,
    /// −Z direction ("back").
    NegZ = 5,
}

impl FaceDirection {
    /// All six directions in order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Returns the face pointing along `axis` (0=X, 1=Y, 2=Z), positive or negative.
    ///
    /// Axes are taken modulo 3.
    pub fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis % 3, positive) {
            (0, true) => Self::PosX,
            (0, false) => Self::NegX,
            (1, true) => Self::PosY,
            (1, false) => Self::NegY,
            (_, true) => Self::PosZ,
            (_, false) => Self::NegZ,
        }
    }

    /// The axis perpendicular to this face (0=X, 1=Y, 2=Z).
    pub fn axis(self) -> usize {
        self as usize / 2
    }

    /// Returns `true` for +X, +Y and +Z.
    pub fn is_positive(self) -> bool {
        self as u8 % 2 == 0
    }

    /// Returns the sweep axes for greedy meshing: `(layer_axis, u_axis, v_axis)`.
    ///
    /// The plane axes are cyclic (`u = (d + 1) % 3`, `v = (d + 2) % 3`), so
    /// `e_u × e_v = e_d` for every axis.
    pub fn sweep_axes(self) -> (usize, usize, usize) {
        let d = self.axis();
        (d, (d + 1) % 3, (d + 2) % 3)
    }

    /// Returns the unit normal as `[f32; 3]` for this face direction.
    pub fn normal(self) -> [f32; 3] {
        match self {
            Self::PosX => [1.0, 0.0, 0.0],
            Self::NegX => [-1.0, 0.0, 0.0],
            Self::PosY => [0.0, 1.0, 0.0],
            Self::NegY => [0.0, -1.0, 0.0],
            Self::PosZ => [0.0, 0.0, 1.0],
            Self::NegZ => [0.0, 0.0, -1.0],
        }
    }

    /// Returns the neighbor coordinate offset for this direction.
    pub fn offset(self, x: i32, y: i32, z: i32) -> (i32, i32, i32) {
        match self {
            Self::PosX => (x + 1, y, z),
            Self::NegX => (x - 1, y, z),
            Self::PosY => (x, y + 1, z),
            Self::NegY => (x, y - 1, z),
            Self::PosZ => (x, y, z + 1),
            Self::NegZ => (x, y, z - 1),
        }
    }

    /// Returns the direction index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }
}
