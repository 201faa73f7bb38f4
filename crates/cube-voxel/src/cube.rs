//! Loose positioned cubes, the unstructured alternative to a [`crate::VoxelGrid`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::material::Material;

/// A unit cube placed in world space.
///
/// A cube with `size <= 0` is empty and contributes nothing to a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    /// Minimum corner of the cube's cell.
    pub position: Vec3,
    /// Edge length. Meshers treat every non-empty cube as one unit cell.
    pub size: f32,
    /// Appearance.
    pub material: Material,
}

impl Cube {
    /// A unit cube with a flat color at integer coordinates.
    pub fn colored(x: i32, y: i32, z: i32, color: Rgb) -> Self {
        Self {
            position: Vec3::new(x as f32, y as f32, z as f32),
            size: 1.0,
            material: Material::Color(color),
        }
    }

    /// Returns `true` if the cube has no volume.
    pub fn is_empty(&self) -> bool {
        self.size <= 0.0
    }

    /// Integer lattice cell containing the cube's minimum corner.
    pub fn cell(&self) -> [i32; 3] {
        let p = self.position.floor();
        [p.x as i32, p.y as i32, p.z as i32]
    }
}
