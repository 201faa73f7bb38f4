//! Visible face detection: determines which voxel faces are exposed to empty
//! neighbors and need geometry.

use cube_voxel::{FaceDirection, VisibleFaces};

use crate::lattice::Lattice;

/// Computes per-cell visible-face bitmasks for a lattice.
///
/// A face is visible when the neighbor cell in its direction is empty;
/// off-lattice neighbors are empty. Empty cells get [`VisibleFaces::NONE`].
///
/// Returns a flat `Vec` of length `extent³`, x varying fastest.
pub fn compute_visible_faces(lattice: &Lattice) -> Vec<VisibleFaces> {
    let size = lattice.extent();
    let mut result = vec![VisibleFaces::NONE; size * size * size];

    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let (xi, yi, zi) = (x as i32, y as i32, z as i32);
                if !lattice.is_solid([xi, yi, zi]) {
                    continue;
                }

                let mut faces = VisibleFaces::NONE;
                for dir in FaceDirection::ALL {
                    let (nx, ny, nz) = dir.offset(xi, yi, zi);
                    if !lattice.is_solid([nx, ny, nz]) {
                        faces.set_visible(dir);
                    }
                }

                result[x + y * size + z * size * size] = faces;
            }
        }
    }

    result
}

/// Counts the total number of visible faces in a visibility array.
pub fn count_visible_faces(faces: &[VisibleFaces]) -> u32 {
    faces.iter().map(|f| f.count()).sum()
}
