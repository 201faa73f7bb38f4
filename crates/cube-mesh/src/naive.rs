//! Per-voxel baseline mesher: one unit quad per visible face, no merging.
//!
//! Produces the same face coverage as the greedy mesher with more quads.
//! Used for comparison and as the `naive` mesher option.

use cube_voxel::{DEFAULT_COLOR, FaceAttribute};

use crate::lattice::Lattice;
use crate::mesh::{Mesh, Quad};
use crate::vertex_format::MeshVertex;
use crate::visibility::compute_visible_faces;

/// Emits a 1×1 quad for every visible face of every solid cell.
pub fn naive_mesh<V: MeshVertex>(lattice: &Lattice) -> Mesh<V> {
    let size = lattice.extent();
    let origin = lattice.origin();
    let visible = compute_visible_faces(lattice);
    let mut mesh = Mesh::new();

    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let faces = visible[x + y * size + z * size * size];
                if faces.count() == 0 {
                    continue;
                }

                let cell = [x as i32, y as i32, z as i32];
                let material = lattice.material(cell);
                for direction in faces.iter() {
                    let (d, u, v) = direction.sweep_axes();
                    let attribute = material
                        .map_or(FaceAttribute::Color(DEFAULT_COLOR), |m| m.face(direction));
                    mesh.push_quad(
                        Quad {
                            direction,
                            plane: cell[d] + i32::from(direction.is_positive()),
                            u: cell[u],
                            v: cell[v],
                            width: 1,
                            height: 1,
                            attribute,
                        },
                        origin,
                    );
                }
            }
        }
    }

    mesh
}
