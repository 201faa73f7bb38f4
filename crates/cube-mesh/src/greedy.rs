//! Greedy meshing algorithm: merges coplanar, same-attribute adjacent faces
//! into larger rectangular quads to reduce triangle count.
//!
//! Each axis is swept plane by plane. At every plane a face-change mask marks
//! where solidity differs across the boundary; rectangles are then grown in
//! the mask width-first along `u`, height second along `v`. The result is
//! greedy and scan-order dependent, not a minimal partition.

use cube_voxel::{DEFAULT_COLOR, FaceAttribute, FaceDirection};

use crate::lattice::Lattice;
use crate::mesh::{Mesh, Quad};
use crate::vertex_format::MeshVertex;

/// A visible face in the mask. Cells merge only when these compare equal.
#[derive(Clone, Copy, Debug, PartialEq)]
struct MaskFace {
    direction: FaceDirection,
    attribute: FaceAttribute,
}

/// Performs greedy meshing on a lattice, sweeping axes X, Y, Z in order.
///
/// Every exposed face is covered by exactly one quad. An empty lattice
/// yields an empty mesh.
pub fn greedy_mesh<V: MeshVertex>(lattice: &Lattice) -> Mesh<V> {
    let size = lattice.extent();
    let mut mesh = Mesh::new();
    let mut mask: Vec<Option<MaskFace>> = vec![None; size * size];

    for axis in 0..3 {
        mesh_axis(lattice, axis, &mut mask, &mut mesh);
    }

    mesh
}

/// Same output as [`greedy_mesh`], with each axis swept on its own scoped thread.
///
/// The per-axis meshes are concatenated in axis order, so vertex and index
/// streams are identical to the sequential version.
pub fn greedy_mesh_parallel<V: MeshVertex>(lattice: &Lattice) -> Mesh<V> {
    let size = lattice.extent();
    let [x, y, z] = std::thread::scope(|scope| {
        let handles = [0, 1, 2].map(|axis| {
            scope.spawn(move || {
                let mut mesh = Mesh::<V>::new();
                let mut mask: Vec<Option<MaskFace>> = vec![None; size * size];
                mesh_axis(lattice, axis, &mut mask, &mut mesh);
                mesh
            })
        });
        handles.map(|handle| {
            handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
        })
    });

    let mut mesh = x;
    mesh.append(y);
    mesh.append(z);
    mesh
}

/// Sweeps plane indices `-1..size` along `axis`, emitting merged quads for
/// the boundary between each plane and the next.
fn mesh_axis<V: MeshVertex>(
    lattice: &Lattice,
    axis: usize,
    mask: &mut [Option<MaskFace>],
    mesh: &mut Mesh<V>,
) {
    let size = lattice.extent();
    let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);
    let origin = lattice.origin();

    for layer in -1..size as i32 {
        // Face-change mask between `layer` and `layer + 1`.
        for v in 0..size {
            for u in 0..size {
                let mut near = [0i32; 3];
                near[axis] = layer;
                near[u_axis] = u as i32;
                near[v_axis] = v as i32;
                let mut far = near;
                far[axis] += 1;
                mask[v * size + u] = mask_face(lattice, axis, near, far);
            }
        }

        for v in 0..size {
            let mut u = 0;
            while u < size {
                let Some(face) = mask[v * size + u] else {
                    u += 1;
                    continue;
                };

                // Extend width along u-axis.
                let mut w = 1;
                while u + w < size && mask[v * size + u + w] == Some(face) {
                    w += 1;
                }

                // Extend height along v-axis.
                let mut h = 1;
                'outer: while v + h < size {
                    for du in 0..w {
                        if mask[(v + h) * size + u + du] != Some(face) {
                            break 'outer;
                        }
                    }
                    h += 1;
                }

                // Consume.
                for dv in 0..h {
                    for du in 0..w {
                        mask[(v + dv) * size + u + du] = None;
                    }
                }

                mesh.push_quad(
                    Quad {
                        direction: face.direction,
                        plane: layer + 1,
                        u: u as i32,
                        v: v as i32,
                        width: w as u32,
                        height: h as u32,
                        attribute: face.attribute,
                    },
                    origin,
                );

                u += w;
            }
        }
    }
}

/// The face on the boundary between `near` and `far` (one step up `axis`),
/// if exactly one side is solid. It points away from the solid side and shows
/// the solid voxel's attribute.
fn mask_face(lattice: &Lattice, axis: usize, near: [i32; 3], far: [i32; 3]) -> Option<MaskFace> {
    let near_solid = lattice.is_solid(near);
    if near_solid == lattice.is_solid(far) {
        return None;
    }
    let (solid, direction) = if near_solid {
        (near, FaceDirection::from_axis(axis, true))
    } else {
        (far, FaceDirection::from_axis(axis, false))
    };
    let attribute = lattice
        .material(solid)
        .map_or(FaceAttribute::Color(DEFAULT_COLOR), |m| m.face(direction));
    Some(MaskFace {
        direction,
        attribute,
    })
}

#[cfg(test)]
mod tests {
    use cube_voxel::{Cube, FaceTextures, Material, Rgb, TextureId, VoxelGrid, Voxel};
    use glam::Vec3;

    use super::*;
    use crate::lattice::DEFAULT_WORKING_VOLUME;
    use crate::naive::naive_mesh;
    use crate::vertex_format::{ColorVertex, TexturedVertex};
    use crate::visibility::compute_visible_faces;

    const STONE: Rgb = Rgb::new(0.5, 0.5, 0.5);
    const DIRT: Rgb = Rgb::new(0.6, 0.4, 0.2);
    const SIZE: usize = DEFAULT_WORKING_VOLUME;

    fn lattice_of(cells: impl IntoIterator<Item = ([i32; 3], Rgb)>) -> Lattice {
        let mut lattice = Lattice::new(SIZE);
        for (pos, color) in cells {
            lattice.insert(pos, Material::Color(color));
        }
        lattice
    }

    /// Deterministic irregular blob with two colors.
    fn scattered() -> Lattice {
        let mut cells = Vec::new();
        for z in 0..SIZE as i32 {
            for y in 0..SIZE as i32 {
                for x in 0..SIZE as i32 {
                    let hash = (x * 73 + y * 151 + z * 283) % 7;
                    if hash < 3 || y < 2 {
                        let color = if (x / 3 + z / 4) % 2 == 0 { STONE } else { DIRT };
                        cells.push(([x, y, z], color));
                    }
                }
            }
        }
        lattice_of(cells)
    }

    #[test]
    fn test_single_voxel_produces_six_quads() {
        let lattice = lattice_of([([3, 4, 5], STONE)]);
        let mesh = greedy_mesh::<ColorVertex>(&lattice);
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for dir in FaceDirection::ALL {
            assert_eq!(mesh.count_quads_for_direction(dir), 1, "{dir:?}");
        }
    }

    #[test]
    fn test_single_voxel_faces_wind_outward() {
        let lattice = lattice_of([([3, 4, 5], STONE)]);
        let mesh = greedy_mesh::<ColorVertex>(&lattice);
        let center = Vec3::new(3.5, 4.5, 5.5);
        for tri in mesh.indices.chunks(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                normal.dot(centroid - center) > 0.0,
                "triangle {tri:?} faces into the voxel"
            );
        }
    }

    #[test]
    fn test_slab_merges_and_hides_shared_face() {
        let lattice = lattice_of([([1, 1, 1], STONE), ([2, 1, 1], STONE)]);
        let mesh = greedy_mesh::<ColorVertex>(&lattice);

        // Faces parallel to the shared boundary merge into one quad each.
        for dir in [
            FaceDirection::PosY,
            FaceDirection::NegY,
            FaceDirection::PosZ,
            FaceDirection::NegZ,
        ] {
            assert_eq!(mesh.count_quads_for_direction(dir), 1, "{dir:?}");
            assert_eq!(mesh.area_for_direction(dir), 2, "{dir:?}");
        }
        assert_eq!(mesh.quad_count(), 6);
        assert!(mesh.quad_count() < 12);

        // Nothing on the internal plane x = 2.
        assert!(
            mesh.quads
                .iter()
                .all(|q| !(q.direction.axis() == 0 && q.plane == 2))
        );
    }

    #[test]
    fn test_empty_lattice_produces_zero_quads() {
        let mesh = greedy_mesh::<ColorVertex>(&Lattice::new(SIZE));
        assert_eq!(mesh.vertices.len(), 0);
        assert_eq!(mesh.indices.len(), 0);
    }

    #[test]
    fn test_flat_surface_single_color_produces_one_quad() {
        let cells = (0..SIZE as i32).flat_map(|z| (0..SIZE as i32).map(move |x| ([x, 0, z], STONE)));
        let mesh = greedy_mesh::<ColorVertex>(&lattice_of(cells));
        assert_eq!(
            mesh.count_quads_for_direction(FaceDirection::PosY),
            1,
            "Flat surface should merge to 1 quad"
        );
        assert_eq!(mesh.area_for_direction(FaceDirection::PosY), (SIZE * SIZE) as u64);
    }

    #[test]
    fn test_checkerboard_produces_many_quads() {
        let cells = (0..SIZE as i32).flat_map(|z| {
            (0..SIZE as i32).map(move |x| {
                let color = if (x + z) % 2 == 0 { STONE } else { DIRT };
                ([x, 0, z], color)
            })
        });
        let mesh = greedy_mesh::<ColorVertex>(&lattice_of(cells));
        assert_eq!(
            mesh.count_quads_for_direction(FaceDirection::PosY),
            SIZE * SIZE,
            "Checkerboard colors must never merge"
        );
    }

    #[test]
    fn test_l_shaped_surface_produces_multiple_quads() {
        let mut cells: Vec<_> = (0..8).map(|x| ([x, 0, 0], STONE)).collect();
        cells.extend((1..8).map(|z| ([0, 0, z], STONE)));
        let mesh = greedy_mesh::<ColorVertex>(&lattice_of(cells));
        assert_eq!(mesh.count_quads_for_direction(FaceDirection::PosY), 2);
        assert_eq!(mesh.area_for_direction(FaceDirection::PosY), 15);
    }

    #[test]
    fn test_solid_volume_produces_six_face_quads() {
        let mut lattice = Lattice::new(SIZE);
        for z in 0..SIZE as i32 {
            for y in 0..SIZE as i32 {
                for x in 0..SIZE as i32 {
                    lattice.insert([x, y, z], Material::Color(STONE));
                }
            }
        }
        let mesh = greedy_mesh::<ColorVertex>(&lattice);
        for dir in FaceDirection::ALL {
            assert_eq!(mesh.count_quads_for_direction(dir), 1, "{dir:?}");
        }
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn test_boundary_voxel_always_has_neg_x_face() {
        let mut cells: Vec<_> = (1..SIZE as i32).map(|x| ([x, 3, 3], STONE)).collect();
        cells.push(([0, 3, 3], DIRT));
        let mesh = greedy_mesh::<ColorVertex>(&lattice_of(cells));
        let neg_x: Vec<_> = mesh
            .quads
            .iter()
            .filter(|q| q.direction == FaceDirection::NegX)
            .collect();
        assert_eq!(neg_x.len(), 1);
        assert_eq!(neg_x[0].plane, 0);
        assert_eq!(neg_x[0].attribute, FaceAttribute::Color(DIRT));

        let pos_x = mesh
            .quads
            .iter()
            .find(|q| q.direction == FaceDirection::PosX)
            .expect("far boundary face");
        assert_eq!(pos_x.plane, SIZE as i32);
    }

    #[test]
    fn test_quad_color_comes_from_solid_side() {
        let lattice = lattice_of([([2, 2, 2], DIRT)]);
        let mesh = greedy_mesh::<ColorVertex>(&lattice);
        assert!(mesh.vertices.iter().all(|v| v.color == DIRT.to_array()));
    }

    #[test]
    fn test_coverage_matches_per_voxel_baseline() {
        let lattice = scattered();
        let greedy = greedy_mesh::<ColorVertex>(&lattice);
        let naive = naive_mesh::<ColorVertex>(&lattice);
        let visible = compute_visible_faces(&lattice);

        for dir in FaceDirection::ALL {
            let expected = visible.iter().filter(|f| f.is_visible(dir)).count() as u64;
            assert_eq!(greedy.area_for_direction(dir), expected, "{dir:?}");
            assert_eq!(naive.area_for_direction(dir), expected, "{dir:?}");
        }
        assert!(greedy.quad_count() < naive.quad_count());
    }

    #[test]
    fn test_no_double_coverage() {
        let mesh = greedy_mesh::<ColorVertex>(&scattered());
        for (i, a) in mesh.quads.iter().enumerate() {
            for b in &mesh.quads[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let lattice = scattered();
        let first = greedy_mesh::<ColorVertex>(&lattice);
        let second = greedy_mesh::<ColorVertex>(&lattice);
        assert_eq!(first.vertices, second.vertices);
        assert_eq!(first.indices, second.indices);
        assert_eq!(first.quads, second.quads);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lattice = scattered();
        let sequential = greedy_mesh::<ColorVertex>(&lattice);
        let parallel = greedy_mesh_parallel::<ColorVertex>(&lattice);
        assert_eq!(sequential.vertices, parallel.vertices);
        assert_eq!(sequential.indices, parallel.indices);
        assert_eq!(sequential.quads, parallel.quads);
    }

    #[test]
    fn test_textured_faces_merge_per_face_texture() {
        let textures = FaceTextures {
            top: TextureId(7),
            ..FaceTextures::uniform(TextureId(1))
        };
        let mut grid = VoxelGrid::new(4, Vec3::ZERO);
        for x in 0..4 {
            grid.set_cell(x, 0, 0, Voxel::textured(textures));
        }
        let lattice = Lattice::from_source(4, &grid);
        let mesh = greedy_mesh::<TexturedVertex>(&lattice);

        let top: Vec<_> = mesh
            .quads
            .iter()
            .filter(|q| q.direction == FaceDirection::PosY)
            .collect();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].attribute, FaceAttribute::Texture(TextureId(7)));
        assert_eq!(top[0].area(), 4);
        assert!(
            mesh.quads
                .iter()
                .filter(|q| q.direction != FaceDirection::PosY)
                .all(|q| q.attribute == FaceAttribute::Texture(TextureId(1)))
        );
    }

    #[test]
    fn test_cube_list_input_uses_world_coordinates() {
        let cubes = vec![Cube::colored(2, 0, 0, STONE), Cube::colored(3, 0, 0, STONE)];
        let lattice = Lattice::from_source(SIZE, &cubes);
        let mesh = greedy_mesh::<ColorVertex>(&lattice);
        let min_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MAX, f32::min);
        let max_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!((min_x, max_x), (2.0, 4.0));
    }

    #[test]
    fn test_meshing_performance_full_volume() {
        let mut lattice = Lattice::new(32);
        for z in 0..32 {
            for y in 0..32 {
                for x in 0..32 {
                    if (x + y + z) % 2 == 0 {
                        lattice.insert([x, y, z], Material::Color(STONE));
                    }
                }
            }
        }

        let start = std::time::Instant::now();
        let _mesh = greedy_mesh::<ColorVertex>(&lattice);
        let elapsed = start.elapsed();

        assert!(
            elapsed.as_millis() < 2000,
            "Greedy meshing took {}ms, expected well under 2s even in debug builds",
            elapsed.as_millis()
        );
    }
}
