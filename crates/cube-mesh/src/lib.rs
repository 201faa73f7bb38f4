//! Meshing algorithms: greedy quad merging, the per-voxel baseline, and the
//! mesh buffers handed to the renderer.

pub mod greedy;
pub mod lattice;
pub mod mesh;
pub mod mesher;
pub mod naive;
pub mod vertex_format;
pub mod visibility;

pub use cube_voxel::{FaceDirection, VisibleFaces};
pub use greedy::{greedy_mesh, greedy_mesh_parallel};
pub use lattice::{DEFAULT_WORKING_VOLUME, Lattice, MAX_WORKING_VOLUME, VoxelSource, working_extent};
pub use mesh::{Mesh, MeshStats, QUAD_WINDING, Quad};
pub use mesher::{CubeMesher, GreedyMesher, Mesher};
pub use naive::naive_mesh;
pub use vertex_format::{
    COLOR_VERTEX_LAYOUT, ColorVertex, MeshVertex, QuadCorner, TEXTURED_VERTEX_LAYOUT,
    TexturedVertex,
};
pub use visibility::{compute_visible_faces, count_visible_faces};
