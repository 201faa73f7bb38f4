//! Greedy-versus-baseline statistics for a scene.

use cube_mesh::{ColorVertex, CubeMesher, GreedyMesher, Lattice, MeshStats, Mesher, VoxelSource};
use serde::Serialize;

use crate::scenes::SceneKind;

/// Mesh statistics for one scene under both meshers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeshReport {
    pub scene: SceneKind,
    /// Working volume side length, after growing to fit the scene.
    pub extent: usize,
    /// Voxels inside the working volume.
    pub voxels: usize,
    pub greedy: MeshStats,
    pub naive: MeshStats,
    /// `naive.quads / greedy.quads`, or 1 for empty scenes.
    pub quad_reduction: f64,
}

impl MeshReport {
    /// Meshes `source` with both meshers, starting from an `extent³` volume.
    pub fn measure(scene: SceneKind, source: &dyn VoxelSource, extent: usize, parallel: bool) -> Self {
        let lattice = Lattice::fitted(extent, source);
        let voxels = lattice.len();
        let extent = lattice.extent();
        let greedy = GreedyMesher::<ColorVertex>::with_extent(extent)
            .parallel(parallel)
            .rebuild(source)
            .stats();
        let naive = CubeMesher::<ColorVertex>::with_extent(extent)
            .rebuild(source)
            .stats();
        let quad_reduction = if greedy.quads == 0 {
            1.0
        } else {
            naive.quads as f64 / greedy.quads as f64
        };
        Self {
            scene,
            extent,
            voxels,
            greedy,
            naive,
            quad_reduction,
        }
    }

    /// Both meshers must cover exactly the same face area.
    pub fn coverage_matches(&self) -> bool {
        self.greedy.area == self.naive.area
    }
}
