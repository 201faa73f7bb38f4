//! Mesher objects that own their last output and rebuild it on demand.

use std::time::Instant;

use crate::greedy::{greedy_mesh, greedy_mesh_parallel};
use crate::lattice::{DEFAULT_WORKING_VOLUME, Lattice, VoxelSource};
use crate::mesh::Mesh;
use crate::naive::naive_mesh;
use crate::vertex_format::{ColorVertex, MeshVertex};

/// Turns a voxel source into a mesh, keeping the result until the next rebuild.
pub trait Mesher<V: MeshVertex> {
    /// Discards the previous mesh and builds a new one from `source`.
    fn rebuild(&mut self, source: &dyn VoxelSource) -> &Mesh<V>;

    /// The mesh from the most recent rebuild (empty before the first).
    fn mesh(&self) -> &Mesh<V>;
}

/// Greedy mesher. The working volume is at least `extent³` and grows to fit
/// each source it rebuilds.
#[derive(Clone, Debug)]
pub struct GreedyMesher<V = ColorVertex> {
    extent: usize,
    parallel: bool,
    mesh: Mesh<V>,
}

impl<V: MeshVertex> GreedyMesher<V> {
    /// Creates a mesher with the default 15³ minimum working volume.
    pub fn new() -> Self {
        Self::with_extent(DEFAULT_WORKING_VOLUME)
    }

    /// Creates a mesher with an `extent³` minimum working volume.
    pub fn with_extent(extent: usize) -> Self {
        Self {
            extent,
            parallel: false,
            mesh: Mesh::new(),
        }
    }

    /// Sweeps the three axes on separate threads when enabled.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Minimum working volume side length.
    pub fn extent(&self) -> usize {
        self.extent
    }
}

impl<V: MeshVertex> Default for GreedyMesher<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: MeshVertex> Mesher<V> for GreedyMesher<V> {
    fn rebuild(&mut self, source: &dyn VoxelSource) -> &Mesh<V> {
        let start = Instant::now();
        let lattice = Lattice::fitted(self.extent, source);
        self.mesh = if self.parallel {
            greedy_mesh_parallel(&lattice)
        } else {
            greedy_mesh(&lattice)
        };
        tracing::debug!(
            voxels = lattice.len(),
            extent = lattice.extent(),
            quads = self.mesh.quad_count(),
            vertices = self.mesh.vertices.len(),
            parallel = self.parallel,
            elapsed_us = start.elapsed().as_micros() as u64,
            "greedy mesh rebuilt"
        );
        &self.mesh
    }

    fn mesh(&self) -> &Mesh<V> {
        &self.mesh
    }
}

/// One quad per visible voxel face. Sizes its working volume like [`GreedyMesher`].
#[derive(Clone, Debug)]
pub struct CubeMesher<V = ColorVertex> {
    extent: usize,
    mesh: Mesh<V>,
}

impl<V: MeshVertex> CubeMesher<V> {
    pub fn new() -> Self {
        Self::with_extent(DEFAULT_WORKING_VOLUME)
    }

    pub fn with_extent(extent: usize) -> Self {
        Self {
            extent,
            mesh: Mesh::new(),
        }
    }

    pub fn extent(&self) -> usize {
        self.extent
    }
}

impl<V: MeshVertex> Default for CubeMesher<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: MeshVertex> Mesher<V> for CubeMesher<V> {
    fn rebuild(&mut self, source: &dyn VoxelSource) -> &Mesh<V> {
        let start = Instant::now();
        let lattice = Lattice::fitted(self.extent, source);
        self.mesh = naive_mesh(&lattice);
        tracing::debug!(
            voxels = lattice.len(),
            extent = lattice.extent(),
            quads = self.mesh.quad_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "per-voxel mesh rebuilt"
        );
        &self.mesh
    }

    fn mesh(&self) -> &Mesh<V> {
        &self.mesh
    }
}
