//! Fixed-size voxel grid with bounds-clamped access, face exposure queries,
//! and a mesh dirty flag.
//!
//! [`VoxelGrid`] stores `N³` cells densely. Every coordinate outside `[0, N)`
//! reads as [`Voxel::Empty`]; this "air" boundary is what makes faces on the
//! grid edge count as exposed.

use glam::Vec3;

use crate::face_direction::FaceDirection;
use crate::material::{Material, Voxel};
use crate::visible_faces::VisibleFaces;

/// Side length of a standard chunk in voxels.
pub const CHUNK_SIZE: usize = 16;

/// A dense `size³` voxel lattice anchored at a fixed world position.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    /// Cells, x varying fastest.
    cells: Vec<Voxel>,
    /// Side length.
    size: usize,
    /// World-space offset of local cell `(0, 0, 0)`.
    position: Vec3,
    /// Set on every mutation, cleared by whoever rebuilds the mesh.
    mesh_dirty: bool,
    /// Monotonically increasing version counter, incremented on each mutation.
    version: u64,
}

impl VoxelGrid {
    /// Creates an empty grid of `size³` cells at `position`.
    ///
    /// A new grid starts dirty so the first frame meshes it.
    pub fn new(size: usize, position: Vec3) -> Self {
        Self {
            cells: vec![Voxel::Empty; size * size * size],
            size,
            position,
            mesh_dirty: true,
            version: 0,
        }
    }

    /// Creates an empty [`CHUNK_SIZE`] grid at `position`.
    pub fn chunk(position: Vec3) -> Self {
        Self::new(CHUNK_SIZE, position)
    }

    /// Side length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the fixed world-space origin of the grid.
    pub fn world_position(&self) -> Vec3 {
        self.position
    }

    /// Returns `true` if `(x, y, z)` lies inside `[0, size)³`.
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        let n = self.size as i64;
        [x, y, z].iter().all(|&c| (0..n).contains(&i64::from(c)))
    }

    /// Returns the cell at `(x, y, z)`, or [`Voxel::Empty`] off-grid.
    pub fn get_cell(&self, x: i32, y: i32, z: i32) -> Voxel {
        match self.linear_index(x, y, z) {
            Some(index) => self.cells[index],
            None => Voxel::Empty,
        }
    }

    /// Stores `voxel` at `(x, y, z)`.
    ///
    /// Off-grid writes are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) {
        let Some(index) = self.linear_index(x, y, z) else {
            tracing::trace!("VoxelGrid::set_cell out of bounds: ({}, {}, {})", x, y, z);
            return;
        };
        self.cells[index] = voxel;
        self.touch();
    }

    /// Returns `true` if the cell at `(x, y, z)` is solid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_cell(x, y, z).is_solid()
    }

    /// Returns `true` if no solid neighbor covers the face of `(x, y, z)`
    /// pointing in `direction`. Off-grid neighbors are empty.
    pub fn is_face_exposed(&self, x: i32, y: i32, z: i32, direction: FaceDirection) -> bool {
        let (nx, ny, nz) = direction.offset(x, y, z);
        !self.is_solid(nx, ny, nz)
    }

    /// Exposed faces of the cell at `(x, y, z)`; [`VisibleFaces::NONE`] for empty cells.
    pub fn visible_faces(&self, x: i32, y: i32, z: i32) -> VisibleFaces {
        let mut faces = VisibleFaces::NONE;
        if !self.is_solid(x, y, z) {
            return faces;
        }
        for dir in FaceDirection::ALL {
            if self.is_face_exposed(x, y, z, dir) {
                faces.set_visible(dir);
            }
        }
        faces
    }

    /// Sets every cell to `voxel`.
    pub fn fill(&mut self, voxel: Voxel) {
        self.cells.fill(voxel);
        self.touch();
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.fill(Voxel::Empty);
    }

    /// Number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|v| v.is_solid()).count()
    }

    /// Iterates solid cells as `([x, y, z], material)` with x varying fastest.
    pub fn iter_solid(&self) -> impl Iterator<Item = ([i32; 3], Material)> + '_ {
        let n = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, voxel)| {
            let material = *voxel.material()?;
            let x = (i % n) as i32;
            let y = ((i / n) % n) as i32;
            let z = (i / (n * n)) as i32;
            Some(([x, y, z], material))
        })
    }

    /// Returns `true` if the grid changed since the mesh was last rebuilt.
    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    /// Forces a rebuild on the next update.
    pub fn mark_mesh_dirty(&mut self) {
        self.mesh_dirty = true;
    }

    /// Called after the mesh has been rebuilt.
    pub fn clear_mesh_dirty(&mut self) {
        self.mesh_dirty = false;
    }

    /// Returns the current version counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.mesh_dirty = true;
        self.version += 1;
    }

    /// Converts `(x, y, z)` to a linear index (x varies fastest).
    fn linear_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let n = self.size;
        Some(x as usize + y as usize * n + z as usize * n * n)
    }
}
