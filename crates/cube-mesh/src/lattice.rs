//! The mesher's working volume: dense occupancy plus a sparse material lookup.
//!
//! Every voxel source is rasterized into a [`Lattice`] before meshing. Input
//! outside `[0, extent)³` is dropped, and off-lattice reads are empty, so the
//! lattice boundary behaves exactly like the grid's air boundary.
//!
//! Meshers size their lattice with [`working_extent`], which grows the
//! configured volume to the extent the source reports it needs.

use cube_voxel::{Cube, Material, VoxelGrid};
use glam::Vec3;
use rustc_hash::FxHashMap;

/// Working volume used when the caller does not choose one.
pub const DEFAULT_WORKING_VOLUME: usize = 15;

/// Largest side length a working volume grows to. Sources reaching further
/// are clipped.
pub const MAX_WORKING_VOLUME: usize = 256;

/// Side length of the working volume for `source`: at least `floor`, grown to
/// fit the source, capped at [`MAX_WORKING_VOLUME`] unless `floor` is larger.
pub fn working_extent(floor: usize, source: &dyn VoxelSource) -> usize {
    floor.max(source.required_extent().min(MAX_WORKING_VOLUME))
}

/// Dense `extent³` occupancy with materials for the occupied cells.
#[derive(Clone, Debug)]
pub struct Lattice {
    extent: usize,
    /// Occupancy, x varying fastest.
    solid: Vec<bool>,
    /// Material of every occupied cell.
    materials: FxHashMap<[i32; 3], Material>,
    /// World-space offset added to every emitted vertex.
    origin: Vec3,
}

impl Lattice {
    /// Creates an empty lattice of `extent³` cells at the world origin.
    pub fn new(extent: usize) -> Self {
        Self {
            extent,
            solid: vec![false; extent * extent * extent],
            materials: FxHashMap::default(),
            origin: Vec3::ZERO,
        }
    }

    /// Creates a lattice and rasterizes `source` into it.
    pub fn from_source(extent: usize, source: &dyn VoxelSource) -> Self {
        let mut lattice = Self::new(extent);
        source.rasterize_into(&mut lattice);
        lattice
    }

    /// Like [`Lattice::from_source`], with the extent grown to fit `source`.
    pub fn fitted(floor: usize, source: &dyn VoxelSource) -> Self {
        Self::from_source(working_extent(floor, source), source)
    }

    /// Side length in cells.
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// World-space offset of cell `(0, 0, 0)`.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Moves the lattice in world space without touching its cells.
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Returns `true` if `pos` lies inside the working volume.
    pub fn contains(&self, pos: [i32; 3]) -> bool {
        let n = self.extent as i64;
        pos.iter().all(|&c| (0..n).contains(&i64::from(c)))
    }

    /// Marks `pos` solid with `material`. A later insert at the same cell wins.
    ///
    /// Returns `false` and changes nothing when `pos` is outside the volume.
    pub fn insert(&mut self, pos: [i32; 3], material: Material) -> bool {
        let Some(index) = self.linear_index(pos) else {
            return false;
        };
        self.solid[index] = true;
        self.materials.insert(pos, material);
        true
    }

    /// Returns `true` if `pos` is occupied. Off-lattice cells are empty.
    pub fn is_solid(&self, pos: [i32; 3]) -> bool {
        self.linear_index(pos).is_some_and(|index| self.solid[index])
    }

    /// Returns the material recorded for `pos`, if any.
    pub fn material(&self, pos: [i32; 3]) -> Option<&Material> {
        self.materials.get(&pos)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns `true` if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Empties every cell and resets the origin.
    pub fn clear(&mut self) {
        self.solid.fill(false);
        self.materials.clear();
        self.origin = Vec3::ZERO;
    }

    fn linear_index(&self, pos: [i32; 3]) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let n = self.extent;
        Some(pos[0] as usize + pos[1] as usize * n + pos[2] as usize * n * n)
    }
}

/// Anything that can be rasterized into a [`Lattice`].
pub trait VoxelSource {
    /// Writes every solid voxel into `lattice`. Voxels outside its volume are dropped.
    fn rasterize_into(&self, lattice: &mut Lattice);

    /// Smallest extent whose volume holds every voxel at non-negative
    /// coordinates. Zero for an empty source.
    fn required_extent(&self) -> usize;
}

impl VoxelSource for VoxelGrid {
    fn required_extent(&self) -> usize {
        self.size()
    }

    fn rasterize_into(&self, lattice: &mut Lattice) {
        lattice.set_origin(self.world_position());
        let mut dropped = 0usize;
        for (pos, material) in self.iter_solid() {
            if !lattice.insert(pos, material) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::trace!(
                dropped,
                extent = lattice.extent(),
                "grid voxels outside working volume"
            );
        }
    }
}

impl VoxelSource for [Cube] {
    fn required_extent(&self) -> usize {
        self.iter()
            .filter(|cube| !cube.is_empty())
            .filter_map(|cube| cube.cell().into_iter().max())
            .filter(|&max| max >= 0)
            .map(|max| max as usize + 1)
            .max()
            .unwrap_or(0)
    }

    fn rasterize_into(&self, lattice: &mut Lattice) {
        let mut dropped = 0usize;
        for cube in self.iter().filter(|cube| !cube.is_empty()) {
            if !lattice.insert(cube.cell(), cube.material) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::trace!(
                dropped,
                extent = lattice.extent(),
                "cubes outside working volume"
            );
        }
    }
}

impl VoxelSource for Vec<Cube> {
    fn required_extent(&self) -> usize {
        self.as_slice().required_extent()
    }

    fn rasterize_into(&self, lattice: &mut Lattice) {
        self.as_slice().rasterize_into(lattice);
    }
}
