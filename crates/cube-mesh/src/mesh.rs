//! Mesh buffers produced by a meshing pass: vertices, triangle indices, and
//! one [`Quad`] record per emitted face rectangle.

use cube_voxel::{FaceAttribute, FaceDirection};
use glam::Vec3;
use serde::Serialize;

use crate::vertex_format::{MeshVertex, QuadCorner};

/// `[2, 1, 0, 2, 3, 1]`: both triangles share the 1–2 diagonal.
const WINDING_A: [u32; 6] = [2, 1, 0, 2, 3, 1];
/// `[0, 2, 1, 1, 2, 3]`: same diagonal, rotated start.
const WINDING_B: [u32; 6] = [0, 2, 1, 1, 2, 3];

/// Per-direction triangle order, indexed by [`FaceDirection::index`].
///
/// Indices are relative to the quad's first vertex. Combined with the corner
/// order of [`Mesh::push_quad`], every triangle is counter-clockwise when seen
/// from outside the solid.
pub const QUAD_WINDING: [[u32; 6]; 6] = [
    WINDING_B, // +X
    WINDING_A, // −X
    WINDING_A, // +Y
    WINDING_B, // −Y
    WINDING_B, // +Z
    WINDING_A, // −Z
];

/// One emitted face rectangle in lattice coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Outward face direction.
    pub direction: FaceDirection,
    /// Coordinate of the face plane along the direction's axis.
    pub plane: i32,
    /// Minimum corner along the sweep `u` axis.
    pub u: i32,
    /// Minimum corner along the sweep `v` axis.
    pub v: i32,
    /// Extent along `u`.
    pub width: u32,
    /// Extent along `v`.
    pub height: u32,
    /// Color or texture shown by the whole quad.
    pub attribute: FaceAttribute,
}

impl Quad {
    /// Face area in voxel faces.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns `true` if the two quads lie on the same oriented plane and
    /// their `(u, v)` rectangles intersect.
    pub fn overlaps(&self, other: &Quad) -> bool {
        self.direction == other.direction
            && self.plane == other.plane
            && self.u < other.u + other.width as i32
            && other.u < self.u + self.width as i32
            && self.v < other.v + other.height as i32
            && other.v < self.v + self.height as i32
    }

    /// Corner lattice positions and uvs in emission order.
    ///
    /// Faces pointing down their axis list the `u` extent first; faces
    /// pointing up the axis swap the extents so the winding tables flip the
    /// normal.
    fn corners(&self) -> [([i32; 3], [f32; 2]); 4] {
        let (d, u_axis, v_axis) = self.direction.sweep_axes();
        let (w, h) = (self.width as i32, self.height as i32);
        let offsets = if self.direction.is_positive() {
            [(0, 0), (0, h), (w, 0), (w, h)]
        } else {
            [(0, 0), (w, 0), (0, h), (w, h)]
        };
        offsets.map(|(du, dv)| {
            let mut pos = [0i32; 3];
            pos[d] = self.plane;
            pos[u_axis] = self.u + du;
            pos[v_axis] = self.v + dv;
            (pos, [du as f32, dv as f32])
        })
    }
}

/// Summary counts for a mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MeshStats {
    /// Emitted quads.
    pub quads: usize,
    /// Vertex count.
    pub vertices: usize,
    /// Index count.
    pub indices: usize,
    /// Triangle count.
    pub triangles: usize,
    /// Total face area in voxel faces.
    pub area: u64,
}

/// The mesh output of a meshing pass.
///
/// Contains vertex data and triangle indices ready for GPU upload. A mesh is
/// never patched: every rebuild produces a new one.
#[derive(Clone, Debug)]
pub struct Mesh<V> {
    /// Vertex buffer, four vertices per quad.
    pub vertices: Vec<V>,
    /// Index buffer (triangles, six indices per quad).
    pub indices: Vec<u32>,
    /// One entry per quad, in emission order.
    pub quads: Vec<Quad>,
}

impl<V: MeshVertex> Mesh<V> {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            quads: Vec::new(),
        }
    }

    /// Appends one quad, offsetting every vertex by `origin`.
    pub fn push_quad(&mut self, quad: Quad, origin: Vec3) {
        let base = self.vertices.len() as u32;
        for (pos, uv) in quad.corners() {
            let position = origin + Vec3::new(pos[0] as f32, pos[1] as f32, pos[2] as f32);
            self.vertices.push(V::from_corner(&QuadCorner {
                position: position.to_array(),
                uv,
                direction: quad.direction,
                attribute: quad.attribute,
            }));
        }
        self.indices.extend(
            QUAD_WINDING[quad.direction.index()]
                .iter()
                .map(|i| base + i),
        );
        self.quads.push(quad);
    }

    /// Moves all of `other` onto the end of this mesh, rebasing its indices.
    pub fn append(&mut self, mut other: Mesh<V>) {
        let base = self.vertices.len() as u32;
        self.vertices.append(&mut other.vertices);
        self.indices.extend(other.indices.iter().map(|i| base + i));
        self.quads.append(&mut other.quads);
    }

    /// The six indices of quad `n`.
    pub fn quad_indices(&self, n: usize) -> &[u32] {
        &self.indices[n * 6..n * 6 + 6]
    }

    /// Counts the number of quads emitted for a specific face direction.
    pub fn count_quads_for_direction(&self, direction: FaceDirection) -> usize {
        self.quads
            .iter()
            .filter(|q| q.direction == direction)
            .count()
    }

    /// Total face area covered in one direction.
    pub fn area_for_direction(&self, direction: FaceDirection) -> u64 {
        self.quads
            .iter()
            .filter(|q| q.direction == direction)
            .map(Quad::area)
            .sum()
    }

    /// Returns the total number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Returns `true` if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Summary counts.
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            quads: self.quads.len(),
            vertices: self.vertices.len(),
            indices: self.indices.len(),
            triangles: self.indices.len() / 3,
            area: self.quads.iter().map(Quad::area).sum(),
        }
    }

    /// Vertex buffer as flat floats, in emission order.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Vertex buffer as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl<V: MeshVertex> Default for Mesh<V> {
    fn default() -> Self {
        Self::new()
    }
}
