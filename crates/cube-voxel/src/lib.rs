//! Voxel value types, face directions, and the fixed-size voxel grid that feeds the meshers.

pub mod color;
pub mod cube;
pub mod face_direction;
pub mod grid;
pub mod material;
pub mod visible_faces;

pub use color::{DEFAULT_COLOR, Rgb};
pub use cube::Cube;
pub use face_direction::FaceDirection;
pub use grid::{CHUNK_SIZE, VoxelGrid};
pub use material::{FaceAttribute, FaceTextures, Material, TextureId, Voxel};
pub use visible_faces::VisibleFaces;
