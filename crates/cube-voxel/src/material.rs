//! Voxel cell values: empty or solid with a color or per-face textures.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::face_direction::FaceDirection;

/// Handle to a texture owned by the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// One texture per cube face, named the way block art is authored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceTextures {
    /// +Z face.
    pub front: TextureId,
    /// −Z face.
    pub back: TextureId,
    /// −X face.
    pub left: TextureId,
    /// +X face.
    pub right: TextureId,
    /// +Y face.
    pub top: TextureId,
    /// −Y face.
    pub bottom: TextureId,
}

impl FaceTextures {
    /// The same texture on all six faces.
    pub fn uniform(texture: TextureId) -> Self {
        Self {
            front: texture,
            back: texture,
            left: texture,
            right: texture,
            top: texture,
            bottom: texture,
        }
    }

    /// Returns the texture shown on the face pointing in `direction`.
    pub fn get(&self, direction: FaceDirection) -> TextureId {
        match direction {
            FaceDirection::PosX => self.right,
            FaceDirection::NegX => self.left,
            FaceDirection::PosY => self.top,
            FaceDirection::NegY => self.bottom,
            FaceDirection::PosZ => self.front,
            FaceDirection::NegZ => self.back,
        }
    }
}

/// What a solid voxel looks like.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Flat vertex color.
    Color(Rgb),
    /// A texture per face.
    Textured(FaceTextures),
}

impl Material {
    /// Resolves the attribute shown on the face pointing in `direction`.
    pub fn face(&self, direction: FaceDirection) -> FaceAttribute {
        match self {
            Self::Color(color) => FaceAttribute::Color(*color),
            Self::Textured(textures) => FaceAttribute::Texture(textures.get(direction)),
        }
    }
}

impl From<Rgb> for Material {
    fn from(color: Rgb) -> Self {
        Self::Color(color)
    }
}

/// The attribute one face displays. Faces merge only when these are equal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FaceAttribute {
    /// Flat color.
    Color(Rgb),
    /// Texture handle.
    Texture(TextureId),
}

impl FaceAttribute {
    /// Returns the color for colored faces, `None` for textured ones.
    pub fn color(&self) -> Option<Rgb> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Texture(_) => None,
        }
    }

    /// Returns the texture for textured faces, `None` for colored ones.
    pub fn texture(&self) -> Option<TextureId> {
        match self {
            Self::Texture(texture) => Some(*texture),
            Self::Color(_) => None,
        }
    }
}

/// A single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Voxel {
    /// Air. Also what every off-grid coordinate reads as.
    #[default]
    Empty,
    /// Occupied cell.
    Solid(Material),
}

impl Voxel {
    /// A solid voxel with a flat color.
    pub fn colored(color: Rgb) -> Self {
        Self::Solid(Material::Color(color))
    }

    /// A solid voxel with one texture on every face.
    pub fn textured(textures: FaceTextures) -> Self {
        Self::Solid(Material::Textured(textures))
    }

    /// Returns `true` for [`Voxel::Solid`].
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid(_))
    }

    /// Returns the material of a solid voxel.
    pub fn material(&self) -> Option<&Material> {
        match self {
            Self::Solid(material) => Some(material),
            Self::Empty => None,
        }
    }
}
