//! Linear RGB colors used by colored voxels and colored mesh vertices.

use serde::{Deserialize, Serialize};

/// Fallback color for faces whose solid voxel has no recorded color.
pub const DEFAULT_COLOR: Rgb = Rgb::new(1.0, 0.0, 0.0);

/// An RGB color with each channel in `[0.0, 1.0]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a color from float channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Converts 8-bit channels to floats (`255` maps to `1.0`).
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: f32::from(rgba[0]) / 255.0,
            g: f32::from(rgba[1]) / 255.0,
            b: f32::from(rgba[2]) / 255.0,
        }
    }

    /// Converts to 8-bit channels with an opaque alpha.
    ///
    /// Channels are clamped to `[0, 1]` before scaling.
    pub fn to_rgba8(self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b), 255]
    }

    /// Returns the channels as an array, in vertex attribute order.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}
