//! Vertex formats produced by the meshers and their `wgpu::VertexBufferLayout`s.
//!
//! ## Colored layout (24 bytes)
//!
//! | Location | Offset | Format    | Fields      |
//! |----------|--------|-----------|-------------|
//! | 0        | 0      | Float32x3 | position    |
//! | 1        | 12     | Float32x3 | color (rgb) |
//!
//! ## Textured layout (32 bytes)
//!
//! | Location | Offset | Format    | Fields   |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x3 | position |
//! | 1        | 12     | Float32x2 | uv       |
//! | 2        | 20     | Float32x3 | normal   |

use std::mem;

use cube_voxel::{DEFAULT_COLOR, FaceAttribute, FaceDirection};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Everything a vertex format may need to know about one quad corner.
#[derive(Clone, Copy, Debug)]
pub struct QuadCorner {
    /// World-space position.
    pub position: [f32; 3],
    /// Texture coordinates, tiling once per voxel across merged quads.
    pub uv: [f32; 2],
    /// Outward face direction.
    pub direction: FaceDirection,
    /// Color or texture shown by the quad.
    pub attribute: FaceAttribute,
}

/// A vertex the meshers can emit.
pub trait MeshVertex: bytemuck::Pod + Send {
    /// Number of `f32` values per vertex.
    const FLOATS: usize;

    /// Builds the vertex for one quad corner.
    fn from_corner(corner: &QuadCorner) -> Self;

    /// Position, for analysis and tests.
    fn position(&self) -> [f32; 3];
}

/// `[x, y, z, r, g, b]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(ColorVertex, [f32; 6]);

impl MeshVertex for ColorVertex {
    const FLOATS: usize = 6;

    /// Textured faces have no color and fall back to [`DEFAULT_COLOR`].
    fn from_corner(corner: &QuadCorner) -> Self {
        let color = corner.attribute.color().unwrap_or(DEFAULT_COLOR);
        Self {
            position: corner.position,
            color: color.to_array(),
        }
    }

    fn position(&self) -> [f32; 3] {
        self.position
    }
}

/// `[x, y, z, u, v, nx, ny, nz]`.
///
/// The texture itself is not part of the vertex; the renderer looks it up per
/// quad from [`crate::Quad::attribute`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Outward unit normal.
    pub normal: [f32; 3],
}

static_assertions::assert_eq_size!(TexturedVertex, [f32; 8]);

impl MeshVertex for TexturedVertex {
    const FLOATS: usize = 8;

    fn from_corner(corner: &QuadCorner) -> Self {
        Self {
            position: corner.position,
            uv: corner.uv,
            normal: corner.direction.normal(),
        }
    }

    fn position(&self) -> [f32; 3] {
        self.position
    }
}

/// Attributes of [`ColorVertex`].
pub const COLOR_VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
];

/// Buffer layout for [`ColorVertex`] meshes.
pub const COLOR_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<ColorVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &COLOR_VERTEX_ATTRIBUTES,
};

/// Attributes of [`TexturedVertex`].
pub const TEXTURED_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 20,
        shader_location: 2,
    },
];

/// Buffer layout for [`TexturedVertex`] meshes.
pub const TEXTURED_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<TexturedVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &TEXTURED_VERTEX_ATTRIBUTES,
};

// ---------------------------------------------------------------------------
// Compile-time validation
// ---------------------------------------------------------------------------

const _: () = assert!(
    mem::size_of::<ColorVertex>() == ColorVertex::FLOATS * 4,
    "ColorVertex size changed, update COLOR_VERTEX_LAYOUT"
);
const _: () = assert!(
    mem::size_of::<TexturedVertex>() == TexturedVertex::FLOATS * 4,
    "TexturedVertex size changed, update TEXTURED_VERTEX_LAYOUT"
);
const _: () = assert!(TEXTURED_VERTEX_ATTRIBUTES[2].offset + 12 == 32);

#[cfg(test)]
mod tests {
    use cube_voxel::{Rgb, TextureId};

    use super::*;

    fn corner(attribute: FaceAttribute) -> QuadCorner {
        QuadCorner {
            position: [1.0, 2.0, 3.0],
            uv: [2.0, 1.0],
            direction: FaceDirection::NegY,
            attribute,
        }
    }

    #[test]
    fn test_color_vertex_packs_position_then_color() {
        let v = ColorVertex::from_corner(&corner(FaceAttribute::Color(Rgb::new(0.1, 0.2, 0.3))));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_color_vertex_falls_back_for_textures() {
        let v = ColorVertex::from_corner(&corner(FaceAttribute::Texture(TextureId(9))));
        assert_eq!(v.color, DEFAULT_COLOR.to_array());
    }

    #[test]
    fn test_textured_vertex_packs_position_uv_normal() {
        let v = TexturedVertex::from_corner(&corner(FaceAttribute::Texture(TextureId(9))));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 2.0, 1.0, 0.0, -1.0, 0.0]);
    }

    #[test]
    fn test_layout_strides_match_structs() {
        assert_eq!(COLOR_VERTEX_LAYOUT.array_stride, 24);
        assert_eq!(TEXTURED_VERTEX_LAYOUT.array_stride, 32);
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        for (i, attr) in TEXTURED_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
        for (i, attr) in COLOR_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_color_layout_is_valid_for_wgpu_pipeline() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            force_fallback_adapter: true,
            ..Default::default()
        }));

        let Ok(adapter) = adapter else {
            // Headless machine without an adapter.
            return;
        };

        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
                .expect("failed to create device");

        let shader_source = r#"
            struct VsOut {
                @builtin(position) clip: vec4<f32>,
                @location(0) color: vec3<f32>,
            };

            @vertex
            fn vs_main(
                @location(0) position: vec3<f32>,
                @location(1) color: vec3<f32>,
            ) -> VsOut {
                var out: VsOut;
                out.clip = vec4<f32>(position, 1.0);
                out.color = color;
                return out;
            }

            @fragment
            fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
                return vec4<f32>(in.color, 1.0);
            }
        "#;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_color_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let _pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("test_color_pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[COLOR_VERTEX_LAYOUT],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
    }
}
