//! Scene events published by input handling and consumed by the scene.

use cube_voxel::{Cube, Voxel};

/// Coarse event category, used to filter subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    Camera,
    Pointer,
    View,
    World,
    Window,
}

/// One input or world-edit event.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    /// Translate the camera by a camera-relative delta.
    CameraMove { dx: f32, dy: f32, dz: f32 },
    /// Cursor moved; `dy` is positive upward.
    MouseMovement { dx: f32, dy: f32 },
    /// Primary button pressed at a cursor position in window pixels.
    LeftClick { x: f32, y: f32 },
    /// Flip between filled and wireframe rendering.
    ToggleWireframe,
    /// The window asked to close.
    RequestClose,
    /// Overwrite one grid cell (or the cube at that cell in a cube list).
    SetVoxel { x: i32, y: i32, z: i32, voxel: Voxel },
    /// Add a cube to the world.
    AddCube(Cube),
    /// Viewport resized, in physical pixels.
    Resize { width: u32, height: u32 },
}

impl SceneEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::CameraMove { .. } => Topic::Camera,
            Self::MouseMovement { .. } | Self::LeftClick { .. } => Topic::Pointer,
            Self::ToggleWireframe => Topic::View,
            Self::SetVoxel { .. } | Self::AddCube(_) => Topic::World,
            Self::RequestClose | Self::Resize { .. } => Topic::Window,
        }
    }

    /// Returns `true` for events that can change the voxel world and so
    /// require a mesh rebuild.
    pub fn edits_world(&self) -> bool {
        self.topic() == Topic::World
    }
}
