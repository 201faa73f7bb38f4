//! Scene state for the viewer: typed input events, the channel bus that
//! carries them, and the per-frame update that rebuilds the mesh when the
//! voxel world changes.

pub mod bus;
pub mod events;
pub mod scene;

pub use bus::{BusError, EventBus, EventPublisher, Subscription};
pub use events::{SceneEvent, Topic};
pub use scene::{
    FrameStatus, MeshBuffers, MeshSink, Projection, Scene, SceneMesher, ViewState, VoxelWorld,
};
