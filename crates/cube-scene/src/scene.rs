//! The single-threaded scene update step.
//!
//! Each frame the scene drains its subscription, applies the events, and if
//! the voxel world changed rebuilds the whole mesh and hands it to the
//! [`MeshSink`]. Meshes are never patched in place.

use cube_config::{Config, MeshConfig, MesherKind, RenderConfig};
use cube_mesh::{ColorVertex, CubeMesher, GreedyMesher, Mesh, MeshStats, Mesher, VoxelSource};
use cube_voxel::{Cube, Voxel, VoxelGrid};
use glam::{Mat4, UVec2, Vec2, Vec3};

use crate::bus::{EventBus, Subscription};
use crate::events::SceneEvent;

/// The render collaborator's side of a rebuild.
pub trait MeshSink {
    /// Replaces every previously uploaded vertex and index with these.
    fn replace_mesh(&mut self, vertices: &[f32], indices: &[u32]);

    /// Switches between filled and wireframe drawing.
    fn set_wireframe(&mut self, enabled: bool);
}

/// A [`MeshSink`] that keeps the latest buffers in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub wireframe: bool,
    /// Number of [`MeshSink::replace_mesh`] calls received.
    pub uploads: u64,
}

impl MeshSink for MeshBuffers {
    fn replace_mesh(&mut self, vertices: &[f32], indices: &[u32]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.indices.clear();
        self.indices.extend_from_slice(indices);
        self.uploads += 1;
    }

    fn set_wireframe(&mut self, enabled: bool) {
        self.wireframe = enabled;
    }
}

/// The voxels a scene renders.
#[derive(Clone, Debug)]
pub enum VoxelWorld {
    /// A dense chunk; dirtiness comes from the grid itself.
    Grid(VoxelGrid),
    /// A loose list of cubes.
    Cubes { cubes: Vec<Cube>, dirty: bool },
}

impl VoxelWorld {
    /// A cube-list world, dirty so the first frame meshes it.
    pub fn cubes(cubes: Vec<Cube>) -> Self {
        Self::Cubes { cubes, dirty: true }
    }

    pub fn source(&self) -> &dyn VoxelSource {
        match self {
            Self::Grid(grid) => grid,
            Self::Cubes { cubes, .. } => cubes,
        }
    }

    /// Returns `true` when the mesh no longer matches the voxels.
    pub fn is_dirty(&self) -> bool {
        match self {
            Self::Grid(grid) => grid.is_mesh_dirty(),
            Self::Cubes { dirty, .. } => *dirty,
        }
    }

    pub fn mark_dirty(&mut self) {
        match self {
            Self::Grid(grid) => grid.mark_mesh_dirty(),
            Self::Cubes { dirty, .. } => *dirty = true,
        }
    }

    fn clear_dirty(&mut self) {
        match self {
            Self::Grid(grid) => grid.clear_mesh_dirty(),
            Self::Cubes { dirty, .. } => *dirty = false,
        }
    }

    /// Overwrites the cell at `(x, y, z)`.
    ///
    /// On a grid, out-of-range cells are ignored. On a cube list, any cube
    /// occupying the cell is replaced, and an empty voxel just removes it.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) {
        match self {
            Self::Grid(grid) => grid.set_cell(x, y, z, voxel),
            Self::Cubes { cubes, dirty } => {
                let before = cubes.len();
                cubes.retain(|cube| cube.cell() != [x, y, z]);
                if let Voxel::Solid(material) = voxel {
                    cubes.push(Cube {
                        position: Vec3::new(x as f32, y as f32, z as f32),
                        size: 1.0,
                        material,
                    });
                    *dirty = true;
                } else if cubes.len() != before {
                    *dirty = true;
                }
            }
        }
    }

    /// Adds `cube`. On a grid it fills the cube's cell.
    pub fn add_cube(&mut self, cube: Cube) {
        if cube.is_empty() {
            return;
        }
        match self {
            Self::Grid(grid) => {
                let [x, y, z] = cube.cell();
                grid.set_cell(x, y, z, Voxel::Solid(cube.material));
            }
            Self::Cubes { cubes, dirty } => {
                cubes.push(cube);
                *dirty = true;
            }
        }
    }
}

impl From<VoxelGrid> for VoxelWorld {
    fn from(grid: VoxelGrid) -> Self {
        Self::Grid(grid)
    }
}

impl From<Vec<Cube>> for VoxelWorld {
    fn from(cubes: Vec<Cube>) -> Self {
        Self::cubes(cubes)
    }
}

/// The configured mesher, producing colored vertices.
#[derive(Clone, Debug)]
pub enum SceneMesher {
    Greedy(GreedyMesher<ColorVertex>),
    Naive(CubeMesher<ColorVertex>),
}

impl SceneMesher {
    /// Builds the mesher named in `config` with an `extent³` minimum working
    /// volume. Each rebuild grows it to fit the world.
    pub fn from_config(config: &MeshConfig, extent: usize) -> Self {
        match config.mesher {
            MesherKind::Greedy => {
                Self::Greedy(GreedyMesher::with_extent(extent).parallel(config.parallel_axes))
            }
            MesherKind::Naive => Self::Naive(CubeMesher::with_extent(extent)),
        }
    }

    pub fn kind(&self) -> MesherKind {
        match self {
            Self::Greedy(_) => MesherKind::Greedy,
            Self::Naive(_) => MesherKind::Naive,
        }
    }

    pub fn extent(&self) -> usize {
        match self {
            Self::Greedy(mesher) => mesher.extent(),
            Self::Naive(mesher) => mesher.extent(),
        }
    }
}

impl Mesher<ColorVertex> for SceneMesher {
    fn rebuild(&mut self, source: &dyn VoxelSource) -> &Mesh<ColorVertex> {
        match self {
            Self::Greedy(mesher) => mesher.rebuild(source),
            Self::Naive(mesher) => mesher.rebuild(source),
        }
    }

    fn mesh(&self) -> &Mesh<ColorVertex> {
        match self {
            Self::Greedy(mesher) => mesher.mesh(),
            Self::Naive(mesher) => mesher.mesh(),
        }
    }
}

/// Perspective projection settings for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Cull faces whose counter-clockwise side points away from the camera.
    pub backface_culling: bool,
}

impl Projection {
    pub fn from_config(render: &RenderConfig) -> Self {
        Self {
            fov_y: render.fov_degrees.to_radians(),
            near: render.near,
            far: render.far,
            backface_culling: render.backface_culling,
        }
    }

    /// Right-handed perspective matrix with depth in `[0, 1]`.
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect_ratio, self.near, self.far)
    }
}

/// Camera and window state accumulated from events. Consumed by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub title: String,
    pub resizable: bool,
    pub projection: Projection,
    pub wireframe: bool,
    /// Accumulated camera translation.
    pub camera: Vec3,
    /// Accumulated mouse-look delta (x right, y up).
    pub look: Vec2,
    /// Viewport size in pixels.
    pub viewport: UVec2,
    /// Cursor position of the most recent click.
    pub last_click: Option<Vec2>,
    pub close_requested: bool,
}

impl ViewState {
    fn from_config(config: &Config) -> Self {
        Self {
            title: config.window.title.clone(),
            resizable: config.window.resizable,
            projection: Projection::from_config(&config.render),
            wireframe: config.render.wireframe,
            camera: Vec3::ZERO,
            look: Vec2::ZERO,
            viewport: UVec2::new(config.window.width, config.window.height),
            last_click: None,
            close_requested: false,
        }
    }

    /// Viewport width over height. A zero-height viewport counts as square.
    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.y == 0 {
            1.0
        } else {
            self.viewport.x as f32 / self.viewport.y as f32
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix(self.aspect_ratio())
    }
}

/// What one [`Scene::update`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStatus {
    /// Events applied this frame.
    pub events: usize,
    /// How many of those events edited the world.
    pub world_edits: usize,
    /// Statistics of the new mesh, if it was rebuilt.
    pub rebuilt: Option<MeshStats>,
    pub close_requested: bool,
}

/// A voxel world, its mesher, and the view state, driven by bus events.
pub struct Scene {
    world: VoxelWorld,
    mesher: SceneMesher,
    view: ViewState,
    subscription: Subscription,
    /// Wireframe state last sent to the sink.
    sink_wireframe: Option<bool>,
    show_mesh_stats: bool,
}

impl Scene {
    /// Creates a scene subscribed to every event on `bus`.
    ///
    /// The configured working volume is a minimum; rebuilds grow it to fit
    /// the world.
    pub fn new(world: impl Into<VoxelWorld>, config: &Config, bus: &mut EventBus) -> Self {
        let world = world.into();
        let extent = config.mesh.working_volume;
        let mesher = SceneMesher::from_config(&config.mesh, extent);
        tracing::debug!(
            mesher = ?mesher.kind(),
            extent,
            "scene created"
        );
        Self {
            world,
            mesher,
            view: ViewState::from_config(config),
            subscription: bus.subscribe(),
            sink_wireframe: None,
            show_mesh_stats: config.debug.show_mesh_stats,
        }
    }

    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    /// Mutable world access. [`VoxelWorld::set_voxel`] and
    /// [`VoxelWorld::add_cube`] mark the world dirty; after editing a cube
    /// list directly, call [`VoxelWorld::mark_dirty`] or the next update
    /// keeps the old mesh.
    pub fn world_mut(&mut self) -> &mut VoxelWorld {
        &mut self.world
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn mesher(&self) -> &SceneMesher {
        &self.mesher
    }

    /// The mesh from the last rebuild.
    pub fn mesh(&self) -> &Mesh<ColorVertex> {
        self.mesher.mesh()
    }

    /// Applies one event to the world or the view.
    pub fn apply(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::CameraMove { dx, dy, dz } => self.view.camera += Vec3::new(dx, dy, dz),
            SceneEvent::MouseMovement { dx, dy } => self.view.look += Vec2::new(dx, dy),
            SceneEvent::LeftClick { x, y } => self.view.last_click = Some(Vec2::new(x, y)),
            SceneEvent::ToggleWireframe => self.view.wireframe = !self.view.wireframe,
            SceneEvent::RequestClose => self.view.close_requested = true,
            SceneEvent::SetVoxel { x, y, z, voxel } => self.world.set_voxel(x, y, z, voxel),
            SceneEvent::AddCube(cube) => self.world.add_cube(cube),
            SceneEvent::Resize { width, height } => {
                self.view.viewport = UVec2::new(width, height);
            }
        }
    }

    /// Runs one frame: applies delivered events, syncs the wireframe flag,
    /// and rebuilds the mesh if the world is dirty.
    pub fn update(&mut self, sink: &mut impl MeshSink) -> FrameStatus {
        let mut events = 0;
        let mut world_edits = 0;
        while let Some(event) = self.subscription.try_recv() {
            if event.edits_world() {
                world_edits += 1;
            }
            self.apply(event);
            events += 1;
        }

        if self.sink_wireframe != Some(self.view.wireframe) {
            sink.set_wireframe(self.view.wireframe);
            self.sink_wireframe = Some(self.view.wireframe);
        }

        let rebuilt = self.world.is_dirty().then(|| self.rebuild(sink));

        if world_edits > 0 {
            tracing::trace!(world_edits, rebuilt = rebuilt.is_some(), "world edited");
        }

        FrameStatus {
            events,
            world_edits,
            rebuilt,
            close_requested: self.view.close_requested,
        }
    }

    /// Rebuilds unconditionally and uploads the result.
    pub fn rebuild(&mut self, sink: &mut impl MeshSink) -> MeshStats {
        let mesh = self.mesher.rebuild(self.world.source());
        sink.replace_mesh(mesh.vertex_floats(), &mesh.indices);
        let stats = mesh.stats();
        self.world.clear_dirty();

        if self.show_mesh_stats {
            tracing::info!(
                mesher = ?self.mesher.kind(),
                quads = stats.quads,
                vertices = stats.vertices,
                triangles = stats.triangles,
                "mesh rebuilt"
            );
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use cube_voxel::{Material, Rgb};

    use super::*;

    fn setup(world: impl Into<VoxelWorld>) -> (Scene, EventBus) {
        let mut bus = EventBus::new();
        let scene = Scene::new(world, &Config::default(), &mut bus);
        (scene, bus)
    }

    #[test]
    fn test_first_update_meshes_and_sets_wireframe() {
        let (mut scene, _bus) = setup(vec![Cube::colored(0, 0, 0, Rgb::WHITE)]);
        let mut sink = MeshBuffers {
            wireframe: true,
            ..Default::default()
        };
        let status = scene.update(&mut sink);

        assert_eq!(status.events, 0);
        assert_eq!(status.rebuilt.map(|s| s.quads), Some(6));
        assert_eq!(sink.uploads, 1);
        assert_eq!(sink.vertices.len(), 24 * 6);
        assert_eq!(sink.indices.len(), 36);
        assert!(!sink.wireframe);
    }

    #[test]
    fn test_clean_world_is_not_rebuilt() {
        let (mut scene, _bus) = setup(vec![Cube::colored(0, 0, 0, Rgb::WHITE)]);
        let mut sink = MeshBuffers::default();
        scene.update(&mut sink);
        let status = scene.update(&mut sink);
        assert_eq!(status.rebuilt, None);
        assert_eq!(sink.uploads, 1);

        scene.world_mut().mark_dirty();
        assert!(scene.update(&mut sink).rebuilt.is_some());
        assert_eq!(sink.uploads, 2);
    }

    #[test]
    fn test_world_edit_triggers_full_replacement() {
        let (mut scene, mut bus) = setup(vec![Cube::colored(0, 0, 0, Rgb::WHITE)]);
        let mut sink = MeshBuffers::default();
        scene.update(&mut sink);

        bus.publish(SceneEvent::AddCube(Cube::colored(1, 0, 0, Rgb::WHITE)));
        bus.pump();
        let status = scene.update(&mut sink);
        assert_eq!(status.events, 1);
        assert_eq!(status.world_edits, 1);
        assert_eq!(status.rebuilt.map(|s| s.quads), Some(6));
        assert_eq!(sink.uploads, 2);
        assert_eq!(sink.indices.len(), 36);
    }

    #[test]
    fn test_view_events_do_not_rebuild() {
        let (mut scene, mut bus) = setup(vec![Cube::colored(0, 0, 0, Rgb::WHITE)]);
        let mut sink = MeshBuffers::default();
        scene.update(&mut sink);

        bus.publish(SceneEvent::CameraMove {
            dx: 0.0,
            dy: 0.0,
            dz: 0.05,
        });
        bus.publish(SceneEvent::MouseMovement { dx: 2.0, dy: -1.0 });
        bus.publish(SceneEvent::ToggleWireframe);
        bus.publish(SceneEvent::Resize {
            width: 1024,
            height: 768,
        });
        bus.pump();
        let status = scene.update(&mut sink);

        assert_eq!(status.events, 4);
        assert_eq!(status.world_edits, 0);
        assert_eq!(status.rebuilt, None);
        assert!(sink.wireframe);
        let view = scene.view();
        assert_eq!(view.camera, Vec3::new(0.0, 0.0, 0.05));
        assert_eq!(view.look, Vec2::new(2.0, -1.0));
        assert_eq!(view.viewport, UVec2::new(1024, 768));
    }

    #[test]
    fn test_close_request_is_reported() {
        let (mut scene, mut bus) = setup(Vec::<Cube>::new());
        bus.publish(SceneEvent::RequestClose);
        bus.pump();
        assert!(scene.update(&mut MeshBuffers::default()).close_requested);
    }

    #[test]
    fn test_grid_world_uses_grid_dirty_flag() {
        let mut grid = VoxelGrid::chunk(Vec3::ZERO);
        grid.set_cell(15, 0, 0, Voxel::colored(Rgb::WHITE));
        let (mut scene, mut bus) = setup(grid);

        let mut sink = MeshBuffers::default();
        let first = scene.update(&mut sink);
        assert_eq!(first.rebuilt.map(|s| s.quads), Some(6));
        assert!(!scene.world().is_dirty());

        bus.publish(SceneEvent::SetVoxel {
            x: 15,
            y: 0,
            z: 0,
            voxel: Voxel::Empty,
        });
        bus.pump();
        let second = scene.update(&mut sink);
        assert_eq!(second.rebuilt.map(|s| s.quads), Some(0));
        assert!(sink.vertices.is_empty());
    }

    #[test]
    fn test_cube_list_past_configured_volume_is_meshed() {
        let (mut scene, _bus) = setup(vec![Cube::colored(15, 0, 0, Rgb::WHITE)]);
        assert_eq!(scene.mesher().extent(), 15);
        let status = scene.update(&mut MeshBuffers::default());
        assert_eq!(status.rebuilt.map(|s| s.quads), Some(6));
    }

    #[test]
    fn test_direct_cube_list_edit_needs_mark_dirty() {
        let (mut scene, _bus) = setup(vec![Cube::colored(0, 0, 0, Rgb::WHITE)]);
        let mut sink = MeshBuffers::default();
        scene.update(&mut sink);

        if let VoxelWorld::Cubes { cubes, .. } = scene.world_mut() {
            cubes.push(Cube::colored(5, 5, 5, Rgb::BLACK));
        }
        assert_eq!(scene.update(&mut sink).rebuilt, None);

        scene.world_mut().mark_dirty();
        let status = scene.update(&mut sink);
        assert_eq!(status.rebuilt.map(|s| s.quads), Some(12));
    }

    #[test]
    fn test_view_state_follows_window_and_render_config() {
        let mut config = Config::default();
        config.window.title = "voxels".to_string();
        config.window.resizable = true;
        config.render.fov_degrees = 90.0;
        config.render.backface_culling = false;
        let mut bus = EventBus::new();
        let mut scene = Scene::new(Vec::<Cube>::new(), &config, &mut bus);

        let view = scene.view();
        assert_eq!(view.title, "voxels");
        assert!(view.resizable);
        assert!(!view.projection.backface_culling);
        assert!((view.projection.fov_y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(view.projection.near, 0.1);
        assert_eq!(view.projection.far, 100.0);

        // 90° vertical fov: y scale is 1, x scale is 1 / aspect.
        let m = view.projection_matrix();
        assert!((m.y_axis.y - 1.0).abs() < 1e-5);
        assert!((m.x_axis.x - 450.0 / 800.0).abs() < 1e-5);

        bus.publish(SceneEvent::Resize {
            width: 600,
            height: 600,
        });
        bus.pump();
        scene.update(&mut MeshBuffers::default());
        assert_eq!(scene.view().aspect_ratio(), 1.0);
        assert!((scene.view().projection_matrix().x_axis.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_height_viewport_is_square() {
        let (mut scene, mut bus) = setup(Vec::<Cube>::new());
        bus.publish(SceneEvent::Resize {
            width: 640,
            height: 0,
        });
        bus.pump();
        scene.update(&mut MeshBuffers::default());
        assert_eq!(scene.view().aspect_ratio(), 1.0);
    }

    #[test]
    fn test_set_voxel_replaces_cube_at_cell() {
        let mut world = VoxelWorld::cubes(vec![Cube::colored(2, 2, 2, Rgb::WHITE)]);
        world.set_voxel(2, 2, 2, Voxel::colored(Rgb::BLACK));
        let VoxelWorld::Cubes { cubes, .. } = &world else {
            unreachable!()
        };
        assert_eq!(cubes.len(), 1);
        assert_eq!(cubes[0].material, Material::Color(Rgb::BLACK));

        world.set_voxel(2, 2, 2, Voxel::Empty);
        let VoxelWorld::Cubes { cubes, .. } = &world else {
            unreachable!()
        };
        assert!(cubes.is_empty());
    }

    #[test]
    fn test_removing_missing_cube_keeps_world_clean() {
        let mut world = VoxelWorld::Cubes {
            cubes: Vec::new(),
            dirty: false,
        };
        world.set_voxel(0, 0, 0, Voxel::Empty);
        assert!(!world.is_dirty());
    }

    #[test]
    fn test_naive_mesher_from_config() {
        let mut config = Config::default();
        config.mesh.mesher = MesherKind::Naive;
        let mut bus = EventBus::new();
        let mut scene = Scene::new(
            vec![
                Cube::colored(0, 0, 0, Rgb::WHITE),
                Cube::colored(1, 0, 0, Rgb::WHITE),
            ],
            &config,
            &mut bus,
        );
        assert_eq!(scene.mesher().kind(), MesherKind::Naive);
        let status = scene.update(&mut MeshBuffers::default());
        assert_eq!(status.rebuilt.map(|s| s.quads), Some(10));
    }
}
