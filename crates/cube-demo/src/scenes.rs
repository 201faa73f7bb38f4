//! Demo voxel scenes.

use cube_scene::VoxelWorld;
use cube_voxel::{Cube, Rgb, Voxel, VoxelGrid};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::Serialize;

const BLOCK_SIZE: i32 = 10;
const HEIGHTMAP_SIZE: i32 = 16;

const DIRT: Rgb = Rgb::new(0.6, 0.4, 0.2);
const GRASS: Rgb = Rgb::new(0.2, 1.0, 0.2);
const SNOW: Rgb = Rgb::new(0.8, 0.8, 0.8);

/// Which scene to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// One red cube.
    Single,
    /// Two adjacent cubes.
    Slab,
    /// 10³ color-gradient block with columns sticking out of it.
    Block,
    /// 16×16 random-height terrain as a cube list.
    Heightmap,
    /// The same terrain stored in a chunk grid.
    Chunk,
}

/// Builds the world for `kind`. Random scenes are reproducible from `seed`.
pub fn build(kind: SceneKind, seed: u64, chunk_size: usize) -> VoxelWorld {
    match kind {
        SceneKind::Single => VoxelWorld::cubes(vec![Cube::colored(0, 0, 0, Rgb::new(1.0, 0.0, 0.0))]),
        SceneKind::Slab => VoxelWorld::cubes(vec![
            Cube::colored(0, 0, 0, Rgb::WHITE),
            Cube::colored(1, 0, 0, Rgb::WHITE),
        ]),
        SceneKind::Block => VoxelWorld::cubes(gradient_block()),
        SceneKind::Heightmap => VoxelWorld::cubes(heightmap(seed)),
        SceneKind::Chunk => VoxelWorld::Grid(heightmap_chunk(seed, chunk_size)),
    }
}

fn gradient_block() -> Vec<Cube> {
    let n = BLOCK_SIZE as f32;
    let mut cubes = Vec::with_capacity((BLOCK_SIZE * BLOCK_SIZE * BLOCK_SIZE) as usize + 21);
    for x in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            for z in 0..BLOCK_SIZE {
                let color = Rgb::new(x as f32 / n, y as f32 / n, z as f32 / n);
                cubes.push(Cube::colored(x, y, z, color));
            }
        }
    }

    let columns: [([i32; 3], [u8; 3]); 21] = [
        ([5, 10, 5], [0, 255, 0]),
        ([5, 11, 5], [0, 255, 0]),
        ([5, 12, 5], [0, 255, 0]),
        ([8, 5, 10], [0, 0, 255]),
        ([9, 5, 10], [0, 0, 255]),
        ([10, 5, 10], [0, 0, 255]),
        ([2, 10, 2], [255, 255, 0]),
        ([2, 11, 2], [255, 255, 0]),
        ([2, 12, 2], [255, 255, 0]),
        ([7, 10, 7], [0, 255, 255]),
        ([7, 11, 7], [0, 255, 255]),
        ([7, 12, 7], [0, 255, 255]),
        ([5, 13, 5], [128, 0, 128]),
        ([4, 12, 5], [128, 0, 128]),
        ([3, 11, 5], [128, 0, 128]),
        ([6, 10, 4], [255, 105, 180]),
        ([6, 11, 4], [255, 105, 180]),
        ([6, 12, 4], [255, 105, 180]),
        ([8, 13, 8], [75, 0, 130]),
        ([8, 14, 8], [75, 0, 130]),
        ([8, 15, 8], [75, 0, 130]),
    ];
    for ([x, y, z], [r, g, b]) in columns {
        cubes.push(Cube::colored(x, y, z, Rgb::from_rgba8([r, g, b, 255])));
    }
    cubes
}

/// Dirt below a quarter of the height, grass below half, snow above.
fn height_color(y: i32) -> Rgb {
    if y < HEIGHTMAP_SIZE / 4 {
        DIRT
    } else if y < HEIGHTMAP_SIZE / 2 {
        GRASS
    } else {
        SNOW
    }
}

/// Column heights in `[size/4, 3·size/4)`, x-major.
fn column_heights(seed: u64) -> Vec<i32> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    (0..HEIGHTMAP_SIZE * HEIGHTMAP_SIZE)
        .map(|_| rng.gen_range(0..HEIGHTMAP_SIZE / 2) + HEIGHTMAP_SIZE / 4)
        .collect()
}

fn heightmap(seed: u64) -> Vec<Cube> {
    let heights = column_heights(seed);
    let mut cubes = Vec::new();
    for x in 0..HEIGHTMAP_SIZE {
        for z in 0..HEIGHTMAP_SIZE {
            for y in 0..heights[(x * HEIGHTMAP_SIZE + z) as usize] {
                cubes.push(Cube::colored(x, y, z, height_color(y)));
            }
        }
    }
    cubes
}

fn heightmap_chunk(seed: u64, size: usize) -> VoxelGrid {
    let mut grid = VoxelGrid::new(size, Vec3::ZERO);
    for cube in heightmap(seed) {
        let [x, y, z] = cube.cell();
        grid.set_cell(x, y, z, Voxel::Solid(cube.material));
    }
    grid
}
