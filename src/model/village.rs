//! Static village content: ground slab, stone paths, houses, trees, sun
//! and clouds, assembled once at startup into a single colored-box mesh.

use glam::Vec3;

use crate::utils::Mesh;

/// Cells per side of the ground slab.
pub const GROUND_SIZE: i32 = 32;
/// Y of the walkable ground surface (cell tops).
pub const GROUND_TOP: f32 = 0.0;

// Palette. Everything is flat-shaded; sides pick up depth from lighting.
const GRASS_A: [f32; 4] = [0.310, 0.620, 0.270, 1.0];
const GRASS_B: [f32; 4] = [0.275, 0.565, 0.240, 1.0];
const PATH_STONE: [f32; 4] = [0.545, 0.545, 0.478, 1.0];
const HOUSE_STONE: [f32; 4] = [0.560, 0.560, 0.580, 1.0];
const HOUSE_WOOD: [f32; 4] = [0.620, 0.450, 0.270, 1.0];
const ROOF_LOWER: [f32; 4] = [0.482, 0.176, 0.000, 1.0];
const ROOF_RIDGE: [f32; 4] = [0.361, 0.122, 0.000, 1.0];
const DOOR: [f32; 4] = [0.239, 0.122, 0.000, 1.0];
const DOOR_HANDLE: [f32; 4] = [0.784, 0.627, 0.000, 1.0];
const WINDOW: [f32; 4] = [0.529, 0.808, 0.922, 1.0];
const TRUNK: [f32; 4] = [0.361, 0.227, 0.118, 1.0];
const LEAVES_LOW: [f32; 4] = [0.176, 0.478, 0.122, 1.0];
const LEAVES_MID: [f32; 4] = [0.227, 0.620, 0.157, 1.0];
const LEAVES_TOP: [f32; 4] = [0.294, 0.749, 0.188, 1.0];
const LEAVES_TIP: [f32; 4] = [0.361, 0.839, 0.227, 1.0];
const SUN: [f32; 4] = [1.000, 0.898, 0.400, 1.0];
const SUN_GLOW: [f32; 4] = [1.000, 0.843, 0.000, 0.35];
const CLOUD: [f32; 4] = [1.000, 1.000, 1.000, 0.92];
const CLOUD_DIM: [f32; 4] = [0.941, 0.941, 0.941, 0.85];

/// (x, z), yaw, size of each house, spread around the village center.
const HOUSES: [((f32, f32), f32, f32); 6] = [
    ((-7.0, -7.0), 0.3, 1.0),
    ((7.0, -9.0), -0.25, 1.2),
    ((-9.0, 5.0), 0.85, 0.9),
    ((9.0, 6.0), -0.5, 1.1),
    ((0.0, -13.0), 0.1, 1.3),
    ((-4.0, 10.0), 1.2, 0.85),
];

/// (x, z), scale.
const TREES: [((f32, f32), f32); 12] = [
    ((-3.5, -3.5), 0.9),
    ((3.5, -4.5), 1.1),
    ((-11.0, -3.0), 1.2),
    ((11.0, 3.0), 0.85),
    ((-5.5, 8.0), 1.0),
    ((6.0, 9.5), 1.3),
    ((-13.0, 9.0), 0.9),
    ((13.0, -6.0), 1.1),
    ((2.0, 11.0), 1.0),
    ((-8.0, -11.0), 0.85),
    ((10.0, -12.0), 1.0),
    ((-13.0, -8.0), 1.15),
];

const CLOUDS: [(f32, f32, f32); 5] = [
    (-12.0, 26.0, -22.0),
    (18.0, 30.0, -32.0),
    (-28.0, 24.0, -18.0),
    (8.0, 32.0, -42.0),
    (25.0, 27.0, -10.0),
];

/// Build the whole static village as one mesh.
pub fn build_village_mesh() -> Mesh {
    let mut mesh = Mesh::empty();
    push_ground(&mut mesh);
    push_paths(&mut mesh);
    for ((x, z), yaw, size) in HOUSES {
        push_house(&mut mesh, Vec3::new(x, 0.0, z), yaw, size);
    }
    for ((x, z), scale) in TREES {
        push_tree(&mut mesh, Vec3::new(x, 0.0, z), scale);
    }
    push_sky_props(&mut mesh);
    mesh
}

/// 32x32 unit cells, tops at y=0, checkered in two greens.
fn push_ground(mesh: &mut Mesh) {
    let half = GROUND_SIZE / 2;
    for x in -half..half {
        for z in -half..half {
            let color = if (x + z).rem_euclid(2) == 0 { GRASS_A } else { GRASS_B };
            mesh.push_box(
                Vec3::new(x as f32, GROUND_TOP - 0.5, z as f32),
                Vec3::ONE,
                color,
            );
        }
    }
}

/// Stone path crossing the village: a north-south strip two cells wide
/// and an east-west strip, skipping the overlap.
fn push_paths(mesh: &mut Mesh) {
    let mut push_tile = |x: i32, z: i32| {
        mesh.push_box(
            Vec3::new(x as f32, -0.48, z as f32),
            Vec3::new(1.0, 0.06, 1.0),
            PATH_STONE,
        );
    };
    for z in -13..=13 {
        push_tile(0, z);
        push_tile(1, z);
    }
    for x in -10..=10 {
        if x != 0 && x != 1 {
            push_tile(x, 0);
            push_tile(x, 1);
        }
    }
}

fn push_house(mesh: &mut Mesh, at: Vec3, yaw: f32, size: f32) {
    let w = 3.0 * size;
    let h = 2.5 * size;
    let d = 3.0 * size;
    let base_h = 0.5 * size;
    let s = size;

    let mut part = |center: Vec3, dims: Vec3, color: [f32; 4]| {
        mesh.push_box_rotated(at + center, dims, color, yaw, at);
    };

    // stone foundation, wooden walls, two roof slabs
    part(Vec3::new(0.0, base_h / 2.0, 0.0), Vec3::new(w, base_h, d), HOUSE_STONE);
    part(Vec3::new(0.0, base_h + h / 2.0, 0.0), Vec3::new(w, h, d), HOUSE_WOOD);
    part(
        Vec3::new(0.0, base_h + h + 0.4 * s, 0.0),
        Vec3::new(w + 0.5 * s, 0.8 * s, d + 0.5 * s),
        ROOF_LOWER,
    );
    part(
        Vec3::new(0.0, base_h + h + 0.9 * s, 0.0),
        Vec3::new(w - 0.4 * s, 0.5 * s, d + 0.5 * s),
        ROOF_RIDGE,
    );

    // door with handle on the front face
    part(
        Vec3::new(0.0, base_h + 0.65 * s, d / 2.0 + 0.02),
        Vec3::new(0.65 * s, 1.3 * s, 0.06),
        DOOR,
    );
    part(
        Vec3::new(0.22 * s, base_h + 0.6 * s, d / 2.0 + 0.06),
        Vec3::new(0.08 * s, 0.08 * s, 0.06),
        DOOR_HANDLE,
    );

    // two front windows, one back window
    part(
        Vec3::new(-0.9 * s, base_h + h * 0.55, d / 2.0 + 0.02),
        Vec3::new(0.55 * s, 0.55 * s, 0.06),
        WINDOW,
    );
    part(
        Vec3::new(0.9 * s, base_h + h * 0.55, d / 2.0 + 0.02),
        Vec3::new(0.55 * s, 0.55 * s, 0.06),
        WINDOW,
    );
    part(
        Vec3::new(0.0, base_h + h * 0.55, -d / 2.0 - 0.02),
        Vec3::new(0.55 * s, 0.55 * s, 0.06),
        WINDOW,
    );
}

fn push_tree(mesh: &mut Mesh, at: Vec3, scale: f32) {
    let trunk_h = 3.0 * scale;
    let trunk_w = 0.5 * scale;
    let s = scale;

    mesh.push_box(at + Vec3::new(0.0, trunk_h / 2.0, 0.0), Vec3::new(trunk_w, trunk_h, trunk_w), TRUNK);
    mesh.push_box(
        at + Vec3::new(0.0, trunk_h + 0.6 * s, 0.0),
        Vec3::new(2.6 * s, 1.0 * s, 2.6 * s),
        LEAVES_LOW,
    );
    mesh.push_box(
        at + Vec3::new(0.0, trunk_h + 1.5 * s, 0.0),
        Vec3::new(2.0 * s, 1.0 * s, 2.0 * s),
        LEAVES_MID,
    );
    mesh.push_box(
        at + Vec3::new(0.0, trunk_h + 2.3 * s, 0.0),
        Vec3::new(1.2 * s, 0.9 * s, 1.2 * s),
        LEAVES_TOP,
    );
    mesh.push_box(
        at + Vec3::new(0.0, trunk_h + 3.0 * s, 0.0),
        Vec3::new(0.6 * s, 0.6 * s, 0.6 * s),
        LEAVES_TIP,
    );
}

/// Blocky sun plus a handful of cloud clusters, far above the arena.
fn push_sky_props(mesh: &mut Mesh) {
    let sun = Vec3::new(35.0, 45.0, -55.0);
    mesh.push_box(sun, Vec3::new(7.0, 7.0, 0.5), SUN);
    mesh.push_box(sun + Vec3::new(0.0, 0.0, -0.3), Vec3::new(9.0, 9.0, 0.1), SUN_GLOW);

    for (x, y, z) in CLOUDS {
        let at = Vec3::new(x, y, z);
        mesh.push_box(at, Vec3::new(6.0, 1.5, 3.0), CLOUD);
        mesh.push_box(at + Vec3::new(2.0, 0.75, 0.0), Vec3::new(3.0, 1.5, 2.5), CLOUD);
        mesh.push_box(at + Vec3::new(-2.0, 0.5, 0.0), Vec3::new(2.5, 1.2, 2.0), CLOUD_DIM);
    }
}

/// True for lattice cells inside the ground slab (the terrain is one cell
/// thick with its top at y=0, so only the y=0 layer is solid).
pub fn ground_is_solid(cell: glam::IVec3) -> bool {
    let half = GROUND_SIZE / 2;
    cell.y == 0 && cell.x >= -half && cell.x < half && cell.z >= -half && cell.z < half
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn village_mesh_is_not_empty() {
        let mesh = build_village_mesh();
        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn ground_solidity_matches_slab_extent() {
        assert!(ground_is_solid(IVec3::new(0, 0, 0)));
        assert!(ground_is_solid(IVec3::new(-16, 0, 15)));
        assert!(!ground_is_solid(IVec3::new(16, 0, 0)));
        assert!(!ground_is_solid(IVec3::new(0, 1, 0)));
        assert!(!ground_is_solid(IVec3::new(0, -1, 0)));
    }
}
