//! Box-figure builders for the bird and the village animals.
//!
//! Figures are assembled in model space (facing +Z), posed from the
//! caller's animation phases, then oriented by yaw and translated into
//! world space. The whole set is rebuilt into one mesh per frame.

use glam::Vec3;

use crate::utils::Mesh;

// bird
const BIRD_BLUE: [f32; 4] = [0.118, 0.565, 1.000, 1.0];
const BIRD_DARK: [f32; 4] = [0.082, 0.396, 0.753, 1.0];
const BIRD_DARKEST: [f32; 4] = [0.051, 0.278, 0.631, 1.0];
const BEAK_ORANGE: [f32; 4] = [1.000, 0.647, 0.000, 1.0];
const EYE_BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const EYE_SHINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// cow
const COW_DARK: [f32; 4] = [0.102, 0.102, 0.102, 1.0];
const COW_WHITE: [f32; 4] = [0.941, 0.941, 0.941, 1.0];
const COW_SNOUT: [f32; 4] = [0.831, 0.627, 0.627, 1.0];
const COW_HORN: [f32; 4] = [0.831, 0.753, 0.502, 1.0];

// pig
const PIG_PINK: [f32; 4] = [0.957, 0.627, 0.690, 1.0];
const PIG_DEEP: [f32; 4] = [0.910, 0.502, 0.604, 1.0];
const PIG_NOSTRIL: [f32; 4] = [0.753, 0.376, 0.439, 1.0];

// chicken
const HEN_WHITE: [f32; 4] = [0.961, 0.961, 0.961, 1.0];
const HEN_WING: [f32; 4] = [0.878, 0.878, 0.878, 1.0];
const HEN_TAIL: [f32; 4] = [0.910, 0.910, 0.910, 1.0];
const HEN_RED: [f32; 4] = [1.000, 0.125, 0.125, 1.0];

/// Rotate the tail of the mesh around Y through the origin, then
/// translate it to `pos`. This is the model-space to world-space step.
fn orient(mesh: &mut Mesh, start: usize, pos: Vec3, yaw: f32) {
    let (sin, cos) = yaw.sin_cos();
    for v in &mut mesh.vertices[start..] {
        let p = Vec3::from(v.pos);
        let rotated = Vec3::new(p.x * cos + p.z * sin, p.y, -p.x * sin + p.z * cos);
        v.pos = (pos + rotated).into();
        let n = Vec3::from(v.normal);
        v.normal = [n.x * cos + n.z * sin, n.y, -n.x * sin + n.z * cos];
    }
}

/// Box rotated about the X axis through its own center (leg/tail pitch).
fn push_box_pitched(mesh: &mut Mesh, center: Vec3, size: Vec3, color: [f32; 4], pitch: f32) {
    let start = mesh.vertices.len();
    mesh.push_box(center, size, color);
    let (sin, cos) = pitch.sin_cos();
    for v in &mut mesh.vertices[start..] {
        let p = Vec3::from(v.pos) - center;
        v.pos = (center + Vec3::new(p.x, p.y * cos - p.z * sin, p.y * sin + p.z * cos)).into();
        let n = Vec3::from(v.normal);
        v.normal = [n.x, n.y * cos - n.z * sin, n.y * sin + n.z * cos];
    }
}

/// Box rotated about the Z axis through its own center (wing roll).
fn push_box_rolled(mesh: &mut Mesh, center: Vec3, size: Vec3, color: [f32; 4], roll: f32) {
    let start = mesh.vertices.len();
    mesh.push_box(center, size, color);
    let (sin, cos) = roll.sin_cos();
    for v in &mut mesh.vertices[start..] {
        let p = Vec3::from(v.pos) - center;
        v.pos = (center + Vec3::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos, p.z)).into();
        let n = Vec3::from(v.normal);
        v.normal = [n.x * cos - n.y * sin, n.x * sin + n.y * cos, n.z];
    }
}

/// The player bird. `flap` is the wing phase, `bob` the body bounce.
pub fn push_bird(mesh: &mut Mesh, pos: Vec3, yaw: f32, flap: f32, bob: f32) {
    let start = mesh.vertices.len();
    let flap_angle = flap.sin() * 0.5;

    mesh.push_box(Vec3::new(0.0, bob, 0.0), Vec3::new(0.65, 0.55, 0.85), BIRD_BLUE);
    mesh.push_box(Vec3::new(0.0, 0.5, 0.12), Vec3::new(0.5, 0.5, 0.5), BIRD_BLUE);
    mesh.push_box(Vec3::new(0.0, 0.82, 0.1), Vec3::new(0.12, 0.2, 0.12), BIRD_DARK);

    for side in [-1.0f32, 1.0] {
        mesh.push_box(
            Vec3::new(side * 0.2, 0.55, 0.36),
            Vec3::new(0.1, 0.1, 0.02),
            EYE_BLACK,
        );
        mesh.push_box(
            Vec3::new(side * 0.2 + 0.03, 0.58, 0.37),
            Vec3::new(0.04, 0.04, 0.01),
            EYE_SHINE,
        );
    }

    mesh.push_box(Vec3::new(0.0, 0.46, 0.42), Vec3::new(0.18, 0.12, 0.18), BEAK_ORANGE);

    // wings flap by rolling in opposite directions
    push_box_rolled(
        mesh,
        Vec3::new(-0.5, 0.05, 0.0),
        Vec3::new(0.38, 0.14, 0.6),
        BIRD_DARK,
        -(0.2 + flap_angle),
    );
    push_box_rolled(
        mesh,
        Vec3::new(0.5, 0.05, 0.0),
        Vec3::new(0.38, 0.14, 0.6),
        BIRD_DARK,
        0.2 + flap_angle,
    );

    mesh.push_box(Vec3::new(0.0, -0.08, -0.55), Vec3::new(0.35, 0.18, 0.28), BIRD_DARK);
    mesh.push_box(Vec3::new(0.0, -0.12, -0.72), Vec3::new(0.2, 0.1, 0.18), BIRD_DARKEST);

    for side in [-1.0f32, 1.0] {
        mesh.push_box(
            Vec3::new(side * 0.18, -0.32, 0.08),
            Vec3::new(0.14, 0.1, 0.22),
            BEAK_ORANGE,
        );
    }

    orient(mesh, start, pos, yaw);
}

/// Four-legged gait: front-left and back-right swing together. Legs sit
/// at (±anchor.x, anchor.y, ±anchor.z).
fn push_quad_legs(mesh: &mut Mesh, anchor: Vec3, size: Vec3, colors: [[f32; 4]; 4], swing: f32) {
    let offsets = [
        (Vec3::new(-anchor.x, anchor.y, anchor.z), swing),
        (Vec3::new(anchor.x, anchor.y, anchor.z), -swing),
        (Vec3::new(-anchor.x, anchor.y, -anchor.z), -swing),
        (Vec3::new(anchor.x, anchor.y, -anchor.z), swing),
    ];
    for ((center, pitch), color) in offsets.into_iter().zip(colors) {
        push_box_pitched(mesh, center, size, color, pitch);
    }
}

pub fn push_cow(mesh: &mut Mesh, pos: Vec3, yaw: f32, gait: f32) {
    let start = mesh.vertices.len();
    let swing = gait.sin() * 0.3;

    mesh.push_box(Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.9, 0.65, 1.4), COW_DARK);
    mesh.push_box(Vec3::new(0.0, 0.45, 0.1), Vec3::new(0.5, 0.35, 0.6), COW_WHITE);
    mesh.push_box(Vec3::new(0.0, 0.65, 0.85), Vec3::new(0.6, 0.55, 0.55), COW_DARK);
    mesh.push_box(Vec3::new(0.0, 0.62, 1.1), Vec3::new(0.35, 0.3, 0.05), COW_WHITE);
    mesh.push_box(Vec3::new(0.0, 0.55, 1.14), Vec3::new(0.28, 0.18, 0.08), COW_SNOUT);
    for side in [-1.0f32, 1.0] {
        mesh.push_box(
            Vec3::new(side * 0.22, 0.72, 1.1),
            Vec3::new(0.08, 0.08, 0.02),
            EYE_BLACK,
        );
        mesh.push_box(
            Vec3::new(side * 0.22, 0.98, 0.82),
            Vec3::new(0.08, 0.18, 0.08),
            COW_HORN,
        );
    }
    push_quad_legs(
        mesh,
        Vec3::new(0.28, -0.12, 0.42),
        Vec3::new(0.22, 0.55, 0.22),
        [COW_DARK, COW_WHITE, COW_WHITE, COW_DARK],
        swing,
    );
    mesh.push_box(Vec3::new(0.0, 0.38, -0.75), Vec3::new(0.1, 0.28, 0.1), COW_DARK);
    mesh.push_box(Vec3::new(0.0, 0.2, -0.82), Vec3::new(0.14, 0.14, 0.14), COW_WHITE);

    orient(mesh, start, pos, yaw);
}

pub fn push_pig(mesh: &mut Mesh, pos: Vec3, yaw: f32, gait: f32) {
    let start = mesh.vertices.len();
    let swing = gait.sin() * 0.35;

    mesh.push_box(Vec3::new(0.0, 0.28, 0.0), Vec3::new(0.75, 0.6, 1.1), PIG_PINK);
    mesh.push_box(Vec3::new(0.0, 0.55, 0.68), Vec3::new(0.58, 0.52, 0.5), PIG_PINK);
    mesh.push_box(Vec3::new(0.0, 0.48, 0.95), Vec3::new(0.32, 0.22, 0.12), PIG_DEEP);
    for side in [-1.0f32, 1.0] {
        mesh.push_box(
            Vec3::new(side * 0.08, 0.48, 1.02),
            Vec3::new(0.07, 0.07, 0.02),
            PIG_NOSTRIL,
        );
        mesh.push_box(
            Vec3::new(side * 0.2, 0.62, 0.92),
            Vec3::new(0.08, 0.08, 0.02),
            EYE_BLACK,
        );
        mesh.push_box(
            Vec3::new(side * 0.28, 0.82, 0.65),
            Vec3::new(0.14, 0.18, 0.08),
            PIG_DEEP,
        );
    }
    push_quad_legs(
        mesh,
        Vec3::new(0.22, -0.1, 0.32),
        Vec3::new(0.2, 0.48, 0.2),
        [PIG_PINK; 4],
        swing,
    );
    push_box_pitched(
        mesh,
        Vec3::new(0.0, 0.35, -0.6),
        Vec3::new(0.1, 0.22, 0.1),
        PIG_DEEP,
        0.4,
    );

    orient(mesh, start, pos, yaw);
}

pub fn push_chicken(mesh: &mut Mesh, pos: Vec3, yaw: f32, gait: f32, bob: f32) {
    let start = mesh.vertices.len();
    let swing = gait.sin() * 0.4;
    let head_y = 0.62 + bob;

    mesh.push_box(Vec3::new(0.0, 0.22, 0.0), Vec3::new(0.5, 0.5, 0.7), HEN_WHITE);
    mesh.push_box(Vec3::new(0.0, head_y, 0.38), Vec3::new(0.38, 0.38, 0.38), HEN_WHITE);
    mesh.push_box(Vec3::new(0.0, head_y + 0.26, 0.36), Vec3::new(0.12, 0.18, 0.12), HEN_RED);
    mesh.push_box(Vec3::new(0.0, head_y - 0.1, 0.56), Vec3::new(0.1, 0.12, 0.08), HEN_RED);
    mesh.push_box(Vec3::new(0.0, head_y - 0.02, 0.6), Vec3::new(0.12, 0.08, 0.12), BEAK_ORANGE);
    for side in [-1.0f32, 1.0] {
        mesh.push_box(
            Vec3::new(side * 0.16, head_y + 0.04, 0.56),
            Vec3::new(0.06, 0.06, 0.02),
            EYE_BLACK,
        );
        mesh.push_box(
            Vec3::new(side * 0.3, 0.24, 0.0),
            Vec3::new(0.12, 0.3, 0.5),
            HEN_WING,
        );
    }
    push_box_pitched(
        mesh,
        Vec3::new(0.0, 0.3, -0.42),
        Vec3::new(0.3, 0.22, 0.18),
        HEN_TAIL,
        -0.4,
    );
    for (side, phase) in [(-1.0f32, swing), (1.0, -swing)] {
        push_box_pitched(
            mesh,
            Vec3::new(side * 0.12, -0.08, 0.05),
            Vec3::new(0.1, 0.32, 0.1),
            BEAK_ORANGE,
            phase,
        );
        mesh.push_box(
            Vec3::new(side * 0.12, -0.26, 0.1),
            Vec3::new(0.18, 0.06, 0.2),
            BEAK_ORANGE,
        );
    }

    orient(mesh, start, pos, yaw);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bird_lands_at_its_world_position() {
        let mut mesh = Mesh::empty();
        push_bird(&mut mesh, Vec3::new(4.0, 0.5, -2.0), 0.0, 0.0, 0.0);
        let (mut cx, mut cz) = (0.0f32, 0.0f32);
        for v in &mesh.vertices {
            cx += v.pos[0];
            cz += v.pos[2];
        }
        let n = mesh.vertices.len() as f32;
        assert!((cx / n - 4.0).abs() < 0.5);
        assert!((cz / n + 2.0).abs() < 0.5);
    }

    #[test]
    fn yaw_half_turn_flips_the_beak() {
        let mut fwd = Mesh::empty();
        push_bird(&mut fwd, Vec3::ZERO, 0.0, 0.0, 0.0);
        let mut rev = Mesh::empty();
        push_bird(&mut rev, Vec3::ZERO, std::f32::consts::PI, 0.0, 0.0);
        // the beak pokes out to z ~ 0.51 in model space; a half turn
        // sends it to the negative side
        let max_z_fwd = fwd.vertices.iter().map(|v| v.pos[2]).fold(f32::MIN, f32::max);
        let min_z_rev = rev.vertices.iter().map(|v| v.pos[2]).fold(f32::MAX, f32::min);
        assert!(max_z_fwd > 0.45);
        assert!(min_z_rev < -0.45);
    }

    #[test]
    fn all_species_produce_triangles() {
        let mut mesh = Mesh::empty();
        push_cow(&mut mesh, Vec3::ZERO, 0.3, 1.0);
        push_pig(&mut mesh, Vec3::ZERO, 0.3, 1.0);
        push_chicken(&mut mesh, Vec3::ZERO, 0.3, 1.0, 0.02);
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.len() > 0);
    }
}
