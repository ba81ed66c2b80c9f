use glam::{IVec3, Mat4, Vec3};

pub struct Camera {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: FollowRig::OFFSET,
            look: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::Y,
            fov_y: 70f32.to_radians(),
            aspect: width as f32 / height as f32,
            z_near: 0.1,
            z_far: 200.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.look - self.eye).normalize()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.look, self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }

    /// March the crosshair ray through the lattice until `is_solid`
    /// reports a hit. Returns the hit cell and the outward unit normal of
    /// the face the ray entered through.
    pub fn cast_to_cell<F>(&self, max_distance: f32, is_solid: F) -> Option<(IVec3, IVec3)>
    where
        F: Fn(IVec3) -> bool,
    {
        march_ray(self.eye, self.forward(), max_distance, is_solid)
    }
}

/// Small-step ray march over lattice cells (cell = rounded point, matching
/// block snapping). Tracks the previous empty cell so the entry face
/// normal falls out of the last axis crossing.
pub fn march_ray<F>(
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    is_solid: F,
) -> Option<(IVec3, IVec3)>
where
    F: Fn(IVec3) -> bool,
{
    let step_size = 0.05;
    let mut pos = origin;
    let mut distance = 0.0;
    let mut last_empty = crate::model::block::snap_to_lattice(pos);

    while distance < max_distance {
        pos += dir * step_size;
        distance += step_size;

        let cell = crate::model::block::snap_to_lattice(pos);
        if is_solid(cell) {
            let normal = IVec3::new(
                (last_empty.x - cell.x).signum(),
                (last_empty.y - cell.y).signum(),
                (last_empty.z - cell.z).signum(),
            );
            return Some((cell, normal));
        }
        last_empty = cell;
    }

    None
}

/// Third-person rig trailing the bird with exponential smoothing.
pub struct FollowRig {
    pos: Vec3,
    look: Vec3,
}

impl FollowRig {
    pub const OFFSET: Vec3 = Vec3::new(0.0, 6.0, 11.0);
    pub const LOOK_LIFT: Vec3 = Vec3::new(0.0, 0.8, 0.0);
    pub const LERP_FACTOR: f32 = 0.07;

    pub fn new() -> Self {
        Self {
            pos: Self::OFFSET,
            look: Vec3::new(0.0, 1.0, 0.0),
        }
    }

    /// Converge toward the target and write the result into the camera.
    pub fn update(&mut self, target: Vec3, camera: &mut Camera) {
        let desired = target + Self::OFFSET;
        self.pos = self.pos.lerp(desired, Self::LERP_FACTOR);
        self.look = self.look.lerp(target + Self::LOOK_LIFT, Self::LERP_FACTOR);
        camera.eye = self.pos;
        camera.look = self.look;
    }
}

impl Default for FollowRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_converges_on_a_resting_target() {
        let mut rig = FollowRig::new();
        let mut cam = Camera::new(800, 600);
        let target = Vec3::new(5.0, 0.5, -3.0);
        for _ in 0..600 {
            rig.update(target, &mut cam);
        }
        assert!((cam.eye - (target + FollowRig::OFFSET)).length() < 1e-2);
        assert!((cam.look - (target + FollowRig::LOOK_LIFT)).length() < 1e-2);
    }

    #[test]
    fn rig_moves_a_bounded_fraction_per_frame() {
        let mut rig = FollowRig::new();
        let mut cam = Camera::new(800, 600);
        let before = FollowRig::OFFSET;
        rig.update(Vec3::new(10.0, 0.5, 0.0), &mut cam);
        let desired = Vec3::new(10.0, 0.5, 0.0) + FollowRig::OFFSET;
        let expected = before.lerp(desired, FollowRig::LERP_FACTOR);
        assert!((cam.eye - expected).length() < 1e-5);
    }

    #[test]
    fn march_reports_hit_cell_and_entry_normal() {
        // solid wall of cells at x == 3, ray travelling +X at lattice height
        let hit = march_ray(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::X,
            10.0,
            |cell| cell.x == 3,
        );
        let (cell, normal) = hit.unwrap();
        assert_eq!(cell, IVec3::new(3, 2, 0));
        assert_eq!(normal, IVec3::new(-1, 0, 0));
    }

    #[test]
    fn march_from_above_yields_up_normal() {
        let hit = march_ray(
            Vec3::new(0.2, 5.0, 0.1),
            Vec3::new(0.0, -1.0, 0.0),
            10.0,
            |cell| cell.y <= 1,
        );
        let (cell, normal) = hit.unwrap();
        assert_eq!(cell.y, 1);
        assert_eq!(normal, IVec3::new(0, 1, 0));
    }

    #[test]
    fn march_misses_beyond_reach() {
        let hit = march_ray(Vec3::ZERO, Vec3::X, 4.0, |cell| cell.x >= 20);
        assert!(hit.is_none());
    }
}
