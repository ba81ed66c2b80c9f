use glam::Vec3;

use super::input::MoveIntent;

pub const MOVE_SPEED: f32 = 5.5;
pub const JUMP_IMPULSE: f32 = 7.0;
pub const GRAVITY: f32 = -18.0;
/// Resting height of the bird's center above the ground slab.
pub const GROUND_Y: f32 = 0.5;
/// The bird may roam slightly past the buildable region's edge.
pub const ARENA_HALF: f32 = 14.5;
/// Per-frame convergence of the facing angle toward the motion heading.
const TURN_FACTOR: f32 = 0.12;

const FLAP_RATE_ACTIVE: f32 = 10.0;
const FLAP_RATE_IDLE: f32 = 2.0;

/// The player-controlled bird. A plain kinematic record, updated once
/// per frame; no collision beyond the ground plane and the arena clamp.
pub struct Bird {
    pub pos: Vec3,
    pub vel_y: f32,
    pub on_ground: bool,
    jump_consumed: bool,
    /// Heading of the last nonzero movement input.
    facing: f32,
    /// Smoothed render orientation, converging toward `facing`.
    pub yaw: f32,
    pub flap_phase: f32,
    pub moving: bool,
}

impl Bird {
    pub fn new() -> Self {
        Self {
            pos: Vec3::new(0.0, GROUND_Y, 0.0),
            vel_y: 0.0,
            on_ground: true,
            jump_consumed: false,
            facing: 0.0,
            yaw: 0.0,
            flap_phase: 0.0,
            moving: false,
        }
    }

    /// Body bounce while waddling.
    pub fn bob(&self) -> f32 {
        if self.moving {
            (self.flap_phase * 0.5).sin() * 0.04
        } else {
            0.0
        }
    }

    pub fn update(&mut self, keys: &MoveIntent, touch: &MoveIntent, jump_held: bool, dt: f32) {
        let intent = keys.merged(touch);

        let mut dx = 0.0f32;
        let mut dz = 0.0f32;
        if intent.forward {
            dz -= 1.0;
        }
        if intent.backward {
            dz += 1.0;
        }
        if intent.left {
            dx -= 1.0;
        }
        if intent.right {
            dx += 1.0;
        }

        self.moving = dx != 0.0 || dz != 0.0;
        if self.moving {
            let len = (dx * dx + dz * dz).sqrt();
            dx = dx / len * MOVE_SPEED * dt;
            dz = dz / len * MOVE_SPEED * dt;
            self.facing = dx.atan2(dz);
        }

        // edge-triggered jump: one impulse per press, grounded only
        if jump_held && self.on_ground && !self.jump_consumed {
            self.vel_y = JUMP_IMPULSE;
            self.on_ground = false;
            self.jump_consumed = true;
        }
        if !jump_held {
            self.jump_consumed = false;
        }

        if !self.on_ground {
            self.vel_y += GRAVITY * dt;
        }

        self.pos.x = (self.pos.x + dx).clamp(-ARENA_HALF, ARENA_HALF);
        self.pos.z = (self.pos.z + dz).clamp(-ARENA_HALF, ARENA_HALF);
        self.pos.y += self.vel_y * dt;

        if self.pos.y <= GROUND_Y {
            self.pos.y = GROUND_Y;
            self.vel_y = 0.0;
            self.on_ground = true;
        }

        if self.moving {
            self.yaw = lerp_angle(self.yaw, self.facing, TURN_FACTOR);
        }

        let flap_rate = if self.moving || !self.on_ground {
            FLAP_RATE_ACTIVE
        } else {
            FLAP_RATE_IDLE
        };
        self.flap_phase += dt * flap_rate;
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolate along the shortest arc between two angles.
fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut delta = (to - from) % TAU;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    from + delta * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::MoveIntent;

    const DT: f32 = 1.0 / 60.0;

    fn forward() -> MoveIntent {
        MoveIntent {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn forward_input_moves_toward_negative_z() {
        let mut bird = Bird::new();
        for _ in 0..60 {
            bird.update(&forward(), &MoveIntent::default(), false, DT);
        }
        assert!(bird.pos.z < -4.0 && bird.pos.z > -7.0);
        assert_eq!(bird.pos.x, 0.0);
    }

    #[test]
    fn position_clamps_to_arena() {
        let mut bird = Bird::new();
        let intent = MoveIntent {
            right: true,
            ..Default::default()
        };
        for _ in 0..600 {
            bird.update(&intent, &MoveIntent::default(), false, DT);
        }
        assert_eq!(bird.pos.x, ARENA_HALF);
    }

    #[test]
    fn jump_rises_and_lands_back_on_ground() {
        let mut bird = Bird::new();
        bird.update(&MoveIntent::default(), &MoveIntent::default(), true, DT);
        assert!(!bird.on_ground);
        let mut peak = bird.pos.y;
        for _ in 0..200 {
            bird.update(&MoveIntent::default(), &MoveIntent::default(), false, DT);
            peak = peak.max(bird.pos.y);
        }
        assert!(peak > 1.0);
        assert!(bird.on_ground);
        assert_eq!(bird.pos.y, GROUND_Y);
    }

    #[test]
    fn holding_jump_does_not_retrigger() {
        let mut bird = Bird::new();
        let mut jumps = 0;
        let mut airborne_last = false;
        for _ in 0..400 {
            bird.update(&MoveIntent::default(), &MoveIntent::default(), true, DT);
            if !airborne_last && !bird.on_ground {
                jumps += 1;
            }
            airborne_last = !bird.on_ground;
        }
        assert_eq!(jumps, 1);
    }

    #[test]
    fn releasing_jump_rearms_it() {
        let mut bird = Bird::new();
        bird.update(&MoveIntent::default(), &MoveIntent::default(), true, DT);
        while !bird.on_ground {
            bird.update(&MoveIntent::default(), &MoveIntent::default(), true, DT);
        }
        // still held: stays grounded
        bird.update(&MoveIntent::default(), &MoveIntent::default(), true, DT);
        assert!(bird.on_ground);
        // release, press again: airborne
        bird.update(&MoveIntent::default(), &MoveIntent::default(), false, DT);
        bird.update(&MoveIntent::default(), &MoveIntent::default(), true, DT);
        assert!(!bird.on_ground);
    }

    #[test]
    fn touch_input_counts_like_keys() {
        let mut bird = Bird::new();
        let touch = MoveIntent {
            left: true,
            ..Default::default()
        };
        for _ in 0..30 {
            bird.update(&MoveIntent::default(), &touch, false, DT);
        }
        assert!(bird.pos.x < -1.0);
    }

    #[test]
    fn yaw_converges_toward_heading() {
        let mut bird = Bird::new();
        let intent = MoveIntent {
            right: true,
            ..Default::default()
        };
        for _ in 0..300 {
            bird.update(&intent, &MoveIntent::default(), false, DT);
        }
        // moving +X with +Z-facing model means heading atan2(dx, dz) = pi/2
        assert!((bird.yaw - std::f32::consts::FRAC_PI_2).abs() < 0.05);
    }

    #[test]
    fn angle_lerp_takes_shortest_arc() {
        let a = lerp_angle(3.0, -3.0, 0.5);
        // crossing pi, not winding through zero
        assert!(a > 3.0 || a < -3.0);
    }
}
