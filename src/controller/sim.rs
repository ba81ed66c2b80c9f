//! Platform-neutral per-frame simulation: one update walks input,
//! player, animals, camera rig and build gestures. The WASM frame loop
//! and the native event loop both drive this and only differ in how
//! they source events and upload the results.

use glam::Vec3;

use crate::model::block::BlockSet;
use crate::model::village::ground_is_solid;
use crate::model::{Camera, FollowRig};
use crate::utils::Mesh;

use super::animals::{spawn_herd, Animal};
use super::input::{InputProcessor, InputState};
use super::player::Bird;

/// How far the crosshair ray reaches when breaking or placing.
pub const BUILD_REACH: f32 = 40.0;

pub struct VillageSim {
    pub bird: Bird,
    pub animals: Vec<Animal>,
    pub blocks: BlockSet,
    pub rig: FollowRig,
    pub processor: InputProcessor,
}

/// What a frame changed, for the render side.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEffects {
    pub blocks_dirty: bool,
}

impl VillageSim {
    pub fn new() -> Self {
        Self {
            bird: Bird::new(),
            animals: spawn_herd(),
            blocks: BlockSet::new(),
            rig: FollowRig::new(),
            processor: InputProcessor::default(),
        }
    }

    pub fn update(&mut self, input: &mut InputState, camera: &mut Camera, dt: f32) -> FrameEffects {
        let mut effects = FrameEffects::default();

        // player
        let keys = self.processor.movement(input);
        let touch_jump = input.take_touch_jump();
        let jump_held = self.processor.is_jumping(input) || touch_jump;
        let touch = input.touch_move;
        self.bird.update(&keys, &touch, jump_held, dt);

        // herd
        for animal in &mut self.animals {
            animal.update(dt);
        }

        // camera trails the bird
        self.rig.update(self.bird.pos, camera);

        // build gestures resolve against placed blocks and the ground slab
        let break_click = input.take_break_click();
        let place_click = input.take_place_click();
        if break_click || place_click {
            let hit = camera.cast_to_cell(BUILD_REACH, |cell| {
                self.blocks.contains(cell) || ground_is_solid(cell)
            });

            if let Some((cell, normal)) = hit {
                if break_click {
                    // only player-placed blocks break; the slab stays
                    if self.blocks.break_at(cell).is_some() {
                        tracing::debug!(?cell, "broke block");
                        effects.blocks_dirty = true;
                    }
                } else if place_click && normal != glam::IVec3::ZERO {
                    let target = (cell + normal).as_vec3();
                    if self.blocks.place(target, input.selected_kind).is_some() {
                        tracing::debug!(?cell, kind = ?input.selected_kind, "placed block");
                        effects.blocks_dirty = true;
                    }
                }
            }
        }

        effects
    }

    /// Mesh of all placed blocks, rebuilt whenever the set changes.
    pub fn build_blocks_mesh(&self) -> Mesh {
        let mut mesh = Mesh::empty();
        for block in self.blocks.iter() {
            mesh.push_box(block.cell.as_vec3(), Vec3::ONE, block.kind.color());
        }
        mesh
    }

    /// Mesh of every animated figure, rebuilt each frame from the poses.
    pub fn build_figures_mesh(&self) -> Mesh {
        use crate::model::figures;
        use super::animals::Species;

        let mut mesh = Mesh::empty();
        figures::push_bird(
            &mut mesh,
            self.bird.pos,
            self.bird.yaw,
            self.bird.flap_phase,
            self.bird.bob(),
        );
        for animal in &self.animals {
            let gait = if animal.is_paused() { 0.0 } else { animal.gait_phase };
            match animal.species {
                Species::Cow => figures::push_cow(&mut mesh, animal.pos, animal.direction, gait),
                Species::Pig => figures::push_pig(&mut mesh, animal.pos, animal.direction, gait),
                Species::Chicken => figures::push_chicken(
                    &mut mesh,
                    animal.pos,
                    animal.direction,
                    gait,
                    animal.bob(),
                ),
            }
        }
        mesh
    }
}

impl Default for VillageSim {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::block::snap_to_lattice;
    use glam::IVec3;

    const DT: f32 = 1.0 / 60.0;

    /// Settle the rig onto the bird so the crosshair ray is predictable.
    fn settled_sim() -> (VillageSim, InputState, Camera) {
        let mut sim = VillageSim::new();
        let mut input = InputState::new();
        let mut camera = Camera::new(800, 600);
        for _ in 0..600 {
            sim.update(&mut input, &mut camera, DT);
        }
        (sim, input, camera)
    }

    #[test]
    fn camera_settles_behind_the_bird() {
        let (sim, _, camera) = settled_sim();
        let expected = sim.bird.pos + FollowRig::OFFSET;
        assert!((camera.eye - expected).length() < 0.05);
    }

    #[test]
    fn place_gesture_adds_a_block_on_the_ground() {
        let (mut sim, mut input, mut camera) = settled_sim();
        input.press_place();
        let fx = sim.update(&mut input, &mut camera, DT);
        assert!(fx.blocks_dirty);
        assert_eq!(sim.blocks.len(), 1);
        let cell = sim.blocks.iter().next().unwrap().cell;
        assert!(cell.y >= 1);
        assert!(cell.x.abs() <= 14 && cell.z.abs() <= 14);
    }

    #[test]
    fn break_gesture_spares_the_ground_slab() {
        let (mut sim, mut input, mut camera) = settled_sim();
        input.press_break();
        let fx = sim.update(&mut input, &mut camera, DT);
        assert!(!fx.blocks_dirty);
        assert_eq!(sim.blocks.len(), 0);
    }

    #[test]
    fn break_gesture_removes_a_placed_block() {
        let (mut sim, mut input, mut camera) = settled_sim();
        input.press_place();
        sim.update(&mut input, &mut camera, DT);
        assert_eq!(sim.blocks.len(), 1);

        // the camera has barely moved; the same ray now hits the new block
        input.press_break();
        let fx = sim.update(&mut input, &mut camera, DT);
        assert!(fx.blocks_dirty);
        assert_eq!(sim.blocks.len(), 0);
    }

    #[test]
    fn stacking_climbs_the_face_normals() {
        let (mut sim, mut input, mut camera) = settled_sim();
        for _ in 0..3 {
            input.press_place();
            sim.update(&mut input, &mut camera, DT);
        }
        assert_eq!(sim.blocks.len(), 3);
        let cells: Vec<IVec3> = sim.blocks.iter().map(|b| b.cell).collect();
        // all distinct cells: each placement grew off a prior face
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn figures_mesh_covers_the_whole_herd() {
        let (sim, _, _) = settled_sim();
        let mesh = sim.build_figures_mesh();
        assert!(!mesh.is_empty());
        // bird + 8 animals, each at least a dozen boxes
        assert!(mesh.vertices.len() > 9 * 12 * 24 / 2);
    }

    #[test]
    fn blocks_mesh_tracks_the_set() {
        let mut sim = VillageSim::new();
        assert!(sim.build_blocks_mesh().is_empty());
        sim.blocks
            .place(Vec3::new(2.0, 1.0, 2.0), crate::model::BlockKind::Stone)
            .unwrap();
        let mesh = sim.build_blocks_mesh();
        assert_eq!(mesh.vertices.len(), 24);
    }

    #[test]
    fn snap_reexport_is_consistent_with_placement() {
        // guards the sim against drifting from the model's snapping rule
        assert_eq!(snap_to_lattice(Vec3::new(1.4, 0.6, -1.4)), IVec3::new(1, 1, -1));
    }
}
