// CONTROLLER: input, entity behavior, and the per-frame update
pub mod animals;
pub mod input;
pub mod player;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod frame_loop;

pub use animals::{Animal, Species};
pub use input::{InputProcessor, InputState};
pub use player::Bird;
pub use sim::VillageSim;

#[cfg(target_arch = "wasm32")]
pub use frame_loop::FrameLoopContext;
