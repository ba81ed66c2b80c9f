// MODEL: scene content and simulation data
pub mod block;
pub mod camera;
pub mod figures;
pub mod village;

pub use block::{BlockKind, BlockSet, PlacedBlock};
pub use camera::{Camera, FollowRig};
