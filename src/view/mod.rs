// VIEW: GPU initialization and per-frame drawing
pub mod gpu_init;
pub mod render;

pub use gpu_init::GpuContext;
pub use render::{create_camera_resources, create_depth_texture, create_scene_pipeline};
pub use render::{CameraResources, CameraUniform, LightingUniform, RenderState};
