//! Per-frame driver for the browser build: advances the simulation,
//! re-uploads the dynamic meshes, and prepares the egui overlay.

use std::cell::RefCell;
use std::rc::Rc;

use wgpu::{Device, Queue, Surface, TextureView};
use web_sys::Window;

use crate::audio::AmbientMusic;
use crate::model::Camera;
use crate::ui;
use crate::utils::MeshBuffer;
use crate::view::render::CameraUniform;
use crate::view::RenderState;

use super::input::{InputState, TouchLayout};
use super::sim::VillageSim;

pub struct FrameLoopContext {
    pub cam: Rc<RefCell<Camera>>,
    pub cam_buf: wgpu::Buffer,
    pub cam_buf_data: Rc<RefCell<CameraUniform>>,
    pub depth_view_cell: Rc<RefCell<TextureView>>,

    pub sim: VillageSim,
    pub input_state: Rc<RefCell<InputState>>,
    pub audio: Rc<RefCell<AmbientMusic>>,

    pub village_mesh: MeshBuffer,
    pub blocks_mesh: MeshBuffer,
    pub figures_mesh: MeshBuffer,

    pub touch_layout: Rc<RefCell<TouchLayout>>,
    pub joystick_axes: Rc<RefCell<(f32, f32)>>,

    pub egui_ctx: egui::Context,
    pub last_time: Rc<RefCell<f64>>,
}

impl FrameLoopContext {
    /// Advance one frame: simulation, mesh uploads, uniforms, UI.
    pub fn update(
        &mut self,
        device: &Device,
        queue: &Queue,
        window: &Window,
        surface: &Surface,
        render_state: &mut RenderState,
    ) {
        // Time step
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let mut last = self.last_time.borrow_mut();
        let dt = ((now - *last) / 1000.0).clamp(0.0, 0.1) as f32;
        *last = now;
        drop(last);

        // Simulation
        let effects = {
            let mut input = self.input_state.borrow_mut();
            let mut cam = self.cam.borrow_mut();
            self.sim.update(&mut input, &mut cam, dt)
        };

        // Dynamic meshes: figures every frame, blocks only on change
        self.figures_mesh = self.sim.build_figures_mesh().upload(device);
        if effects.blocks_dirty {
            self.blocks_mesh = self.sim.build_blocks_mesh().upload(device);
        }

        // Resize handling
        self.handle_resize(window, device, surface, render_state);

        // Camera uniform
        self.cam_buf_data.borrow_mut().view_proj = self.cam.borrow().view_proj().to_cols_array_2d();
        queue.write_buffer(&self.cam_buf, 0, bytemuck::bytes_of(&*self.cam_buf_data.borrow()));

        // Build the HUD
        let dpr = window.device_pixel_ratio() as f32;
        let logical_w = render_state.width as f32 / dpr;
        let logical_h = render_state.height as f32 / dpr;
        *self.touch_layout.borrow_mut() = TouchLayout::new(logical_w, logical_h);

        let hud = ui::HudModel {
            bird_pos: self.sim.bird.pos,
            selected_kind: self.input_state.borrow().selected_kind,
            muted: self.audio.borrow().is_muted(),
            show_hints: self.input_state.borrow().show_hints,
            placed_blocks: self.sim.blocks.len(),
            fps: if dt > 0.0 { 1.0 / dt } else { 0.0 },
            touch: Some((*self.touch_layout.borrow(), *self.joystick_axes.borrow())),
        };

        let mut raw_input = egui::RawInput::default();
        raw_input.time = Some(now / 1000.0);
        raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::new(0.0, 0.0),
            egui::vec2(logical_w, logical_h),
        ));
        self.egui_ctx.set_pixels_per_point(dpr);

        let mut full_output = self.egui_ctx.run(raw_input, |ctx| ui::draw_hud(ctx, &hud));
        let primitives = self
            .egui_ctx
            .tessellate(std::mem::take(&mut full_output.shapes), dpr);
        render_state.egui_primitives = Some(primitives);
        render_state.egui_full_output = Some(full_output);
        render_state.egui_dpr = dpr;
    }

    fn handle_resize(
        &self,
        window: &Window,
        device: &Device,
        surface: &Surface,
        render_state: &mut RenderState,
    ) {
        if let (Ok(w), Ok(h)) = (window.inner_width(), window.inner_height()) {
            let nw = w.as_f64().unwrap_or(800.0) as u32;
            let nh = h.as_f64().unwrap_or(600.0) as u32;
            if nw != render_state.width || nh != render_state.height {
                self.cam.borrow_mut().set_aspect(nw, nh);
                render_state.width = nw;
                render_state.height = nh;

                let config = wgpu::SurfaceConfiguration {
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    format: render_state.format,
                    width: nw,
                    height: nh,
                    present_mode: wgpu::PresentMode::Fifo,
                    alpha_mode: render_state.alpha_mode,
                    view_formats: vec![],
                    desired_maximum_frame_latency: 2,
                };
                surface.configure(device, &config);

                let (_, depth_view) = crate::view::create_depth_texture(device, nw, nh);
                *self.depth_view_cell.borrow_mut() = depth_view;
            }
        }
    }
}
