use std::sync::Arc;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

// Import from the library crate
use voxville::{audio, controller, logging, model, ui, view};

use audio::AmbientMusic;
use controller::{InputState, VillageSim};
use model::{village, Camera};
use view::render::CameraUniform;
use view::{GpuContext, LightingUniform, RenderState};
use voxville::utils::MeshBuffer;

struct App {
    // Core GPU resources
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    surface: wgpu::Surface<'static>,
    window: Arc<Window>,

    // Rendering state
    render_state: RenderState,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    sim: VillageSim,
    camera: Camera,
    input: InputState,
    music: AmbientMusic,

    // Meshes
    village_mesh: MeshBuffer,
    blocks_mesh: MeshBuffer,
    figures_mesh: MeshBuffer,

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone()).unwrap();
        let gpu = GpuContext::new_native(&instance, surface, size.width, size.height).await;

        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (_depth_texture, depth_view) =
            view::create_depth_texture(&device, size.width, size.height);

        let camera = Camera::new(size.width, size.height);

        let camera_resources = view::create_camera_resources(&device);
        let camera_buffer = camera_resources.camera_buffer;
        let camera_bind_group = camera_resources.camera_bind_group;

        let cam_data = CameraUniform {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        queue.write_buffer(&camera_buffer, 0, bytemuck::bytes_of(&cam_data));
        queue.write_buffer(
            &camera_resources.lighting_buffer,
            0,
            bytemuck::bytes_of(&LightingUniform::daylight()),
        );

        let pipeline = view::create_scene_pipeline(
            &device,
            config.format,
            &camera_resources.bind_group_layout,
            depth_format,
        );

        // egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, config.format, egui_wgpu::RendererOptions::default());

        // Game systems and static content
        let sim = VillageSim::new();
        let village_mesh = village::build_village_mesh().upload(&device);
        let blocks_mesh = sim.build_blocks_mesh().upload(&device);
        let figures_mesh = sim.build_figures_mesh().upload(&device);

        let render_state = RenderState {
            format: config.format,
            alpha_mode: config.alpha_mode,
            width: size.width,
            height: size.height,
            pipeline,
            egui_renderer,
            egui_primitives: None,
            egui_full_output: None,
            egui_dpr: 1.0,
        };

        Self {
            device,
            queue,
            config,
            surface: gpu.surface,
            window,
            render_state,
            depth_view,
            camera_buffer,
            camera_bind_group,
            egui_state,
            egui_ctx,
            sim,
            camera,
            input: InputState::new(),
            music: AmbientMusic::new(),
            village_mesh,
            blocks_mesh,
            figures_mesh,
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        let egui_captured = self
            .egui_state
            .on_window_event(self.window.as_ref(), event)
            .consumed;
        if egui_captured {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    if let Some(name) = key_code_name(*code) {
                        match state {
                            ElementState::Pressed => {
                                let processor = self.sim.processor.clone();
                                if processor.wants_to_toggle_mute(name) {
                                    self.music.toggle_mute();
                                } else if processor.wants_to_toggle_hints(name) {
                                    self.input.toggle_hints();
                                } else if let Some(kind) = processor.kind_from_key(name) {
                                    self.input.selected_kind = kind;
                                }
                                self.input.pressed_keys.insert(name.to_string());
                            }
                            ElementState::Released => {
                                self.input.pressed_keys.remove(name);
                            }
                        }
                    }
                }
                true
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                match button {
                    MouseButton::Left => self.input.press_break(),
                    MouseButton::Right => self.input.press_place(),
                    _ => {}
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                if dy != 0.0 {
                    self.input.cycle_selected_kind(dy < 0.0);
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.input.clear_keys();
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (_depth_texture, depth_view) =
                view::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_view = depth_view;

            self.camera.set_aspect(new_size.width, new_size.height);
            self.render_state.width = new_size.width;
            self.render_state.height = new_size.height;
        }
    }

    fn update(&mut self, dt: f32) {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        let effects = self.sim.update(&mut self.input, &mut self.camera, dt);

        self.figures_mesh = self.sim.build_figures_mesh().upload(&self.device);
        if effects.blocks_dirty {
            self.blocks_mesh = self.sim.build_blocks_mesh().upload(&self.device);
        }

        let cam_data = CameraUniform {
            view_proj: self.camera.view_proj().to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&cam_data));
    }

    fn render(&mut self) {
        // Build the HUD through the shared ui module
        let hud = ui::HudModel {
            bird_pos: self.sim.bird.pos,
            selected_kind: self.input.selected_kind,
            muted: self.music.is_muted(),
            show_hints: self.input.show_hints,
            placed_blocks: self.sim.blocks.len(),
            fps: self.fps,
            touch: None,
        };

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| ui::draw_hud(ctx, &hud));
        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output.clone());

        let dpr = self.window.scale_factor() as f32;
        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes.clone(), dpr);
        self.render_state.egui_primitives = Some(primitives);
        self.render_state.egui_full_output = Some(full_output);
        self.render_state.egui_dpr = dpr;

        self.render_state.draw_frame(
            &self.device,
            &self.queue,
            &self.surface,
            &[&self.village_mesh, &self.blocks_mesh, &self.figures_mesh],
            &self.depth_view,
            &self.camera_bind_group,
        );
    }
}

/// Map winit key codes onto the DOM `code` names the bindings use.
fn key_code_name(code: KeyCode) -> Option<&'static str> {
    Some(match code {
        KeyCode::KeyW => "KeyW",
        KeyCode::KeyA => "KeyA",
        KeyCode::KeyS => "KeyS",
        KeyCode::KeyD => "KeyD",
        KeyCode::KeyM => "KeyM",
        KeyCode::KeyH => "KeyH",
        KeyCode::Space => "Space",
        KeyCode::ArrowUp => "ArrowUp",
        KeyCode::ArrowDown => "ArrowDown",
        KeyCode::ArrowLeft => "ArrowLeft",
        KeyCode::ArrowRight => "ArrowRight",
        KeyCode::Digit1 => "Digit1",
        KeyCode::Digit2 => "Digit2",
        KeyCode::Digit3 => "Digit3",
        KeyCode::Digit4 => "Digit4",
        KeyCode::Digit5 => "Digit5",
        _ => return None,
    })
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("Voxville")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    #[allow(deprecated)]
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone()));

    #[allow(deprecated)]
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            app.update(dt);
                            app.render();
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .unwrap();
}
