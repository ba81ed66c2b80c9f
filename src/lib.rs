// Re-export all public modules so they can be used from main.rs
pub mod audio;
pub mod logging;
pub mod ui;
pub mod utils;

// MVC Architecture
pub mod controller;
pub mod model;
pub mod view;

// Common imports (browser entry only; the native binary lives in main.rs)
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{
    Document, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent, WheelEvent, Window,
};

#[cfg(target_arch = "wasm32")]
use audio::AmbientMusic;
#[cfg(target_arch = "wasm32")]
use controller::input::{joystick_axes, joystick_intent, MoveIntent, TouchLayout};
#[cfg(target_arch = "wasm32")]
use controller::{FrameLoopContext, InputProcessor, InputState, VillageSim};
#[cfg(target_arch = "wasm32")]
use model::{village, Camera};
#[cfg(target_arch = "wasm32")]
use view::render::CameraUniform;
#[cfg(target_arch = "wasm32")]
use view::GpuContext;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init();
    let (window, document, canvas) = init_canvas()?;
    setup_app(&window, &document, &canvas).await
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    let width = canvas.width();
    let height = canvas.height();

    let gpu = GpuContext::new(canvas, width, height)
        .await
        .map_err(|e| js_error(format!("GPU init failed: {e:?}")))?;

    // Camera + lighting resources
    let cam = Rc::new(RefCell::new(Camera::new(width, height)));
    let camera_resources = view::create_camera_resources(gpu.device.as_ref());
    let cam_buf = camera_resources.camera_buffer;
    let cam_bg = camera_resources.camera_bind_group;
    let cam_bgl = camera_resources.bind_group_layout;

    let cam_buf_data = Rc::new(RefCell::new(CameraUniform {
        view_proj: cam.borrow().view_proj().to_cols_array_2d(),
    }));
    gpu.queue
        .as_ref()
        .write_buffer(&cam_buf, 0, bytemuck::bytes_of(&*cam_buf_data.borrow()));

    let lighting = view::LightingUniform::daylight();
    gpu.queue
        .as_ref()
        .write_buffer(&camera_resources.lighting_buffer, 0, bytemuck::bytes_of(&lighting));

    // Depth + pipeline
    let depth_format = wgpu::TextureFormat::Depth32Float;
    let (_depth_tex, depth_view) = view::create_depth_texture(gpu.device.as_ref(), width, height);
    let depth_view_cell = Rc::new(RefCell::new(depth_view));
    let pipeline = view::create_scene_pipeline(gpu.device.as_ref(), gpu.format, &cam_bgl, depth_format);

    // Simulation and static content
    let sim = VillageSim::new();
    let village_mesh = village::build_village_mesh().upload(gpu.device.as_ref());
    let blocks_mesh = sim.build_blocks_mesh().upload(gpu.device.as_ref());
    let figures_mesh = sim.build_figures_mesh().upload(gpu.device.as_ref());

    let input_state = Rc::new(RefCell::new(InputState::new()));
    let music = Rc::new(RefCell::new(AmbientMusic::new()));
    let touch_layout = Rc::new(RefCell::new(TouchLayout::new(width as f32, height as f32)));
    let joystick_axes_cell: Rc<RefCell<(f32, f32)>> = Rc::new(RefCell::new((0.0, 0.0)));

    let egui_ctx = egui::Context::default();
    let egui_renderer =
        egui_wgpu::Renderer::new(gpu.device.as_ref(), gpu.format, egui_wgpu::RendererOptions::default());

    setup_input_listeners(
        document,
        window,
        canvas,
        input_state.clone(),
        music.clone(),
        touch_layout.clone(),
        joystick_axes_cell.clone(),
    )?;

    let mut render_state = view::RenderState {
        format: gpu.format,
        alpha_mode: gpu.config.alpha_mode,
        width,
        height,
        pipeline,
        egui_renderer,
        egui_primitives: None,
        egui_full_output: None,
        egui_dpr: 1.0,
    };

    let mut frame_ctx = FrameLoopContext {
        cam: cam.clone(),
        cam_buf: cam_buf.clone(),
        cam_buf_data,
        depth_view_cell,
        sim,
        input_state,
        audio: music,
        village_mesh,
        blocks_mesh,
        figures_mesh,
        touch_layout,
        joystick_axes: joystick_axes_cell,
        egui_ctx,
        last_time: Rc::new(RefCell::new(
            window.performance().map(|p| p.now()).unwrap_or(0.0),
        )),
    };

    tracing::info!("village ready, entering frame loop");

    // Continuous redraw using requestAnimationFrame
    let window_for_loop = window.clone();
    run_frame_loop(window.clone(), move || {
        frame_ctx.update(
            gpu.device.as_ref(),
            gpu.queue.as_ref(),
            &window_for_loop,
            &gpu.surface,
            &mut render_state,
        );

        let dv = frame_ctx.depth_view_cell.borrow();
        render_state.draw_frame(
            gpu.device.as_ref(),
            gpu.queue.as_ref(),
            &gpu.surface,
            &[
                &frame_ctx.village_mesh,
                &frame_ctx.blocks_mesh,
                &frame_ctx.figures_mesh,
            ],
            &dv,
            &cam_bg,
        );
    });

    Ok(())
}

/// Register all DOM listeners: keyboard, pointer (mouse build gestures
/// and the touch joystick/buttons), wheel, and focus loss.
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    document: &Document,
    window: &Window,
    canvas: &HtmlCanvasElement,
    input_state: Rc<RefCell<InputState>>,
    music: Rc<RefCell<AmbientMusic>>,
    touch_layout: Rc<RefCell<TouchLayout>>,
    joystick_axes_cell: Rc<RefCell<(f32, f32)>>,
) -> Result<(), JsValue> {
    let processor = InputProcessor::default();
    let active_joystick_pointer: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));

    // Keyboard down
    {
        let input_state = input_state.clone();
        let music = music.clone();
        let processor = processor.clone();
        let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let code = e.code();

            if processor.wants_to_toggle_mute(&code) {
                let muted = music.borrow_mut().toggle_mute();
                tracing::debug!(muted, "music toggled");
                e.prevent_default();
            } else if processor.wants_to_toggle_hints(&code) {
                input_state.borrow_mut().toggle_hints();
                e.prevent_default();
            }

            if let Some(kind) = processor.kind_from_key(&code) {
                input_state.borrow_mut().selected_kind = kind;
                e.prevent_default();
            }

            if processor.is_navigation_key(&code) {
                e.prevent_default();
            }

            input_state.borrow_mut().pressed_keys.insert(code);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Keyboard up
    {
        let input_state = input_state.clone();
        let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            input_state.borrow_mut().pressed_keys.remove(e.code().as_str());
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
        keyup.forget();
    }

    // Focus loss and tab switches clear all keys
    {
        let input_state = input_state.clone();
        let blur = Closure::wrap(Box::new(move |_e: Event| {
            input_state.borrow_mut().clear_keys();
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }
    {
        let input_state = input_state.clone();
        let visibility = Closure::wrap(Box::new(move |_e: Event| {
            input_state.borrow_mut().clear_keys();
        }) as Box<dyn FnMut(Event)>);
        document
            .add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
        visibility.forget();
    }

    // Pointer down: touch overlay first, then mouse build gestures
    {
        let input_state = input_state.clone();
        let music = music.clone();
        let touch_layout = touch_layout.clone();
        let active = active_joystick_pointer.clone();
        let canvas_for_rect = canvas.clone();
        let window_for_dpr = window.clone();
        let pointerdown = Closure::wrap(Box::new(move |e: PointerEvent| {
            let (x, y) = pointer_logical(&canvas_for_rect, &window_for_dpr, &e);
            let layout = *touch_layout.borrow();

            if layout.in_joystick(x, y) {
                *active.borrow_mut() = Some(e.pointer_id());
            } else if layout.in_jump(x, y) {
                input_state.borrow_mut().touch_jump = true;
            } else if layout.in_mute(x, y) {
                music.borrow_mut().toggle_mute();
            } else if layout.in_hints(x, y) {
                input_state.borrow_mut().toggle_hints();
            } else {
                match e.button() {
                    0 => input_state.borrow_mut().press_break(),
                    2 => input_state.borrow_mut().press_place(),
                    _ => {}
                }
            }
            e.prevent_default();
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointerdown", pointerdown.as_ref().unchecked_ref())?;
        pointerdown.forget();
    }

    // Pointer move drives the joystick while captured
    {
        let input_state = input_state.clone();
        let touch_layout = touch_layout.clone();
        let axes_cell = joystick_axes_cell.clone();
        let active = active_joystick_pointer.clone();
        let canvas_for_rect = canvas.clone();
        let window_for_dpr = window.clone();
        let pointermove = Closure::wrap(Box::new(move |e: PointerEvent| {
            if *active.borrow() != Some(e.pointer_id()) {
                return;
            }
            let (x, y) = pointer_logical(&canvas_for_rect, &window_for_dpr, &e);
            let center = touch_layout.borrow().joystick_center;
            let (nx, ny) = joystick_axes(x - center.0, y - center.1);
            *axes_cell.borrow_mut() = (nx, ny);
            input_state.borrow_mut().touch_move = joystick_intent(nx, ny);
        }) as Box<dyn FnMut(PointerEvent)>);
        document.add_event_listener_with_callback("pointermove", pointermove.as_ref().unchecked_ref())?;
        pointermove.forget();
    }

    // Pointer up / cancel releases the joystick
    for event_name in ["pointerup", "pointercancel"] {
        let input_state = input_state.clone();
        let axes_cell = joystick_axes_cell.clone();
        let active = active_joystick_pointer.clone();
        let pointerup = Closure::wrap(Box::new(move |e: PointerEvent| {
            if *active.borrow() == Some(e.pointer_id()) {
                *active.borrow_mut() = None;
                *axes_cell.borrow_mut() = (0.0, 0.0);
                input_state.borrow_mut().touch_move = MoveIntent::default();
            }
        }) as Box<dyn FnMut(PointerEvent)>);
        document.add_event_listener_with_callback(event_name, pointerup.as_ref().unchecked_ref())?;
        pointerup.forget();
    }

    // Right click belongs to block placement
    {
        let contextmenu = Closure::wrap(Box::new(move |e: MouseEvent| {
            e.prevent_default();
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback("contextmenu", contextmenu.as_ref().unchecked_ref())?;
        contextmenu.forget();
    }

    // Wheel cycles the selected block kind
    {
        let input_state = input_state.clone();
        let wheel = Closure::wrap(Box::new(move |e: WheelEvent| {
            let dy = e.delta_y();
            if dy != 0.0 {
                input_state.borrow_mut().cycle_selected_kind(dy > 0.0);
                e.prevent_default();
            }
        }) as Box<dyn FnMut(WheelEvent)>);
        document.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
        wheel.forget();
    }

    Ok(())
}

/// Pointer position in the HUD's logical coordinate space.
#[cfg(target_arch = "wasm32")]
fn pointer_logical(canvas: &HtmlCanvasElement, window: &Window, e: &PointerEvent) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let dpr = window.device_pixel_ratio() as f32;
    (
        (e.client_x() as f32 - rect.left() as f32) / dpr,
        (e.client_y() as f32 - rect.top() as f32) / dpr,
    )
}

#[cfg(target_arch = "wasm32")]
fn init_canvas() -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
    let window = web_sys::window().ok_or(js_error("no global `window`"))?;
    let document = window.document().ok_or(js_error("no document on window"))?;
    let body = document.body().ok_or(js_error("no body on document"))?;

    let width = window
        .inner_width()?
        .as_f64()
        .unwrap_or(800.0) as u32;
    let height = window
        .inner_height()?
        .as_f64()
        .unwrap_or(600.0) as u32;

    let canvas_el = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("failed to create canvas"))?;
    canvas_el.set_width(width);
    canvas_el.set_height(height);
    body.append_child(&canvas_el)?;
    Ok((window, document, canvas_el))
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: Into<String>>(msg: E) -> JsValue {
    JsValue::from_str(&msg.into())
}

/// Drive `frame` once per display refresh. The closure reschedules
/// itself through requestAnimationFrame and is intentionally leaked so
/// it lives as long as the page.
#[cfg(target_arch = "wasm32")]
fn run_frame_loop(window: Window, mut frame: impl FnMut() + 'static) {
    let handle: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let handle_for_tick = handle.clone();
    let window_for_tick = window.clone();

    *handle.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame();

        let tick = handle_for_tick.borrow();
        window_for_tick
            .request_animation_frame(tick.as_ref().unwrap().as_ref().unchecked_ref())
            .expect("requestAnimationFrame failed");
    }) as Box<dyn FnMut()>));

    window
        .request_animation_frame(handle.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        .expect("requestAnimationFrame failed");

    std::mem::forget(handle);
}
