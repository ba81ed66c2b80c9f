use egui::{Align2, Color32, Context, Pos2, Stroke, Vec2};
use glam::Vec3;

use crate::controller::input::TouchLayout;
use crate::model::BlockKind;

/// Everything the HUD reads; built fresh each frame by the driver.
pub struct HudModel {
    pub bird_pos: Vec3,
    pub selected_kind: BlockKind,
    pub muted: bool,
    pub show_hints: bool,
    pub placed_blocks: usize,
    pub fps: f32,
    /// Touch overlay geometry, with the live joystick axes; None on
    /// pointer-only platforms.
    pub touch: Option<(TouchLayout, (f32, f32))>,
}

/// Draw the full HUD into an active egui frame.
pub fn draw_hud(ctx: &Context, model: &HudModel) {
    draw_title(ctx);
    draw_position_panel(ctx, model);
    if model.show_hints {
        draw_hints_panel(ctx);
    }
    draw_hotbar(ctx, model.selected_kind);
    draw_crosshair(ctx);
    if let Some((layout, axes)) = &model.touch {
        draw_touch_overlay(ctx, layout, *axes, model.muted);
    }
}

fn draw_title(ctx: &Context) {
    egui::Area::new(egui::Id::new("title"))
        .anchor(Align2::CENTER_TOP, [0.0, 8.0])
        .show(ctx, |ui| {
            egui::Frame::NONE
                .fill(Color32::from_black_alpha(160))
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("BLUE BIRD VILLAGE")
                            .color(Color32::from_rgb(255, 220, 0))
                            .strong(),
                    );
                });
        });
}

fn draw_position_panel(ctx: &Context, model: &HudModel) {
    egui::Window::new("Position")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("X: {:.1}", model.bird_pos.x)).small());
            ui.label(egui::RichText::new(format!("Y: {:.1}", model.bird_pos.y)).small());
            ui.label(egui::RichText::new(format!("Z: {:.1}", model.bird_pos.z)).small());
            ui.separator();
            ui.label(egui::RichText::new(format!("Blocks: {}", model.placed_blocks)).small());
            ui.label(egui::RichText::new(format!("FPS: {:.0}", model.fps)).small());
            ui.label(
                egui::RichText::new(if model.muted { "Music: off (M)" } else { "Music: on (M)" })
                    .small(),
            );
        });
}

fn draw_hints_panel(ctx: &Context) {
    egui::Window::new("How to play")
        .anchor(Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("WASD / arrows - move").small());
            ui.label(egui::RichText::new("Space - jump").small());
            ui.label(egui::RichText::new("Right click - place block").small());
            ui.label(egui::RichText::new("Left click - break block").small());
            ui.label(egui::RichText::new("1-5 / wheel - choose block").small());
            ui.label(egui::RichText::new("M - music, H - hide hints").small());
        });
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::TOP, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    let size = 8.0;
    painter.line_segment(
        [Pos2::new(center.x - size, center.y), Pos2::new(center.x + size, center.y)],
        Stroke::new(1.0, Color32::WHITE),
    );
    painter.line_segment(
        [Pos2::new(center.x, center.y - size), Pos2::new(center.x, center.y + size)],
        Stroke::new(1.0, Color32::WHITE),
    );
}

fn draw_hotbar(ctx: &Context, selected: BlockKind) {
    egui::Area::new(egui::Id::new("hotbar"))
        .anchor(Align2::CENTER_BOTTOM, [0.0, -8.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (i, kind) in BlockKind::ALL.iter().enumerate() {
                    let is_selected = *kind == selected;
                    let color = kind.color();
                    let color32 = Color32::from_rgb(
                        (color[0] * 255.0) as u8,
                        (color[1] * 255.0) as u8,
                        (color[2] * 255.0) as u8,
                    );
                    let size = if is_selected { 40.0 } else { 36.0 };
                    let frame = egui::Frame::NONE
                        .fill(color32)
                        .stroke(if is_selected {
                            Stroke::new(2.0, Color32::YELLOW)
                        } else {
                            Stroke::new(0.5, Color32::BLACK)
                        })
                        .inner_margin(2.0);
                    frame.show(ui, |ui| {
                        ui.set_min_size(Vec2::new(size, size));
                        ui.vertical_centered(|ui| {
                            ui.add_space(size / 2.0 - 12.0);
                            ui.label(
                                egui::RichText::new(format!("{}", i + 1))
                                    .size(10.0)
                                    .color(Color32::WHITE),
                            );
                            ui.label(egui::RichText::new(kind.label()).size(8.0).color(Color32::WHITE));
                        });
                    });
                }
            });
        });
}

/// Joystick rings, thumb and the three action buttons. Hit testing
/// happens on raw pointer events; this just paints the layout.
fn draw_touch_overlay(ctx: &Context, layout: &TouchLayout, axes: (f32, f32), muted: bool) {
    use crate::controller::input::JOYSTICK_RADIUS;

    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::TOP, egui::Id::new("touch")));

    let center = Pos2::new(layout.joystick_center.0, layout.joystick_center.1);
    painter.circle_filled(center, JOYSTICK_RADIUS + 10.0, Color32::from_black_alpha(120));
    painter.circle_stroke(center, JOYSTICK_RADIUS + 10.0, Stroke::new(3.0, Color32::from_white_alpha(90)));
    painter.circle_stroke(
        center,
        JOYSTICK_RADIUS * 0.55,
        Stroke::new(2.0, Color32::from_rgba_unmultiplied(100, 160, 255, 115)),
    );

    let thumb = Pos2::new(
        center.x + axes.0 * JOYSTICK_RADIUS,
        center.y + axes.1 * JOYSTICK_RADIUS,
    );
    painter.circle_filled(thumb, 26.0, Color32::from_rgba_unmultiplied(220, 228, 250, 230));
    painter.circle_filled(thumb, 7.0, Color32::from_rgb(30, 100, 220));

    let jump = Pos2::new(layout.jump_center.0, layout.jump_center.1);
    painter.circle_filled(jump, TouchLayout::JUMP_RADIUS, Color32::from_rgb(255, 200, 30));
    painter.text(
        jump,
        Align2::CENTER_CENTER,
        "JUMP",
        egui::FontId::proportional(11.0),
        Color32::from_rgb(58, 32, 0),
    );

    let mute = Pos2::new(layout.mute_center.0, layout.mute_center.1);
    let mute_fill = if muted {
        Color32::from_rgb(90, 90, 90)
    } else {
        Color32::from_rgb(40, 180, 90)
    };
    painter.circle_filled(mute, TouchLayout::BUTTON_RADIUS, mute_fill);
    painter.text(
        mute,
        Align2::CENTER_CENTER,
        if muted { "MUTED" } else { "MUSIC" },
        egui::FontId::proportional(10.0),
        Color32::WHITE,
    );

    let hints = Pos2::new(layout.hints_center.0, layout.hints_center.1);
    painter.circle_filled(hints, TouchLayout::BUTTON_RADIUS, Color32::from_rgb(255, 126, 200));
    painter.text(
        hints,
        Align2::CENTER_CENTER,
        "HINTS",
        egui::FontId::proportional(10.0),
        Color32::from_rgb(58, 0, 32),
    );
}
