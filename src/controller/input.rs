/// Platform-agnostic input state and key mapping.
use std::collections::HashSet;

use crate::model::BlockKind;

/// Four-way movement intent, merged from keyboard and joystick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    pub fn merged(&self, other: &MoveIntent) -> MoveIntent {
        MoveIntent {
            forward: self.forward || other.forward,
            backward: self.backward || other.backward,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }
}

/// Unified input state, fed by DOM listeners (WASM) or winit (native)
/// and drained by the frame loop.
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub selected_kind: BlockKind,
    pub show_hints: bool,
    pub touch_move: MoveIntent,
    /// One-shot jump signal from the touch button, cleared on consume.
    pub touch_jump: bool,
    break_click: bool,
    place_click: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            selected_kind: BlockKind::Grass,
            show_hints: true,
            touch_move: MoveIntent::default(),
            touch_jump: false,
            break_click: false,
            place_click: false,
        }
    }

    pub fn is_key_pressed(&self, code: &str) -> bool {
        self.pressed_keys.contains(code)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn press_break(&mut self) {
        self.break_click = true;
    }

    pub fn press_place(&mut self) {
        self.place_click = true;
    }

    /// Take the pending break gesture, if any.
    pub fn take_break_click(&mut self) -> bool {
        std::mem::take(&mut self.break_click)
    }

    /// Take the pending place gesture, if any.
    pub fn take_place_click(&mut self) -> bool {
        std::mem::take(&mut self.place_click)
    }

    /// Take the one-shot touch jump signal.
    pub fn take_touch_jump(&mut self) -> bool {
        std::mem::take(&mut self.touch_jump)
    }

    pub fn toggle_hints(&mut self) {
        self.show_hints = !self.show_hints;
    }

    pub fn cycle_selected_kind(&mut self, forward: bool) {
        self.selected_kind = self.selected_kind.cycled(forward);
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Key mapping, by `KeyboardEvent.code` (layout independent).
#[derive(Clone)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub jump: String,
    pub toggle_mute: String,
    pub toggle_hints: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "KeyW".to_string(),
            backward: "KeyS".to_string(),
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
            jump: "Space".to_string(),
            toggle_mute: "KeyM".to_string(),
            toggle_hints: "KeyH".to_string(),
        }
    }
}

/// Resolves raw key state into game intents.
#[derive(Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn movement(&self, input: &InputState) -> MoveIntent {
        MoveIntent {
            forward: input.is_key_pressed(&self.bindings.forward) || input.is_key_pressed("ArrowUp"),
            backward: input.is_key_pressed(&self.bindings.backward)
                || input.is_key_pressed("ArrowDown"),
            left: input.is_key_pressed(&self.bindings.left) || input.is_key_pressed("ArrowLeft"),
            right: input.is_key_pressed(&self.bindings.right) || input.is_key_pressed("ArrowRight"),
        }
    }

    pub fn is_jumping(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.bindings.jump)
    }

    pub fn wants_to_toggle_mute(&self, code: &str) -> bool {
        code == self.bindings.toggle_mute
    }

    pub fn wants_to_toggle_hints(&self, code: &str) -> bool {
        code == self.bindings.toggle_hints
    }

    pub fn kind_from_key(&self, code: &str) -> Option<BlockKind> {
        match code {
            "Digit1" => Some(BlockKind::Grass),
            "Digit2" => Some(BlockKind::Dirt),
            "Digit3" => Some(BlockKind::Stone),
            "Digit4" => Some(BlockKind::Log),
            "Digit5" => Some(BlockKind::Leaf),
            _ => None,
        }
    }

    /// Keys whose browser default (scrolling) must be suppressed.
    pub fn is_navigation_key(&self, code: &str) -> bool {
        matches!(
            code,
            "Space" | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight"
        )
    }
}

/// Virtual joystick geometry and mapping for touch screens.
///
/// The pointer offset from the stick center is normalized by the stick
/// radius, clamped to the unit disc, and folded into a `MoveIntent`
/// through a dead zone.
pub const JOYSTICK_RADIUS: f32 = 70.0;
pub const JOYSTICK_DEADZONE: f32 = 0.15;

/// Clamp a raw pixel offset to normalized axes in [-1, 1].
pub fn joystick_axes(dx: f32, dy: f32) -> (f32, f32) {
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > JOYSTICK_RADIUS {
        (dx / dist, dy / dist)
    } else {
        (dx / JOYSTICK_RADIUS, dy / JOYSTICK_RADIUS)
    }
}

/// Map normalized axes to movement; up on screen is forward.
pub fn joystick_intent(nx: f32, ny: f32) -> MoveIntent {
    MoveIntent {
        forward: ny < -JOYSTICK_DEADZONE,
        backward: ny > JOYSTICK_DEADZONE,
        left: nx < -JOYSTICK_DEADZONE,
        right: nx > JOYSTICK_DEADZONE,
    }
}

/// Hit regions of the touch overlay, in canvas pixels. The joystick sits
/// in the lower left, the action buttons in the lower right.
#[derive(Debug, Clone, Copy)]
pub struct TouchLayout {
    pub joystick_center: (f32, f32),
    pub jump_center: (f32, f32),
    pub mute_center: (f32, f32),
    pub hints_center: (f32, f32),
}

impl TouchLayout {
    pub const JUMP_RADIUS: f32 = 36.0;
    pub const BUTTON_RADIUS: f32 = 33.0;

    pub fn new(width: f32, height: f32) -> Self {
        let jr = JOYSTICK_RADIUS + 10.0;
        Self {
            joystick_center: (24.0 + jr, height - 32.0 - jr),
            jump_center: (width - 60.0, height - 150.0),
            mute_center: (width - 133.0, height - 65.0),
            hints_center: (width - 60.0, height - 65.0),
        }
    }

    fn within(center: (f32, f32), radius: f32, x: f32, y: f32) -> bool {
        let dx = x - center.0;
        let dy = y - center.1;
        dx * dx + dy * dy <= radius * radius
    }

    pub fn in_joystick(&self, x: f32, y: f32) -> bool {
        Self::within(self.joystick_center, JOYSTICK_RADIUS + 10.0, x, y)
    }

    pub fn in_jump(&self, x: f32, y: f32) -> bool {
        Self::within(self.jump_center, Self::JUMP_RADIUS, x, y)
    }

    pub fn in_mute(&self, x: f32, y: f32) -> bool {
        Self::within(self.mute_center, Self::BUTTON_RADIUS, x, y)
    }

    pub fn in_hints(&self, x: f32, y: f32) -> bool {
        Self::within(self.hints_center, Self::BUTTON_RADIUS, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_movement_merges_wasd_and_arrows() {
        let proc = InputProcessor::default();
        let mut input = InputState::new();
        input.pressed_keys.insert("KeyW".to_string());
        input.pressed_keys.insert("ArrowLeft".to_string());
        let m = proc.movement(&input);
        assert!(m.forward && m.left && !m.backward && !m.right);
    }

    #[test]
    fn digits_select_block_kinds() {
        let proc = InputProcessor::default();
        assert_eq!(proc.kind_from_key("Digit1"), Some(BlockKind::Grass));
        assert_eq!(proc.kind_from_key("Digit5"), Some(BlockKind::Leaf));
        assert_eq!(proc.kind_from_key("Digit9"), None);
    }

    #[test]
    fn click_signals_are_one_shot() {
        let mut input = InputState::new();
        input.press_break();
        assert!(input.take_break_click());
        assert!(!input.take_break_click());
        input.press_place();
        assert!(input.take_place_click());
        assert!(!input.take_place_click());
    }

    #[test]
    fn joystick_dead_zone_swallows_small_offsets() {
        let (nx, ny) = joystick_axes(7.0, -7.0);
        let m = joystick_intent(nx, ny);
        assert!(!m.any());
    }

    #[test]
    fn joystick_full_push_maps_to_direction() {
        let (nx, ny) = joystick_axes(0.0, -JOYSTICK_RADIUS);
        let m = joystick_intent(nx, ny);
        assert!(m.forward && !m.backward && !m.left && !m.right);

        let (nx, ny) = joystick_axes(JOYSTICK_RADIUS, JOYSTICK_RADIUS);
        let m = joystick_intent(nx, ny);
        assert!(m.backward && m.right);
    }

    #[test]
    fn joystick_axes_clamp_to_unit_disc() {
        let (nx, ny) = joystick_axes(300.0, 400.0);
        assert!((nx * nx + ny * ny - 1.0).abs() < 1e-5);
    }

    #[test]
    fn touch_regions_do_not_overlap() {
        let layout = TouchLayout::new(800.0, 600.0);
        let (jx, jy) = layout.joystick_center;
        assert!(layout.in_joystick(jx, jy));
        assert!(!layout.in_jump(jx, jy));
        let (mx, my) = layout.mute_center;
        assert!(layout.in_mute(mx, my));
        assert!(!layout.in_hints(mx, my));
    }
}
