use macroquad::prelude::*;

/// Per-frame snapshot of the logical actions the simulation consumes.
/// Movement, jump and dash are held state; attack, shoot and interact are
/// press edges. Simulation code never touches the keyboard directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
    pub attack: bool,
    pub shoot: bool,
    pub interact: bool,
}

impl InputState {
    pub fn poll() -> Self {
        Self {
            left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            jump: is_key_down(KeyCode::W)
                || is_key_down(KeyCode::Up)
                || is_key_down(KeyCode::Space),
            dash: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            attack: is_key_pressed(KeyCode::J) || is_mouse_button_pressed(MouseButton::Left),
            shoot: is_key_pressed(KeyCode::K) || is_mouse_button_pressed(MouseButton::Right),
            interact: is_key_pressed(KeyCode::E),
        }
    }
}
