use driver::{InputCommand, PointerButton};
use model::BrushMode;
use smallvec::{SmallVec, smallvec};
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

const PIXELS_PER_SCROLL_LINE: f32 = 120.0;

pub type Commands = SmallVec<[InputCommand; 2]>;

pub fn commands_for_key(key: KeyCode) -> Commands {
    match key {
        KeyCode::Space => smallvec![InputCommand::ResetView],
        KeyCode::KeyE => smallvec![InputCommand::SetMode(BrushMode::Erase)],
        KeyCode::KeyX => smallvec![InputCommand::ToggleMode],
        KeyCode::KeyC => smallvec![InputCommand::ClearMask],
        KeyCode::KeyS => smallvec![InputCommand::SaveMask],
        KeyCode::Comma => smallvec![InputCommand::Navigate(-1)],
        KeyCode::Period => smallvec![InputCommand::Navigate(1)],
        other => match palette_slot(other) {
            Some(slot) => smallvec![
                InputCommand::SetMode(BrushMode::Paint),
                InputCommand::SelectPaletteColor(slot),
            ],
            None => SmallVec::new(),
        },
    }
}

fn palette_slot(key: KeyCode) -> Option<usize> {
    let slot = match key {
        KeyCode::Digit0 | KeyCode::Numpad0 => 0,
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        KeyCode::Digit7 | KeyCode::Numpad7 => 7,
        KeyCode::Digit8 | KeyCode::Numpad8 => 8,
        KeyCode::Digit9 | KeyCode::Numpad9 => 9,
        _ => return None,
    };
    Some(slot)
}

pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, vertical_lines) => vertical_lines,
        MouseScrollDelta::PixelDelta(physical_position) => {
            (physical_position.y as f32) / PIXELS_PER_SCROLL_LINE
        }
    }
}

/// Wheel zooms about the pointer; with Ctrl held it resizes the brush instead.
pub fn commands_for_wheel(vertical_lines: f32, control_held: bool, anchor: (f32, f32)) -> Commands {
    if vertical_lines == 0.0 || !vertical_lines.is_finite() {
        return SmallVec::new();
    }
    let forward = vertical_lines > 0.0;
    if control_held {
        let steps = if forward { 1 } else { -1 };
        return smallvec![InputCommand::ChangeBrushRadius { steps }];
    }
    let (anchor_x, anchor_y) = anchor;
    if forward {
        smallvec![InputCommand::ZoomIn { anchor_x, anchor_y }]
    } else {
        smallvec![InputCommand::ZoomOut { anchor_x, anchor_y }]
    }
}

pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn digit_keys_select_palette_color_in_paint_mode() {
        let commands = commands_for_key(KeyCode::Digit2);
        assert_eq!(
            commands.as_slice(),
            &[
                InputCommand::SetMode(BrushMode::Paint),
                InputCommand::SelectPaletteColor(2),
            ]
        );
        assert_eq!(
            commands_for_key(KeyCode::Numpad0).as_slice(),
            &[
                InputCommand::SetMode(BrushMode::Paint),
                InputCommand::SelectPaletteColor(0),
            ]
        );
    }

    #[test]
    fn editing_and_navigation_keys_map_to_single_commands() {
        let cases = [
            (KeyCode::Space, InputCommand::ResetView),
            (KeyCode::KeyE, InputCommand::SetMode(BrushMode::Erase)),
            (KeyCode::KeyX, InputCommand::ToggleMode),
            (KeyCode::KeyC, InputCommand::ClearMask),
            (KeyCode::KeyS, InputCommand::SaveMask),
            (KeyCode::Comma, InputCommand::Navigate(-1)),
            (KeyCode::Period, InputCommand::Navigate(1)),
        ];
        for (key, expected) in cases {
            assert_eq!(commands_for_key(key).as_slice(), &[expected], "{key:?}");
        }
        assert!(commands_for_key(KeyCode::KeyQ).is_empty());
    }

    #[test]
    fn wheel_zooms_about_anchor_or_resizes_brush_with_control() {
        assert_eq!(
            commands_for_wheel(1.0, false, (12.0, 34.0)).as_slice(),
            &[InputCommand::ZoomIn {
                anchor_x: 12.0,
                anchor_y: 34.0,
            }]
        );
        assert_eq!(
            commands_for_wheel(-0.5, false, (1.0, 2.0)).as_slice(),
            &[InputCommand::ZoomOut {
                anchor_x: 1.0,
                anchor_y: 2.0,
            }]
        );
        assert_eq!(
            commands_for_wheel(-3.0, true, (0.0, 0.0)).as_slice(),
            &[InputCommand::ChangeBrushRadius { steps: -1 }]
        );
        assert!(commands_for_wheel(0.0, true, (0.0, 0.0)).is_empty());
    }

    #[test]
    fn pixel_scroll_is_converted_to_lines() {
        let lines = scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -240.0)));
        assert_eq!(lines, -2.0);
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, 1.5)), 1.5);
    }

    #[test]
    fn mouse_buttons_map_to_pointer_buttons() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(MouseButton::Back), None);
    }
}
