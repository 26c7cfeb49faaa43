pub mod pan;
pub mod stroke;

pub use pan::{PanDelta, PanGestureState, advance_pan};
pub use stroke::{StrokeEvent, StrokeGestureState, StrokeSegment, advance_stroke};

use model::BrushMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer event in window (device pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub phase: PointerEventPhase,
    pub button: Option<PointerButton>,
    pub screen_x: f32,
    pub screen_y: f32,
}

impl PointerInput {
    pub fn down(button: PointerButton, screen_x: f32, screen_y: f32) -> Self {
        Self {
            phase: PointerEventPhase::Down,
            button: Some(button),
            screen_x,
            screen_y,
        }
    }

    pub fn moved(screen_x: f32, screen_y: f32) -> Self {
        Self {
            phase: PointerEventPhase::Move,
            button: None,
            screen_x,
            screen_y,
        }
    }

    pub fn up(button: PointerButton, screen_x: f32, screen_y: f32) -> Self {
        Self {
            phase: PointerEventPhase::Up,
            button: Some(button),
            screen_x,
            screen_y,
        }
    }

    pub fn cancel(screen_x: f32, screen_y: f32) -> Self {
        Self {
            phase: PointerEventPhase::Cancel,
            button: None,
            screen_x,
            screen_y,
        }
    }
}

/// Discrete commands produced by key and wheel bindings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    ZoomIn { anchor_x: f32, anchor_y: f32 },
    ZoomOut { anchor_x: f32, anchor_y: f32 },
    /// Signed number of configured radius steps.
    ChangeBrushRadius { steps: i32 },
    SetMode(BrushMode),
    ToggleMode,
    SelectPaletteColor(usize),
    ResetView,
    ClearMask,
    SaveMask,
    Navigate(i32),
}
