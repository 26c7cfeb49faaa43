use crate::Rgb;

pub const MIN_BRUSH_RADIUS: u32 = 1;
pub const MAX_BRUSH_RADIUS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushMode {
    Paint,
    Erase,
}

/// Outline drawn around the pointer, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorDecoration {
    pub radius: u32,
    pub outline: Rgb,
}

/// Pen settings shared by every stroke of the session.
///
/// Changes apply to the next stroke only; already composited pixels are never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushState {
    color: Rgb,
    radius: u32,
    mode: BrushMode,
}

impl Default for BrushState {
    fn default() -> Self {
        Self::new(Rgb::BLACK, 25)
    }
}

impl BrushState {
    pub fn new(color: Rgb, radius: u32) -> Self {
        Self {
            color,
            radius: radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS),
            mode: BrushMode::Paint,
        }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_mode(&mut self, mode: BrushMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> BrushMode {
        self.mode = match self.mode {
            BrushMode::Paint => BrushMode::Erase,
            BrushMode::Erase => BrushMode::Paint,
        };
        self.mode
    }

    /// Applies `delta` to the radius and returns the clamped result.
    pub fn change_radius(&mut self, delta: i32) -> u32 {
        let next = (i64::from(self.radius) + i64::from(delta))
            .clamp(i64::from(MIN_BRUSH_RADIUS), i64::from(MAX_BRUSH_RADIUS));
        self.radius = next as u32;
        self.radius
    }

    pub fn cursor_decoration(&self) -> CursorDecoration {
        let outline = match self.mode {
            BrushMode::Paint => self.color,
            BrushMode::Erase => Rgb::WHITE,
        };
        CursorDecoration {
            radius: self.radius,
            outline,
        }
    }
}
