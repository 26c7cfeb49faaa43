use std::path::Path;

use driver::{
    PointerButton, PointerEventPhase, PointerInput, StrokeEvent, StrokeGestureState,
    advance_stroke,
};
use model::{BrushState, PixelRect, RasterBuffer, ScenePoint};
use view::ViewTransform;

use crate::{RasterIo, RasterIoError};

/// The editable mask of the loaded sample together with its stroke gesture.
pub struct LabelLayer {
    mask: RasterBuffer,
    gesture: StrokeGestureState,
    revision: u64,
    saved_revision: u64,
}

impl LabelLayer {
    pub fn new(width: u32, height: u32) -> Result<Self, RasterIoError> {
        let mask = RasterBuffer::new_transparent(width, height)
            .map_err(|_| RasterIoError::InvalidGeometry { width, height })?;
        Ok(Self {
            mask,
            gesture: StrokeGestureState::Idle,
            revision: 0,
            saved_revision: 0,
        })
    }

    pub fn mask(&self) -> &RasterBuffer {
        &self.mask
    }

    pub fn gesture(&self) -> StrokeGestureState {
        self.gesture
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.gesture, StrokeGestureState::Stroking { .. })
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when the mask changed since it was last loaded or exported.
    pub fn is_modified(&self) -> bool {
        self.revision != self.saved_revision
    }

    pub fn handle_stroke_event(
        &mut self,
        brush: &BrushState,
        event: StrokeEvent,
    ) -> Option<PixelRect> {
        let (next_state, segment) = advance_stroke(self.gesture, event);
        self.gesture = next_state;
        let segment = segment?;
        let touched = self.mask.composite_segment(
            segment.from,
            segment.to,
            brush.radius(),
            brush.color(),
            brush.mode(),
        );
        if touched.is_some() {
            self.revision += 1;
        }
        touched
    }

    /// Maps a window-space pointer event into the scene and feeds the stroke gesture.
    pub fn handle_pointer(
        &mut self,
        view: &ViewTransform,
        brush: &BrushState,
        input: PointerInput,
    ) -> Option<PixelRect> {
        let event = match view.screen_to_canvas_point(input.screen_x, input.screen_y) {
            Ok((x, y)) => StrokeEvent {
                phase: input.phase,
                button: input.button,
                point: ScenePoint::new(x, y),
            },
            Err(error) => {
                log::warn!("dropping pointer event outside the scene: {error}");
                StrokeEvent {
                    phase: PointerEventPhase::Cancel,
                    button: None,
                    point: ScenePoint::new(0.0, 0.0),
                }
            }
        };
        self.handle_stroke_event(brush, event)
    }

    pub fn begin_stroke(&mut self, brush: &BrushState, point: ScenePoint) -> Option<PixelRect> {
        self.handle_stroke_event(
            brush,
            StrokeEvent {
                phase: PointerEventPhase::Down,
                button: Some(PointerButton::Primary),
                point,
            },
        )
    }

    pub fn continue_stroke(&mut self, brush: &BrushState, point: ScenePoint) -> Option<PixelRect> {
        self.handle_stroke_event(
            brush,
            StrokeEvent {
                phase: PointerEventPhase::Move,
                button: None,
                point,
            },
        )
    }

    pub fn end_stroke(&mut self, brush: &BrushState, point: ScenePoint) {
        self.handle_stroke_event(
            brush,
            StrokeEvent {
                phase: PointerEventPhase::Up,
                button: Some(PointerButton::Primary),
                point,
            },
        );
    }

    /// Replaces the mask with the decoded file, which must match the image size.
    pub fn set_image(
        &mut self,
        io: &impl RasterIo,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RasterIoError> {
        let mask = io.read_raster(path)?;
        if mask.size() != (width, height) {
            return Err(RasterIoError::DimensionMismatch {
                path: path.to_path_buf(),
                expected: (width, height),
                actual: mask.size(),
            });
        }
        self.mask = mask;
        self.gesture = StrokeGestureState::Idle;
        self.saved_revision = self.revision;
        log::debug!("loaded mask {}", path.display());
        Ok(())
    }

    /// Loads the mask at `path`, or starts blank when no file exists.
    ///
    /// Returns whether a persisted mask was found.
    pub fn load_or_clear(
        &mut self,
        io: &impl RasterIo,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<bool, RasterIoError> {
        if io.exists(path) {
            self.set_image(io, path, width, height)?;
            return Ok(true);
        }
        self.clear(width, height)?;
        self.gesture = StrokeGestureState::Idle;
        self.saved_revision = self.revision;
        Ok(false)
    }

    pub fn clear(&mut self, width: u32, height: u32) -> Result<(), RasterIoError> {
        self.mask
            .clear(width, height)
            .map_err(|_| RasterIoError::InvalidGeometry { width, height })?;
        self.revision += 1;
        Ok(())
    }

    pub fn export(&mut self, io: &impl RasterIo, path: &Path) -> Result<(), RasterIoError> {
        io.write_raster(path, &self.mask)?;
        self.saved_revision = self.revision;
        log::debug!("exported mask {}", path.display());
        Ok(())
    }
}
