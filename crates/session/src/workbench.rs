use document::{LabelLayer, RasterIo};
use driver::{PanGestureState, PointerInput, advance_pan};
use model::{BrushState, PixelRect, RasterBuffer};
use view::ViewTransform;

use crate::{Sample, SessionError};

/// Everything attached to the window: the source image, its mask, and the view onto both.
pub struct Workbench {
    image: RasterBuffer,
    label_layer: LabelLayer,
    view: ViewTransform,
    viewport_width: u32,
    viewport_height: u32,
    pan: PanGestureState,
    cursor: Option<(f32, f32)>,
}

impl Workbench {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Result<Self, SessionError> {
        let image = RasterBuffer::new_transparent(1, 1).map_err(|_| {
            SessionError::InvalidGeometry {
                width: 1,
                height: 1,
            }
        })?;
        Ok(Self {
            image,
            label_layer: LabelLayer::new(1, 1)?,
            view: ViewTransform::default(),
            viewport_width: viewport_width.max(1),
            viewport_height: viewport_height.max(1),
            pan: PanGestureState::Idle,
            cursor: None,
        })
    }

    pub fn image(&self) -> &RasterBuffer {
        &self.image
    }

    pub fn label_layer(&self) -> &LabelLayer {
        &self.label_layer
    }

    pub fn label_layer_mut(&mut self) -> &mut LabelLayer {
        &mut self.label_layer
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Last pointer position in window coordinates, `None` once it left the window.
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanGestureState::Panning { .. })
    }

    /// Swaps in the sample's image and mask, then fits the view.
    ///
    /// Nothing is replaced unless both decode. Returns whether a mask file existed.
    pub fn load_sample(&mut self, io: &impl RasterIo, sample: &Sample) -> Result<bool, SessionError> {
        let image = io.read_raster(sample.image_path())?;
        let (width, height) = image.size();
        let mask_found = self
            .label_layer
            .load_or_clear(io, sample.label_path(), width, height)?;
        self.image = image;
        self.fit_view()?;
        Ok(mask_found)
    }

    pub fn fit_view(&mut self) -> Result<(), SessionError> {
        self.view.fit_to_content(
            self.image.width() as f32,
            self.image.height() as f32,
            self.viewport_width as f32,
            self.viewport_height as f32,
        )?;
        Ok(())
    }

    /// Keeps the current view; only a reset or sample switch refits.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport_width = width.max(1);
        self.viewport_height = height.max(1);
    }

    pub fn zoom_at(&mut self, factor: f32, anchor_x: f32, anchor_y: f32) -> Result<(), SessionError> {
        self.view.zoom_about_point(factor, anchor_x, anchor_y)?;
        Ok(())
    }

    pub fn clear_mask(&mut self) -> Result<(), SessionError> {
        let (width, height) = self.image.size();
        self.label_layer.clear(width, height)?;
        Ok(())
    }

    /// Routes a pointer event to the pan gesture and then to the stroke gesture.
    pub fn handle_pointer(&mut self, brush: &BrushState, input: PointerInput) -> Option<PixelRect> {
        self.cursor = Some((input.screen_x, input.screen_y));
        let (pan, delta) = advance_pan(self.pan, input);
        self.pan = pan;
        if let Some(delta) = delta {
            if let Err(error) = self.view.pan_by(delta.delta_x, delta.delta_y) {
                log::warn!("ignoring pan: {error}");
            }
        }
        self.label_layer.handle_pointer(&self.view, brush, input)
    }

    pub fn pointer_left(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use driver::PointerButton;
    use model::Rgb;

    use super::*;

    #[test]
    fn secondary_drag_pans_without_painting() {
        let mut bench = Workbench::new(200, 100).expect("create workbench");
        bench.clear_mask().expect("clear mask");
        let brush = BrushState::new(Rgb::RED, 3);

        bench.handle_pointer(&brush, PointerInput::down(PointerButton::Secondary, 10.0, 10.0));
        assert!(bench.is_panning());
        bench.handle_pointer(&brush, PointerInput::moved(25.0, 4.0));
        bench.handle_pointer(&brush, PointerInput::up(PointerButton::Secondary, 25.0, 4.0));

        assert!(!bench.is_panning());
        assert_eq!(bench.view().offset_x(), 15.0);
        assert_eq!(bench.view().offset_y(), -6.0);
        assert!(bench.label_layer().mask().is_fully_transparent());
        assert_eq!(bench.cursor(), Some((25.0, 4.0)));

        bench.pointer_left();
        assert_eq!(bench.cursor(), None);
    }

    #[test]
    fn resize_keeps_view_until_refit() {
        let mut bench = Workbench::new(100, 100).expect("create workbench");
        bench.zoom_at(2.0, 0.0, 0.0).expect("zoom");
        bench.set_viewport_size(0, 50);
        assert_eq!(bench.viewport_size(), (1, 50));
        assert_eq!(bench.view().zoom(), 2.0);

        bench.fit_view().expect("fit");
        assert_eq!(bench.view().zoom(), 1.0);
    }
}
