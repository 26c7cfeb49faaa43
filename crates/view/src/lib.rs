pub const ZOOM_IN_FACTOR: f32 = 1.25;
pub const ZOOM_OUT_FACTOR: f32 = 0.8;

/// Uniform scale plus translation: `screen = canvas * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    offset_x: f32,
    offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTransformError {
    InvalidZoom,
    InvalidViewport,
    InvalidContent,
    NonFiniteValue,
}

impl std::fmt::Display for ViewTransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidZoom => write!(f, "zoom must be finite and positive"),
            Self::InvalidViewport => write!(f, "viewport must have a positive size"),
            Self::InvalidContent => write!(f, "content must have a positive size"),
            Self::NonFiniteValue => write!(f, "view transform produced a non-finite value"),
        }
    }
}

impl std::error::Error for ViewTransformError {}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), ViewTransformError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(ViewTransformError::InvalidZoom);
        }
        self.zoom = zoom;
        Ok(())
    }

    /// Scales by `zoom_factor` while the canvas point under `(point_x, point_y)` stays put.
    pub fn zoom_about_point(
        &mut self,
        zoom_factor: f32,
        point_x: f32,
        point_y: f32,
    ) -> Result<(), ViewTransformError> {
        if !zoom_factor.is_finite() || zoom_factor <= 0.0 {
            return Err(ViewTransformError::InvalidZoom);
        }
        if !point_x.is_finite() || !point_y.is_finite() {
            return Err(ViewTransformError::NonFiniteValue);
        }

        let next_zoom = checked_mul(self.zoom, zoom_factor)?;
        if next_zoom <= 0.0 {
            return Err(ViewTransformError::InvalidZoom);
        }

        let keep_anchor_scale = checked_add(1.0, -zoom_factor)?;
        let scaled_offset_x = checked_mul(self.offset_x, zoom_factor)?;
        let scaled_offset_y = checked_mul(self.offset_y, zoom_factor)?;
        let anchor_x_contribution = checked_mul(point_x, keep_anchor_scale)?;
        let anchor_y_contribution = checked_mul(point_y, keep_anchor_scale)?;

        self.offset_x = checked_add(scaled_offset_x, anchor_x_contribution)?;
        self.offset_y = checked_add(scaled_offset_y, anchor_y_contribution)?;
        self.zoom = next_zoom;
        Ok(())
    }

    pub fn pan_by(&mut self, delta_x: f32, delta_y: f32) -> Result<(), ViewTransformError> {
        let next_x = checked_add(self.offset_x, delta_x)?;
        let next_y = checked_add(self.offset_y, delta_y)?;
        self.offset_x = next_x;
        self.offset_y = next_y;
        Ok(())
    }

    /// Largest zoom that shows the whole content with its aspect ratio kept, centered.
    pub fn fit_to_content(
        &mut self,
        content_width: f32,
        content_height: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Result<(), ViewTransformError> {
        if !viewport_width.is_finite()
            || !viewport_height.is_finite()
            || viewport_width <= 0.0
            || viewport_height <= 0.0
        {
            return Err(ViewTransformError::InvalidViewport);
        }
        if !content_width.is_finite()
            || !content_height.is_finite()
            || content_width <= 0.0
            || content_height <= 0.0
        {
            return Err(ViewTransformError::InvalidContent);
        }

        let zoom = (viewport_width / content_width).min(viewport_height / content_height);
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(ViewTransformError::InvalidZoom);
        }
        let offset_x = (viewport_width - content_width * zoom) * 0.5;
        let offset_y = (viewport_height - content_height * zoom) * 0.5;
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(ViewTransformError::NonFiniteValue);
        }

        self.zoom = zoom;
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        Ok(())
    }

    pub fn canvas_to_screen_point(&self, canvas_x: f32, canvas_y: f32) -> (f32, f32) {
        (
            canvas_x * self.zoom + self.offset_x,
            canvas_y * self.zoom + self.offset_y,
        )
    }

    pub fn screen_to_canvas_point(
        &self,
        screen_x: f32,
        screen_y: f32,
    ) -> Result<(f32, f32), ViewTransformError> {
        if !screen_x.is_finite() || !screen_y.is_finite() {
            return Err(ViewTransformError::NonFiniteValue);
        }
        if self.zoom.abs() <= f32::EPSILON {
            return Err(ViewTransformError::InvalidZoom);
        }

        let canvas_x = (screen_x - self.offset_x) / self.zoom;
        let canvas_y = (screen_y - self.offset_y) / self.zoom;
        if !canvas_x.is_finite() || !canvas_y.is_finite() {
            return Err(ViewTransformError::NonFiniteValue);
        }
        Ok((canvas_x, canvas_y))
    }
}

fn checked_add(current: f32, delta: f32) -> Result<f32, ViewTransformError> {
    if !delta.is_finite() {
        return Err(ViewTransformError::NonFiniteValue);
    }
    let next = current + delta;
    if !next.is_finite() {
        return Err(ViewTransformError::NonFiniteValue);
    }
    Ok(next)
}

fn checked_mul(left: f32, right: f32) -> Result<f32, ViewTransformError> {
    if !left.is_finite() || !right.is_finite() {
        return Err(ViewTransformError::NonFiniteValue);
    }
    let next = left * right;
    if !next.is_finite() {
        return Err(ViewTransformError::NonFiniteValue);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zoom_about_point_keeps_anchor_screen_position() {
        let mut transform = ViewTransform::default();
        transform.pan_by(20.0, -10.0).expect("pan");

        transform
            .zoom_about_point(2.0, 100.0, 50.0)
            .expect("zoom about point");

        assert!((transform.zoom() - 2.0).abs() < 1e-6);
        assert!((transform.offset_x() + 60.0).abs() < 1e-6);
        assert!((transform.offset_y() + 70.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_in_and_out_keep_canvas_point_under_cursor() {
        let mut transform = ViewTransform::default();
        transform
            .fit_to_content(640.0, 480.0, 1000.0, 700.0)
            .expect("fit");
        let anchors = [(0.0, 0.0), (333.0, 123.5), (999.0, 699.0), (-40.0, 820.0)];

        for (anchor_x, anchor_y) in anchors {
            for factor in [ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR, ZOOM_IN_FACTOR] {
                let before = transform
                    .screen_to_canvas_point(anchor_x, anchor_y)
                    .expect("to canvas before zoom");
                transform
                    .zoom_about_point(factor, anchor_x, anchor_y)
                    .expect("zoom");
                let (screen_x, screen_y) = transform.canvas_to_screen_point(before.0, before.1);
                assert_close(screen_x, anchor_x);
                assert_close(screen_y, anchor_y);
            }
        }
    }

    #[test]
    fn zoom_about_point_rejects_invalid_inputs() {
        let mut transform = ViewTransform::default();
        assert_eq!(
            transform.zoom_about_point(0.0, 10.0, 20.0),
            Err(ViewTransformError::InvalidZoom)
        );
        assert_eq!(
            transform.zoom_about_point(1.2, f32::NAN, 20.0),
            Err(ViewTransformError::NonFiniteValue)
        );
        assert_eq!(transform, ViewTransform::default());
    }

    #[test]
    fn pan_moves_content_with_the_pointer() {
        let mut transform = ViewTransform::default();
        transform.set_zoom(2.0).expect("set zoom");
        let before = transform.screen_to_canvas_point(50.0, 50.0).expect("to canvas");

        transform.pan_by(10.0, -4.0).expect("pan");

        let (screen_x, screen_y) = transform.canvas_to_screen_point(before.0, before.1);
        assert_close(screen_x, 60.0);
        assert_close(screen_y, 46.0);
        assert_eq!(
            transform.pan_by(f32::INFINITY, 0.0),
            Err(ViewTransformError::NonFiniteValue)
        );
    }

    #[test]
    fn fit_to_content_centers_with_aspect_ratio() {
        let mut transform = ViewTransform::default();
        transform
            .fit_to_content(200.0, 100.0, 1000.0, 1000.0)
            .expect("fit wide content");
        assert_close(transform.zoom(), 5.0);
        assert_close(transform.offset_x(), 0.0);
        assert_close(transform.offset_y(), 250.0);

        let (left, top) = transform.canvas_to_screen_point(0.0, 0.0);
        let (right, bottom) = transform.canvas_to_screen_point(200.0, 100.0);
        assert_close(left, 0.0);
        assert_close(right, 1000.0);
        assert_close(top + bottom, 1000.0);

        transform
            .fit_to_content(300.0, 600.0, 800.0, 600.0)
            .expect("fit tall content");
        assert_close(transform.zoom(), 1.0);
        assert_close(transform.offset_x(), 250.0);
        assert_close(transform.offset_y(), 0.0);
    }

    #[test]
    fn fit_to_content_rejects_empty_sizes() {
        let mut transform = ViewTransform::default();
        assert_eq!(
            transform.fit_to_content(10.0, 10.0, 0.0, 10.0),
            Err(ViewTransformError::InvalidViewport)
        );
        assert_eq!(
            transform.fit_to_content(0.0, 10.0, 10.0, 10.0),
            Err(ViewTransformError::InvalidContent)
        );
    }

    #[test]
    fn screen_and_canvas_mapping_are_inverse() {
        let mut transform = ViewTransform::default();
        transform.pan_by(-35.0, 12.5).expect("pan");
        transform.zoom_about_point(1.7, 80.0, 20.0).expect("zoom");

        let (canvas_x, canvas_y) = transform
            .screen_to_canvas_point(412.0, 97.0)
            .expect("to canvas");
        let (screen_x, screen_y) = transform.canvas_to_screen_point(canvas_x, canvas_y);
        assert_close(screen_x, 412.0);
        assert_close(screen_y, 97.0);
    }
}
