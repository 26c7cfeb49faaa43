use model::{BrushState, RasterBuffer, Rgb, Rgba8, source_over};
use view::ViewTransform;

/// Half-width of the cursor ring in device pixels.
const CURSOR_RING_HALF_WIDTH: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub mask_opacity: f32,
    pub background: Rgb,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            mask_opacity: 0.5,
            background: Rgb::new(50, 50, 50),
        }
    }
}

/// Brush outline in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorOverlay {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    pub color: Rgb,
}

impl CursorOverlay {
    pub fn from_brush(brush: &BrushState, view: &ViewTransform, screen_x: f32, screen_y: f32) -> Self {
        let decoration = brush.cursor_decoration();
        Self {
            center_x: screen_x,
            center_y: screen_y,
            radius: (decoration.radius as f32 * view.zoom()).max(1.0),
            color: decoration.outline,
        }
    }
}

/// CPU-side RGBA8 frame the size of the window surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportFrame {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl ViewportFrame {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels
            .resize(width as usize * height as usize, Rgba8::TRANSPARENT);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Draws image, then mask at reduced opacity, then the cursor ring.
///
/// Sampling is nearest-neighbour at device pixel centers, so every mask pixel
/// keeps hard edges at any zoom.
pub fn compose_viewport_frame(
    frame: &mut ViewportFrame,
    image: &RasterBuffer,
    mask: &RasterBuffer,
    view: &ViewTransform,
    style: FrameStyle,
    cursor: Option<CursorOverlay>,
) {
    let background = style.background.opaque();
    let columns: Vec<Option<u32>> = (0..frame.width)
        .map(|x| canvas_index(x, view.offset_x(), view.zoom(), image.width()))
        .collect();

    for y in 0..frame.height {
        let row_start = y as usize * frame.width as usize;
        let row = &mut frame.pixels[row_start..row_start + frame.width as usize];
        let Some(canvas_y) = canvas_index(y, view.offset_y(), view.zoom(), image.height()) else {
            row.fill(background);
            continue;
        };
        for (pixel, column) in row.iter_mut().zip(&columns) {
            let Some(canvas_x) = *column else {
                *pixel = background;
                continue;
            };
            let base = image
                .pixel(canvas_x, canvas_y)
                .map_or(background, |source| source_over(background, source));
            *pixel = match mask.pixel(canvas_x, canvas_y) {
                Some(label) if label.a != 0 => {
                    source_over(base, label.with_scaled_alpha(style.mask_opacity))
                }
                _ => base,
            };
        }
    }

    if let Some(cursor) = cursor {
        draw_cursor_ring(frame, cursor);
    }
}

fn canvas_index(device: u32, offset: f32, zoom: f32, limit: u32) -> Option<u32> {
    let canvas = (device as f32 + 0.5 - offset) / zoom;
    if !canvas.is_finite() || canvas < 0.0 {
        return None;
    }
    let index = canvas.floor();
    if index >= limit as f32 {
        return None;
    }
    Some(index as u32)
}

fn draw_cursor_ring(frame: &mut ViewportFrame, cursor: CursorOverlay) {
    if !cursor.center_x.is_finite() || !cursor.center_y.is_finite() {
        return;
    }
    let reach = cursor.radius + CURSOR_RING_HALF_WIDTH;
    let x_start = (cursor.center_x - reach).floor().max(0.0) as u32;
    let x_end = ((cursor.center_x + reach).ceil().max(0.0) as u32).min(frame.width);
    let y_start = (cursor.center_y - reach).floor().max(0.0) as u32;
    let y_end = ((cursor.center_y + reach).ceil().max(0.0) as u32).min(frame.height);
    let color = cursor.color.opaque();

    for y in y_start..y_end {
        for x in x_start..x_end {
            let delta_x = x as f32 + 0.5 - cursor.center_x;
            let delta_y = y as f32 + 0.5 - cursor.center_y;
            let distance = (delta_x * delta_x + delta_y * delta_y).sqrt();
            if (distance - cursor.radius).abs() <= CURSOR_RING_HALF_WIDTH {
                frame.pixels[y as usize * frame.width as usize + x as usize] = color;
            }
        }
    }
}
