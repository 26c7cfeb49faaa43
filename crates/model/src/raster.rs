use std::fmt;

use image::ImageEncoder;
use image::codecs::png::PngEncoder;

use crate::{BrushMode, MIN_BRUSH_RADIUS, PixelRect, Rgb, Rgba8, ScenePoint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    InvalidGeometry { width: u32, height: u32 },
    BufferSizeMismatch { expected: usize, actual: usize },
    Decode(String),
    Encode(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry { width, height } => {
                write!(f, "invalid raster geometry {width}x{height}")
            }
            Self::BufferSizeMismatch { expected, actual } => {
                write!(f, "pixel buffer holds {actual} bytes, expected {expected}")
            }
            Self::Decode(reason) => write!(f, "decode failed: {reason}"),
            Self::Encode(reason) => write!(f, "encode failed: {reason}"),
        }
    }
}

impl std::error::Error for RasterError {}

/// Row-major RGBA8 surface with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    // pixels.len() == width * height
    pixels: Vec<Rgba8>,
}

impl RasterBuffer {
    pub fn new_transparent(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixel_count = checked_pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; pixel_count],
        })
    }

    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RasterError> {
        let pixel_count = checked_pixel_count(width, height)?;
        let expected = pixel_count
            .checked_mul(4)
            .ok_or(RasterError::InvalidGeometry { width, height })?;
        if bytes.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: bytemuck::cast_slice::<u8, Rgba8>(bytes).to_vec(),
        })
    }

    /// Decodes any format the image codecs understand into RGBA8.
    pub fn load_from(bytes: &[u8]) -> Result<Self, RasterError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|error| RasterError::Decode(error.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Self::from_rgba_bytes(width, height, decoded.as_raw())
    }

    /// Encodes the buffer as PNG, which round-trips every pixel exactly.
    pub fn encode_to(&self) -> Result<Vec<u8>, RasterError> {
        let mut encoded = Vec::new();
        PngEncoder::new(&mut encoded)
            .write_image(
                self.as_bytes(),
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|error| RasterError::Encode(error.to_string()))?;
        Ok(encoded)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.pixel_index(x, y)])
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.iter().all(|pixel| pixel.a == 0)
    }

    pub fn clear(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        let pixel_count = checked_pixel_count(width, height)?;
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(pixel_count, Rgba8::TRANSPARENT);
        Ok(())
    }

    /// Strokes `from -> to` with a round-capped pen of half-width `radius`.
    ///
    /// A pixel is touched when its center lies within `radius` of the segment,
    /// so a zero-length segment paints a disk. Paint mode composites the opaque
    /// pen color source-over; erase mode writes transparent pixels.
    /// Returns the touched rectangle, or `None` when the footprint misses the buffer.
    pub fn composite_segment(
        &mut self,
        from: ScenePoint,
        to: ScenePoint,
        radius: u32,
        color: Rgb,
        mode: BrushMode,
    ) -> Option<PixelRect> {
        if !from.is_finite() || !to.is_finite() {
            return None;
        }
        let radius = radius.max(MIN_BRUSH_RADIUS) as f32;
        let radius_squared = radius * radius;

        let x_range = clamp_span(from.x.min(to.x) - radius, from.x.max(to.x) + radius, self.width)?;
        let y_range = clamp_span(from.y.min(to.y) - radius, from.y.max(to.y) + radius, self.height)?;

        let pen = color.opaque();
        let mut touched: Option<PixelRect> = None;
        for y in y_range.0..y_range.1 {
            let mut row_span: Option<(u32, u32)> = None;
            for x in x_range.0..x_range.1 {
                let center = ScenePoint::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_squared_to_segment(center, from, to) > radius_squared {
                    continue;
                }
                let index = self.pixel_index(x, y);
                self.pixels[index] = match mode {
                    BrushMode::Paint => source_over(self.pixels[index], pen),
                    BrushMode::Erase => Rgba8::TRANSPARENT,
                };
                row_span = Some(match row_span {
                    Some((first, _)) => (first, x),
                    None => (x, x),
                });
            }
            if let Some((first, last)) = row_span {
                let row = PixelRect {
                    x: first,
                    y,
                    width: last - first + 1,
                    height: 1,
                };
                touched = Some(match touched {
                    Some(rect) => rect.union(row),
                    None => row,
                });
            }
        }
        touched
    }

    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Straight-alpha source-over: `source` drawn on top of `destination`.
pub fn source_over(destination: Rgba8, source: Rgba8) -> Rgba8 {
    let source_alpha = u32::from(source.a);
    if source_alpha == 255 {
        return source;
    }
    if source_alpha == 0 {
        return destination;
    }
    let destination_weight = div_255(u32::from(destination.a) * (255 - source_alpha));
    let out_alpha = source_alpha + destination_weight;
    let channel = |source_channel: u8, destination_channel: u8| -> u8 {
        let weighted = u32::from(source_channel) * source_alpha
            + u32::from(destination_channel) * destination_weight;
        ((weighted + out_alpha / 2) / out_alpha) as u8
    };
    Rgba8 {
        r: channel(source.r, destination.r),
        g: channel(source.g, destination.g),
        b: channel(source.b, destination.b),
        a: out_alpha as u8,
    }
}

fn div_255(value: u32) -> u32 {
    (value + 1 + (value >> 8)) >> 8
}

fn checked_pixel_count(width: u32, height: u32) -> Result<usize, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidGeometry { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(RasterError::InvalidGeometry { width, height })
}

// Pixel index range [start, end) whose centers may fall inside [min, max].
fn clamp_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    let start = min.floor().max(0.0);
    let end = max.ceil().min(limit as f32);
    if start >= end {
        return None;
    }
    Some((start as u32, end as u32))
}

fn distance_squared_to_segment(point: ScenePoint, from: ScenePoint, to: ScenePoint) -> f32 {
    let segment_x = to.x - from.x;
    let segment_y = to.y - from.y;
    let length_squared = segment_x * segment_x + segment_y * segment_y;
    let along = if length_squared <= f32::EPSILON {
        0.0
    } else {
        (((point.x - from.x) * segment_x + (point.y - from.y) * segment_y) / length_squared)
            .clamp(0.0, 1.0)
    };
    let nearest_x = from.x + along * segment_x;
    let nearest_y = from.y + along * segment_y;
    let delta_x = point.x - nearest_x;
    let delta_y = point.y - nearest_y;
    delta_x * delta_x + delta_y * delta_y
}
