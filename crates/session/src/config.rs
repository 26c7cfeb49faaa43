use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use model::{BrushState, MAX_BRUSH_RADIUS, Rgb};
use serde::{Deserialize, Serialize};
use view::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotatorConfig {
    /// Colors bound to the digit keys, in key order.
    pub palette: Vec<[u8; 3]>,
    pub default_brush_radius: u32,
    pub brush_radius_step: u32,
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
    pub mask_opacity: f32,
    pub background: [u8; 3],
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            palette: vec![[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]],
            default_brush_radius: 25,
            brush_radius_step: 5,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            mask_opacity: 0.5,
            background: [50, 50, 50],
            window_width: 1000,
            window_height: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Read { path: PathBuf, reason: String },
    Parse { path: PathBuf, reason: String },
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, reason } => {
                write!(f, "cannot read config {}: {reason}", path.display())
            }
            ConfigError::Parse { path, reason } => {
                write!(f, "cannot parse config {}: {reason}", path.display())
            }
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AnnotatorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        Self::from_json(&text).map_err(|error| match error {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|error| ConfigError::Parse {
            path: PathBuf::new(),
            reason: error.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must not be empty"));
        }
        if self.default_brush_radius == 0 || self.default_brush_radius > MAX_BRUSH_RADIUS {
            return Err(ConfigError::Invalid("default_brush_radius must be in 1..=500"));
        }
        if self.brush_radius_step == 0 {
            return Err(ConfigError::Invalid("brush_radius_step must be positive"));
        }
        if !(self.zoom_in_factor.is_finite() && self.zoom_in_factor > 1.0) {
            return Err(ConfigError::Invalid("zoom_in_factor must be greater than 1"));
        }
        if !(self.zoom_out_factor.is_finite()
            && self.zoom_out_factor > 0.0
            && self.zoom_out_factor < 1.0)
        {
            return Err(ConfigError::Invalid("zoom_out_factor must be in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.mask_opacity) {
            return Err(ConfigError::Invalid("mask_opacity must be in [0, 1]"));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid("window size must be positive"));
        }
        Ok(())
    }

    pub fn palette_color(&self, index: usize) -> Option<Rgb> {
        self.palette
            .get(index)
            .map(|&[r, g, b]| Rgb::new(r, g, b))
    }

    pub fn background_color(&self) -> Rgb {
        let [r, g, b] = self.background;
        Rgb::new(r, g, b)
    }

    /// Brush in paint mode with the first palette color.
    pub fn initial_brush(&self) -> BrushState {
        let color = self.palette_color(0).unwrap_or(Rgb::BLACK);
        BrushState::new(color, self.default_brush_radius)
    }
}
