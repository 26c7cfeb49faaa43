use std::fs;
use std::path::{Path, PathBuf};

use crate::{IMAGES_DIR, LABELS_DIR};

/// Scratch sample root under the system temp dir, removed on drop.
pub struct FixtureRoot {
    path: PathBuf,
}

impl FixtureRoot {
    pub fn new(name: &str) -> Self {
        let root = Self::empty(name);
        fs::create_dir_all(root.images())
            .unwrap_or_else(|error| panic!("create images dir for {name}: {error}"));
        root
    }

    pub fn empty(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("session_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path)
            .unwrap_or_else(|error| panic!("create fixture root {}: {error}", path.display()));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn images(&self) -> PathBuf {
        self.path.join(IMAGES_DIR)
    }

    pub fn labels(&self) -> PathBuf {
        self.path.join(LABELS_DIR)
    }
}

impl Drop for FixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub fn write_image(path: &Path, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([90, 90, 90, 255]))
        .save(path)
        .unwrap_or_else(|error| panic!("write fixture image {}: {error}", path.display()));
}
