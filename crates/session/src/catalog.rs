use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::SessionError;

pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";
pub const MASK_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    stem: String,
    image_path: PathBuf,
    label_path: PathBuf,
}

impl Sample {
    pub fn new(stem: impl Into<String>, image_path: PathBuf, label_path: PathBuf) -> Self {
        Self {
            stem: stem.into(),
            image_path,
            label_path,
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn label_path(&self) -> &Path {
        &self.label_path
    }
}

/// Samples under `<root>/images`, paired by stem with masks in `<root>/labels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCatalog {
    samples: Vec<Sample>,
}

impl SampleCatalog {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Lists every file directly inside `images/`, ordered by file name.
    ///
    /// Creates `labels/` when it does not exist yet. Hidden files are skipped,
    /// as are later files whose stem was already taken.
    pub fn scan(root: &Path) -> Result<Self, SessionError> {
        let images_dir = root.join(IMAGES_DIR);
        let labels_dir = root.join(LABELS_DIR);
        fs::create_dir_all(&labels_dir).map_err(|error| SessionError::Catalog {
            path: labels_dir.clone(),
            reason: error.to_string(),
        })?;

        let mut samples = Vec::new();
        let mut seen_stems = HashSet::new();
        let entries = WalkDir::new(&images_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in entries {
            let entry = entry.map_err(|error| SessionError::Catalog {
                path: images_dir.clone(),
                reason: error.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(stem) = entry.path().file_stem().and_then(|stem| stem.to_str()) else {
                log::warn!("skipping non-utf8 file name {}", entry.path().display());
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            if !seen_stems.insert(stem.to_owned()) {
                log::warn!(
                    "skipping {}: stem {stem} already listed",
                    entry.path().display()
                );
                continue;
            }
            let label_path = labels_dir.join(format!("{stem}.{MASK_EXTENSION}"));
            samples.push(Sample::new(stem, entry.path().to_path_buf(), label_path));
        }

        log::info!("found {} samples in {}", samples.len(), images_dir.display());
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Sample, SessionError> {
        self.samples.get(index).ok_or(SessionError::IndexOutOfRange {
            index,
            len: self.samples.len(),
        })
    }
}
