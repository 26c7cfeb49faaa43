mod catalog;
mod config;
mod controller;
mod error;
mod navigation;
#[cfg(test)]
mod test_support;
mod workbench;

pub use catalog::{IMAGES_DIR, LABELS_DIR, MASK_EXTENSION, Sample, SampleCatalog};
pub use config::{AnnotatorConfig, ConfigError};
pub use controller::{AnnotatorController, CommandOutcome};
pub use error::SessionError;
pub use navigation::SampleSession;
pub use workbench::Workbench;
