use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use model::RasterBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterIoError {
    Decode {
        path: PathBuf,
        reason: String,
    },
    Encode {
        path: PathBuf,
        reason: String,
    },
    InvalidGeometry {
        width: u32,
        height: u32,
    },
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl fmt::Display for RasterIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, reason } => {
                write!(f, "failed to decode {}: {reason}", path.display())
            }
            Self::Encode { path, reason } => {
                write!(f, "failed to write {}: {reason}", path.display())
            }
            Self::InvalidGeometry { width, height } => {
                write!(f, "invalid mask geometry {width}x{height}")
            }
            Self::DimensionMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "mask {} is {}x{}, image is {}x{}",
                path.display(),
                actual.0,
                actual.1,
                expected.0,
                expected.1
            ),
        }
    }
}

impl std::error::Error for RasterIoError {}

/// Persistence seam for pixel buffers.
pub trait RasterIo {
    fn exists(&self, path: &Path) -> bool;

    fn read_raster(&self, path: &Path) -> Result<RasterBuffer, RasterIoError>;

    /// Must leave any previous file at `path` intact when it fails.
    fn write_raster(&self, path: &Path, raster: &RasterBuffer) -> Result<(), RasterIoError>;
}

/// Reads any supported image format and writes PNG through a sibling temp file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngFileIo;

impl RasterIo for PngFileIo {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_raster(&self, path: &Path) -> Result<RasterBuffer, RasterIoError> {
        let bytes = fs::read(path).map_err(|error| RasterIoError::Decode {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        RasterBuffer::load_from(&bytes).map_err(|error| RasterIoError::Decode {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })
    }

    fn write_raster(&self, path: &Path, raster: &RasterBuffer) -> Result<(), RasterIoError> {
        let encoded = raster.encode_to().map_err(|error| RasterIoError::Encode {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        write_atomically(path, &encoded).map_err(|error| RasterIoError::Encode {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })
    }
}

fn temporary_sibling(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let mut temporary_name = std::ffi::OsString::from(".");
    temporary_name.push(file_name);
    temporary_name.push(".tmp");
    Ok(path.with_file_name(temporary_name))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let temporary_path = temporary_sibling(path)?;
    let result = write_and_sync(&temporary_path, bytes)
        .and_then(|()| fs::rename(&temporary_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temporary_path);
    }
    result
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{BrushMode, Rgb, ScenePoint};

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("raster_io_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir)
            .unwrap_or_else(|error| panic!("create test dir {}: {error}", dir.display()));
        dir
    }

    fn painted_raster(color: Rgb) -> RasterBuffer {
        let mut raster = RasterBuffer::new_transparent(12, 9).expect("create raster");
        let point = ScenePoint::new(6.0, 4.0);
        raster.composite_segment(point, point, 3, color, BrushMode::Paint);
        raster
    }

    #[test]
    fn write_then_read_reproduces_raster() {
        let dir = test_dir("round_trip");
        let path = dir.join("mask.png");
        let raster = painted_raster(Rgb::RED);

        PngFileIo.write_raster(&path, &raster).expect("write raster");
        assert!(PngFileIo.exists(&path));
        assert!(!temporary_sibling(&path).expect("temp path").exists());

        let loaded = PngFileIo.read_raster(&path).expect("read raster");
        assert_eq!(loaded, raster);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_write_keeps_previous_file() {
        let dir = test_dir("failed_write");
        let path = dir.join("mask.png");
        let original = painted_raster(Rgb::GREEN);
        PngFileIo.write_raster(&path, &original).expect("write original");

        let blocker = temporary_sibling(&path).expect("temp path");
        fs::create_dir_all(&blocker).expect("block temp path with a directory");

        let result = PngFileIo.write_raster(&path, &painted_raster(Rgb::BLUE));
        assert!(matches!(result, Err(RasterIoError::Encode { .. })));

        let survivor = PngFileIo.read_raster(&path).expect("previous file still decodes");
        assert_eq!(survivor, original);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_reports_missing_and_malformed_files() {
        let dir = test_dir("malformed");
        let missing = dir.join("missing.png");
        assert!(!PngFileIo.exists(&missing));
        assert!(matches!(
            PngFileIo.read_raster(&missing),
            Err(RasterIoError::Decode { .. })
        ));

        let malformed = dir.join("broken.png");
        fs::write(&malformed, b"not a png").expect("write malformed file");
        let error = PngFileIo.read_raster(&malformed).expect_err("malformed file");
        assert!(matches!(error, RasterIoError::Decode { ref path, .. } if *path == malformed));
        let _ = fs::remove_dir_all(&dir);
    }
}
