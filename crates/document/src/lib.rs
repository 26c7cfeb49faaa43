mod label_layer;
mod raster_io;

pub use label_layer::LabelLayer;
pub use raster_io::{PngFileIo, RasterIo, RasterIoError};
