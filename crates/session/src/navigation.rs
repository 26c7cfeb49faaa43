use document::RasterIo;

use crate::{Sample, SampleCatalog, SessionError, Workbench};

/// Ordered samples plus the index of the one attached to the workbench.
pub struct SampleSession<Io> {
    io: Io,
    catalog: SampleCatalog,
    current_index: Option<usize>,
}

impl<Io: RasterIo> SampleSession<Io> {
    pub fn new(catalog: SampleCatalog, io: Io) -> Self {
        Self {
            io,
            catalog,
            current_index: None,
        }
    }

    pub fn catalog(&self) -> &SampleCatalog {
        &self.catalog
    }

    pub fn io(&self) -> &Io {
        &self.io
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_sample(&self) -> Option<&Sample> {
        self.current_index
            .and_then(|index| self.catalog.samples().get(index))
    }

    pub fn load_first(&mut self, bench: &mut Workbench) -> Result<usize, SessionError> {
        self.load_index(0, bench)?;
        Ok(0)
    }

    /// Saves the current mask, then moves `step` samples, clamping at either end.
    ///
    /// The save happens even when the mask is unchanged or the index is already
    /// at the boundary, and a failed save aborts before anything else changes.
    /// Stepping past an end reloads the boundary sample instead of wrapping.
    pub fn advance(&mut self, step: i32, bench: &mut Workbench) -> Result<usize, SessionError> {
        let current = self.loaded_index()?;
        if step == 0 {
            return Ok(current);
        }
        self.save_current(bench)?;

        let last = self.catalog.len() - 1;
        let target = current as i64 + i64::from(step);
        let next = if (0..=last as i64).contains(&target) {
            target as usize
        } else if step < 0 {
            0
        } else {
            last
        };
        self.load_index(next, bench)?;
        Ok(next)
    }

    pub fn save_current(&mut self, bench: &mut Workbench) -> Result<(), SessionError> {
        let index = self.loaded_index()?;
        let sample = self.catalog.get(index)?;
        bench
            .label_layer_mut()
            .export(&self.io, sample.label_path())?;
        log::info!("saved mask {}", sample.label_path().display());
        Ok(())
    }

    fn loaded_index(&self) -> Result<usize, SessionError> {
        if self.catalog.is_empty() {
            return Err(SessionError::IndexOutOfRange { index: 0, len: 0 });
        }
        self.current_index.ok_or(SessionError::NotLoaded)
    }

    fn load_index(&mut self, index: usize, bench: &mut Workbench) -> Result<(), SessionError> {
        let sample = self.catalog.get(index)?;
        let mask_found = bench.load_sample(&self.io, sample)?;
        self.current_index = Some(index);
        log::info!(
            "loaded sample {} ({}/{}){}",
            sample.stem(),
            index + 1,
            self.catalog.len(),
            if mask_found { "" } else { " with blank mask" }
        );
        Ok(())
    }
}
