//! Frame sources

use std::path::PathBuf;

use crate::{Error, Result};

/// Produces one encoded frame per capture request
pub trait Camera: Send + Sync {
    /// Grab one frame as encoded image bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Camera`] if the device is unavailable and
    /// [`Error::Capture`] if the grab itself fails
    fn capture_frame(&self) -> Result<Vec<u8>>;
}

/// Frame source backed by a still image on disk
///
/// Stands in for a live camera driver on machines without one; point it at a
/// photo of the food item to identify.
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Camera for FileCamera {
    fn capture_frame(&self) -> Result<Vec<u8>> {
        if !self.path.exists() {
            return Err(Error::Camera(format!(
                "no frame source at {}",
                self.path.display()
            )));
        }

        std::fs::read(&self.path)
            .map_err(|e| Error::Capture(format!("failed to read frame: {e}")))
    }
}
