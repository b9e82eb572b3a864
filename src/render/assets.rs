//! Image sources for grid cells.
//!
//! Cell keys have the form `<path>/<filename>`. A source turns a key into
//! decoded pixels; a missing or undecodable image is an error, never a
//! blank cell.

use crate::config::{CaptchaError, Result};
use crate::render::canvas::load_image;
use image::RgbaImage;
use std::collections::HashMap;
use std::path::PathBuf;

/// Read-only lookup of cell images by key.
pub trait ImageSource {
    /// Loads the image for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Image`] if the image is missing or cannot be
    /// decoded.
    fn load(&self, key: &str) -> Result<RgbaImage>;
}

/// Loads `<root>/<key>.png` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryImages {
    root: PathBuf,
}

impl DirectoryImages {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.png"))
    }
}

impl ImageSource for DirectoryImages {
    fn load(&self, key: &str) -> Result<RgbaImage> {
        load_image(&self.path_for(key))
    }
}

/// In-memory images, for embedded assets.
#[derive(Debug, Clone, Default)]
pub struct MemoryImages {
    images: HashMap<String, RgbaImage>,
}

impl MemoryImages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, img: RgbaImage) {
        self.images.insert(key.into(), img);
    }
}

impl ImageSource for MemoryImages {
    fn load(&self, key: &str) -> Result<RgbaImage> {
        self.images.get(key).cloned().ok_or_else(|| CaptchaError::Image {
            path: key.to_string(),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no image registered for {key}"),
            )),
        })
    }
}
