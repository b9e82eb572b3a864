//! Test utilities and shared fixtures.
//!
//! This module provides common helpers for unit tests, reducing duplication
//! across the codebase.

#[cfg(any(test, feature = "testing"))]
use crate::challenge::CatalogItem;
#[cfg(any(test, feature = "testing"))]
use crate::render::MemoryImages;
#[cfg(any(test, feature = "testing"))]
use image::{Rgba, RgbaImage};
#[cfg(any(test, feature = "testing"))]
use std::path::PathBuf;

/// Path of the bundled test font.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn fixture_font() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/DejaVuSans.ttf")
}

/// Number of pixels that differ from `background`.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn inked_pixels(img: &RgbaImage, background: Rgba<u8>) -> usize {
    img.pixels().filter(|p| **p != background).count()
}

/// Creates a catalog of `concepts` items, each with `pictures` filenames.
///
/// Every item has its own path (`concept{i}`), so keys never collide.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn sample_catalog(concepts: usize, pictures: usize) -> Vec<CatalogItem> {
    (0..concepts)
        .map(|i| CatalogItem {
            title: format!("concept {i}"),
            path: format!("concept{i}"),
            filenames: (0..pictures).map(|f| f.to_string()).collect(),
        })
        .collect()
}

/// Registers a solid `width` x `height` picture for every key in `catalog`.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn sample_images(catalog: &[CatalogItem], width: u32, height: u32) -> MemoryImages {
    let mut images = MemoryImages::new();
    for (i, item) in catalog.iter().enumerate() {
        let shade = u8::try_from(i * 30 % 256).unwrap_or(0);
        for slot in 0..item.filenames.len() {
            if let Some(key) = item.key(slot) {
                images.insert(key, RgbaImage::from_pixel(width, height, Rgba([shade, 90, 160, 255])));
            }
        }
    }
    images
}
