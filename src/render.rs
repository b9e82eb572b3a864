//! Raster output shared by every challenge.
//!
//! Provides the canvas with background compositing and PNG encoding, font
//! loading and glyph drawing, and the image sources grid cells are read from.

pub mod assets;
pub mod canvas;
pub mod font;

pub use assets::{DirectoryImages, ImageSource, MemoryImages};
pub use canvas::{Canvas, load_image, to_data_uri};
pub use font::Glyphs;
