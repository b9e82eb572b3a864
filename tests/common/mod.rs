use gcaptcha::{CatalogItem, ChallengeKind, Config, RenderOptions};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory removed on drop.
pub struct TempAssets {
    pub root: PathBuf,
}

impl TempAssets {
    pub fn new(name: &str) -> Self {
        let id = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "gcaptcha-{name}-{}-{id}",
            std::process::id()
        ));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn write_png(&self, relative: &str, img: &RgbaImage) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        img.save(&path).unwrap();
        path
    }

    /// Writes one solid picture per catalog key and the catalog JSON.
    pub fn write_catalog(&self, catalog: &[CatalogItem], width: u32, height: u32) -> PathBuf {
        for (i, item) in catalog.iter().enumerate() {
            let shade = u8::try_from(40 + i * 20).unwrap();
            for filename in &item.filenames {
                self.write_png(
                    &format!("{}/{filename}.png", item.path),
                    &RgbaImage::from_pixel(width, height, Rgba([shade, shade, 200, 255])),
                );
            }
        }

        let path = self.root.join("catalog.json");
        std::fs::write(&path, serde_json::to_string(catalog).unwrap()).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for TempAssets {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn catalog(concepts: usize, pictures: usize) -> Vec<CatalogItem> {
    (0..concepts)
        .map(|i| CatalogItem {
            title: format!("item{i}"),
            path: format!("set{i}"),
            filenames: (1..=pictures).map(|f| f.to_string()).collect(),
        })
        .collect()
}

pub fn fixture_font() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/DejaVuSans.ttf")
}

/// Number of pixels that differ from `background`.
pub fn inked_pixels(img: &RgbaImage, background: Rgba<u8>) -> usize {
    img.pixels().filter(|p| **p != background).count()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

pub fn grid_options() -> RenderOptions {
    RenderOptions {
        header_height: 12,
        cell_width: 10,
        cell_height: 10,
        gap: 2,
        padding: 3,
        font_path: Some(fixture_font()),
        font_size: 8.0,
        ..RenderOptions::default()
    }
}

pub fn create_test_config(kind: ChallengeKind, assets: &TempAssets) -> Config {
    Config {
        kind,
        seed: Some(42),
        output_path: assets.path().join("out.png"),
        options: grid_options(),
        grid_catalog: assets.path().join("catalog.json"),
        grid_image_dir: assets.path().to_path_buf(),
        grid_capacity: 9,
        grid_distractors: 3,
        grid_prompt: "Find: ".to_string(),
        text_title: String::new(),
        text_chars: strings(&["A", "B", "#", "C"]),
        music_title: String::new(),
        music_codes: strings(&["C", "#D", "G"]),
        music_clef: None,
        log_format: "pretty".to_string(),
    }
}
