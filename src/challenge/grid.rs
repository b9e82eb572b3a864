//! Picture-grid challenge.
//!
//! One target concept and several distractor concepts are drawn from a
//! catalog. The target contributes three pictures, each distractor two, and
//! every picture is scattered into its own grid cell. The solver selects the
//! cells showing the target.

use crate::challenge::sequence::to_i32;
use crate::challenge::{Challenge, Solution};
use crate::config::{CaptchaError, RenderOptions, Result};
use crate::core::picker::{pick_distinct, pick_many};
use crate::render::canvas::f32_to_i32;
use crate::render::font::TITLE_ADVANCE;
use crate::render::{Canvas, Glyphs, ImageSource};
use image::{Rgba, imageops};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_PROMPT: &str = "Select all images of: ";
pub const DEFAULT_CAPACITY: usize = 9;
pub const DEFAULT_DISTRACTORS: usize = 3;
pub const TARGET_SLOTS: usize = 3;
pub const DISTRACTOR_SLOTS: usize = 2;
pub const GRID_COLUMNS: usize = 3;

const TITLE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TITLE_INSET: i32 = 2;
const TITLE_BASELINE_LIFT: i32 = 5;
const LABEL_SIZE_BOOST: f32 = 4.0;

/// One selectable concept: a label plus the pictures that depict it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Human label shown in the prompt.
    pub title: String,
    /// Storage prefix of this concept's pictures.
    pub path: String,
    /// Picture identifiers under `path`.
    pub filenames: Vec<String>,
}

impl CatalogItem {
    /// Fully-qualified key of the picture at `slot`.
    #[must_use]
    pub fn key(&self, slot: usize) -> Option<String> {
        self.filenames
            .get(slot)
            .map(|filename| format!("{}/{filename}", self.path))
    }
}

/// Reads a JSON array of catalog items.
///
/// # Errors
///
/// Returns [`CaptchaError::Catalog`] if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| CaptchaError::Catalog(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&data)
        .map_err(|e| CaptchaError::Catalog(format!("{}: {e}", path.display())))
}

/// A selected concept and the filename slots chosen from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptPick {
    pub item: CatalogItem,
    pub slots: Vec<usize>,
}

impl ConceptPick {
    /// Keys of the chosen pictures.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.slots.iter().filter_map(|slot| self.item.key(*slot))
    }
}

/// The complete, immutable selection behind a grid challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    target: usize,
    capacity: usize,
    concepts: BTreeMap<usize, ConceptPick>,
    cells: BTreeMap<usize, String>,
}

impl GridPlan {
    /// Draws a plan with a random target concept.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::InvalidConfig`] if the catalog has fewer than
    /// `1 + distractors` items, a selected item has too few pictures, the
    /// pictures do not fit in `capacity` cells, or two chosen pictures share
    /// a key.
    pub fn generate<R: Rng>(
        rng: &mut R,
        capacity: usize,
        catalog: &[CatalogItem],
        distractors: usize,
    ) -> Result<Self> {
        Self::check_catalog(catalog, distractors)?;
        let target = pick_distinct(rng, catalog.len(), &HashSet::new())?;
        Self::with_target(rng, capacity, catalog, distractors, target)
    }

    /// Draws a plan around a fixed target concept.
    ///
    /// # Errors
    ///
    /// Same as [`GridPlan::generate`], and also if `target` is out of range.
    pub fn with_target<R: Rng>(
        rng: &mut R,
        capacity: usize,
        catalog: &[CatalogItem],
        distractors: usize,
        target: usize,
    ) -> Result<Self> {
        Self::check_catalog(catalog, distractors)?;
        if target >= catalog.len() {
            return Err(CaptchaError::invalid(format!(
                "target index {target} outside catalog of {}",
                catalog.len()
            )));
        }

        let mut used: HashSet<usize> = [target].into_iter().collect();
        let mut order = vec![target];
        order.extend(pick_many(rng, catalog.len(), distractors, &mut used)?);
        debug!(target_index = target, selected = ?order, "Concepts selected");

        let mut concepts = BTreeMap::new();
        for &index in &order {
            let item = &catalog[index];
            let needed = if index == target {
                TARGET_SLOTS
            } else {
                DISTRACTOR_SLOTS
            };
            if item.filenames.len() < needed {
                return Err(CaptchaError::invalid(format!(
                    "concept {:?} has {} pictures, {needed} required",
                    item.title,
                    item.filenames.len()
                )));
            }
            let slots = pick_many(rng, item.filenames.len(), needed, &mut HashSet::new())?;
            debug!(concept_index = index, slots = ?slots, "Pictures selected");
            concepts.insert(
                index,
                ConceptPick {
                    item: item.clone(),
                    slots,
                },
            );
        }

        let keys: Vec<String> = order
            .iter()
            .filter_map(|index| concepts.get(index))
            .flat_map(ConceptPick::keys)
            .collect();
        if keys.len() > capacity {
            return Err(CaptchaError::invalid(format!(
                "{} pictures do not fit in {capacity} cells",
                keys.len()
            )));
        }
        let distinct: HashSet<&String> = keys.iter().collect();
        if distinct.len() != keys.len() {
            return Err(CaptchaError::invalid("selected pictures share a key"));
        }

        let mut taken = HashSet::with_capacity(keys.len());
        let mut cells = BTreeMap::new();
        for key in keys {
            let cell = pick_distinct(rng, capacity, &taken)?;
            taken.insert(cell);
            cells.insert(cell, key);
        }
        debug!(cells = ?cells, "Cells assigned");

        Ok(Self {
            target,
            capacity,
            concepts,
            cells,
        })
    }

    fn check_catalog(catalog: &[CatalogItem], distractors: usize) -> Result<()> {
        if distractors >= catalog.len() {
            return Err(CaptchaError::invalid(format!(
                "{distractors} distractors need a catalog of at least {} items, got {}",
                distractors + 1,
                catalog.len()
            )));
        }
        Ok(())
    }

    /// Catalog index of the target concept.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// The target concept's selection. The target is inserted first when
    /// the plan is drawn, so it is always present.
    #[must_use]
    pub fn target_pick(&self) -> &ConceptPick {
        &self.concepts[&self.target]
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Selected concepts keyed by catalog index.
    #[must_use]
    pub const fn concepts(&self) -> &BTreeMap<usize, ConceptPick> {
        &self.concepts
    }

    /// Picture key of every occupied cell.
    #[must_use]
    pub const fn cells(&self) -> &BTreeMap<usize, String> {
        &self.cells
    }

    /// Cells whose picture belongs to the target, ascending.
    #[must_use]
    pub fn answer(&self) -> Vec<usize> {
        let target_keys: HashSet<String> = self
            .concepts
            .get(&self.target)
            .map(|pick| pick.keys().collect())
            .unwrap_or_default();
        self.cells
            .iter()
            .filter(|(_, key)| target_keys.contains(*key))
            .map(|(cell, _)| *cell)
            .collect()
    }

    /// Number of grid rows needed for the capacity.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.capacity.div_ceil(GRID_COLUMNS)
    }
}

/// A picture grid with its image source and layout.
pub struct GridChallenge {
    plan: GridPlan,
    prompt: String,
    images: Box<dyn ImageSource>,
    options: RenderOptions,
}

impl GridChallenge {
    /// Builds a grid with the default distractor count using the
    /// thread-local generator.
    ///
    /// # Errors
    ///
    /// See [`GridPlan::generate`].
    pub fn new(
        capacity: usize,
        catalog: &[CatalogItem],
        images: impl ImageSource + 'static,
    ) -> Result<Self> {
        Self::with_rng(
            &mut rand::rng(),
            capacity,
            catalog,
            DEFAULT_DISTRACTORS,
            images,
        )
    }

    /// Builds a grid from an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`GridPlan::generate`].
    pub fn with_rng<R: Rng>(
        rng: &mut R,
        capacity: usize,
        catalog: &[CatalogItem],
        distractors: usize,
        images: impl ImageSource + 'static,
    ) -> Result<Self> {
        let plan = GridPlan::generate(rng, capacity, catalog, distractors)?;
        Ok(Self::from_plan(plan, images))
    }

    /// Wraps an already drawn plan.
    #[must_use]
    pub fn from_plan(plan: GridPlan, images: impl ImageSource + 'static) -> Self {
        Self {
            plan,
            prompt: DEFAULT_PROMPT.to_string(),
            images: Box::new(images),
            options: RenderOptions::default(),
        }
    }

    /// Replaces the prompt printed before the target label.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub const fn plan(&self) -> &GridPlan {
        &self.plan
    }

    /// Cells showing the target concept.
    #[must_use]
    pub fn answer(&self) -> Vec<usize> {
        self.plan.answer()
    }

    /// Canvas size for the current options. Oversized geometry saturates.
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        let o = &self.options;
        let columns = u32::try_from(GRID_COLUMNS).unwrap_or(u32::MAX);
        let rows = u32::try_from(self.plan.rows()).unwrap_or(u32::MAX);
        let width = columns
            .saturating_mul(o.cell_width.saturating_add(o.gap))
            .saturating_add(o.gap)
            .saturating_add(o.padding.saturating_mul(2));
        let height = rows
            .saturating_mul(o.cell_height.saturating_add(o.gap))
            .saturating_add(o.gap)
            .saturating_add(o.header_height)
            .saturating_add(o.padding.saturating_mul(2));
        (width, height)
    }

    /// Top-left corner of `cell`.
    fn cell_origin(&self, cell: usize) -> (u32, u32) {
        let o = &self.options;
        let column = u32::try_from(cell % GRID_COLUMNS).unwrap_or(0);
        let row = u32::try_from(cell / GRID_COLUMNS).unwrap_or(u32::MAX);
        let x = o
            .padding
            .saturating_add(column.saturating_mul(o.cell_width.saturating_add(o.gap)))
            .saturating_add(o.gap);
        let y = o
            .padding
            .saturating_add(row.saturating_mul(o.cell_height.saturating_add(o.gap)))
            .saturating_add(o.gap)
            .saturating_add(o.header_height);
        (x, y)
    }

    fn draw_title(&self, canvas: &mut Canvas, glyphs: &Glyphs) {
        let o = &self.options;
        let padding = to_i32(o.padding);
        let label_size = o.font_size + LABEL_SIZE_BOOST;
        let top = |size: f32| {
            let lift = TITLE_BASELINE_LIFT + f32_to_i32(size);
            padding + (to_i32(o.header_height) - lift).max(0)
        };

        let x = glyphs.draw_spaced(
            canvas,
            &self.prompt,
            padding + TITLE_INSET,
            top(o.font_size),
            o.font_size,
            TITLE_COLOR,
            TITLE_ADVANCE,
        );
        glyphs.draw_spaced(
            canvas,
            &self.plan.target_pick().item.title,
            x,
            top(label_size),
            label_size,
            TITLE_COLOR,
            TITLE_ADVANCE,
        );
    }
}

impl Challenge for GridChallenge {
    fn solution(&self) -> Solution {
        Solution::Cells(self.answer())
    }

    fn render(&self) -> Result<Vec<u8>> {
        let o = &self.options;
        // The prompt is the only place the target is named.
        let glyphs = Glyphs::from_options(o)?
            .ok_or_else(|| CaptchaError::Font("grid prompt requires a font".to_string()))?;

        let (width, height) = self.canvas_size();
        let mut canvas = Canvas::new(width, height, o.background.as_deref())?;
        self.draw_title(&mut canvas, &glyphs);

        for (&cell, key) in self.plan.cells() {
            let img = self.images.load(key).inspect_err(|e| {
                warn!(cell, key = %key, error = %e, "Cell image load failed");
            })?;

            let (x, y) = self.cell_origin(cell);
            let (w, h) = img.dimensions();
            let fitted = imageops::crop_imm(&img, 0, 0, w.min(o.cell_width), h.min(o.cell_height))
                .to_image();
            canvas.overlay(&fitted, i64::from(x), i64::from(y));
        }

        canvas.encode_png()
    }

    fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    fn options(&self) -> &RenderOptions {
        &self.options
    }
}
