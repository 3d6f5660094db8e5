//! Tiling rendered yearly graphs into one overview image.
//!
//! Every PNG in a directory is stamped with its file stem (normally the
//! year), scaled to the smallest image's size and placed row by row into a
//! single canvas.

use ab_glyph::{FontVec, PxScale};
use anyhow::{anyhow, bail, Context, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Tiles per row unless overridden.
pub const DEFAULT_COLUMNS: u32 = 6;

const LABEL_SCALE: f32 = 22.0;
const LABEL_OFFSET: i32 = 15;
const LABEL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Layout options for a montage.
#[derive(Debug, Clone)]
pub struct MontageOptions {
    /// Tiles per row.
    pub columns: u32,
    /// TrueType/OpenType font for the tile labels. Tiles are unlabelled without one.
    pub font: Option<PathBuf>,
}

impl Default for MontageOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            font: None,
        }
    }
}

/// PNG files directly inside `dir`, sorted by file name.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        let is_png = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if entry.file_type().is_file() && is_png {
            images.push(entry.into_path());
        }
    }
    images.sort();
    Ok(images)
}

fn load_font(path: &Path) -> Result<FontVec> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    FontVec::try_from_vec(bytes).map_err(|e| anyhow!("Invalid font {}: {}", path.display(), e))
}

/// Smallest tile by width plus height, ties broken by width.
fn tile_size(tiles: &[RgbaImage]) -> Option<(u32, u32)> {
    tiles
        .iter()
        .map(|tile| tile.dimensions())
        .min_by_key(|&(w, h)| (w + h, w, h))
}

/// Lay tiles out row by row. Cells past the last tile stay transparent.
fn tile_grid(tiles: &[RgbaImage], (width, height): (u32, u32), columns: u32) -> RgbaImage {
    let count = tiles.len() as u32;
    let across = columns.min(count);
    let rows = count.div_ceil(columns);
    let mut canvas = RgbaImage::new(across * width, rows * height);

    for (index, tile) in tiles.iter().enumerate() {
        let index = index as u32;
        let x = i64::from((index % columns) * width);
        let y = i64::from((index / columns) * height);
        if tile.dimensions() == (width, height) {
            imageops::overlay(&mut canvas, tile, x, y);
        } else {
            let resized = imageops::resize(tile, width, height, FilterType::Triangle);
            imageops::overlay(&mut canvas, &resized, x, y);
        }
    }
    canvas
}

/// Label and tile the given images.
pub fn combine_images(paths: &[PathBuf], options: &MontageOptions) -> Result<RgbaImage> {
    if options.columns == 0 {
        bail!("Montage needs at least one column");
    }
    if paths.is_empty() {
        bail!("No PNG images to combine");
    }

    let font = options.font.as_deref().map(load_font).transpose()?;
    if font.is_none() {
        warn!("No font given, tiles will not be labelled");
    }

    let mut tiles = Vec::with_capacity(paths.len());
    for path in paths {
        let mut tile = image::open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?
            .to_rgba8();

        if let Some(ref font) = font {
            let label = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default();
            imageproc::drawing::draw_text_mut(
                &mut tile,
                LABEL_COLOR,
                LABEL_OFFSET,
                LABEL_OFFSET,
                PxScale::from(LABEL_SCALE),
                font,
                label,
            );
        }
        debug!("Loaded tile {} ({:?})", path.display(), tile.dimensions());
        tiles.push(tile);
    }

    let size = tile_size(&tiles).context("No tiles loaded")?;
    Ok(tile_grid(&tiles, size, options.columns))
}

/// Combine every PNG in `dir` and save the result to `output`.
///
/// Returns the number of tiles and the canvas dimensions.
pub fn write_montage(dir: &Path, output: &Path, options: &MontageOptions) -> Result<(usize, (u32, u32))> {
    let paths = find_images(dir)?;
    info!("Combining {} images from {}", paths.len(), dir.display());

    let canvas = combine_images(&paths, options)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    canvas
        .save(output)
        .with_context(|| format!("Failed to write montage to {}", output.display()))?;

    Ok((paths.len(), canvas.dimensions()))
}
