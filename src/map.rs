use crate::error::Error;
use crate::paths;
use image::{imageops, RgbaImage};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Edge length asset thumbnails are bounded to before placement
const THUMB_SIZE: u32 = 100;

/// How many assets a map receives, inclusive on both ends
const PLACEMENTS: std::ops::RangeInclusive<u32> = 5..=10;

/// Load every raster image under `directory` as a placement-ready thumbnail.
/// Unreadable files are skipped with a warning; an empty result is an error.
fn load_assets(directory: &Path) -> Result<Vec<RgbaImage>, Error> {
    let mut assets = Vec::new();
    for path in paths::raster_files(directory)? {
        match image::open(&path) {
            Ok(asset) => assets.push(asset.thumbnail(THUMB_SIZE, THUMB_SIZE).to_rgba8()),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable asset"),
        }
    }
    if assets.is_empty() {
        return Err(Error::Resource(format!(
            "no usable map assets in {}",
            directory.display()
        )));
    }
    Ok(assets)
}

/// Blend a random handful of assets onto `background` at random positions.
/// Placements hanging over the right or bottom edge are clipped. Returns the
/// number of assets placed.
pub fn scatter<R: Rng>(background: &mut RgbaImage, assets: &[RgbaImage], rng: &mut R) -> u32 {
    let count = rng.gen_range(PLACEMENTS);
    for _ in 0..count {
        let asset = &assets[rng.gen_range(0..assets.len())];
        let x = rng.gen_range(0..=background.width()) as i64;
        let y = rng.gen_range(0..=background.height()) as i64;
        imageops::overlay(background, asset, x, y);
    }
    count
}

/// Scatter thumbnails from `assets_dir` over the background image and save
/// the result beside it, returning the output path.
pub fn build_map<R: Rng>(
    background_path: &Path,
    assets_dir: &Path,
    rng: &mut R,
) -> Result<PathBuf, Error> {
    let assets = load_assets(assets_dir)?;
    let mut background = image::open(background_path)
        .map_err(|e| Error::Resource(format!("background {}: {e}", background_path.display())))?
        .to_rgba8();

    let placed = scatter(&mut background, &assets, rng);

    let out = paths::timestamped(background_path);
    background.save(&out)?;
    tracing::info!(path = %out.display(), placed, "saved scatter map");
    Ok(out)
}
