use crate::error::Error;
use crate::paths;
use image::{imageops, GenericImageView, RgbaImage};
use std::path::{Path, PathBuf};

/// Largest sheet edge, in pixels, that Tabletop Simulator will accept
pub const DECK_MAX_SIZE: u32 = 10_000;
/// Largest edge a reference card back is resized down to
pub const REFERENCE_MAX_SIZE: u32 = 1_000;

/// Starting grid for a deck sheet, the largest layout Tabletop Simulator
/// reads as one deck.
const GRID_START: (u32, u32) = (10, 7);

/// Inputs for building one or more deck sheets
#[derive(Debug, Clone)]
pub struct DeckOptions {
    pub max_size: u32,
    pub reference_max_size: u32,
    /// Card back every card is resized to match before tiling
    pub reference: Option<PathBuf>,
}

impl Default for DeckOptions {
    fn default() -> DeckOptions {
        DeckOptions {
            max_size: DECK_MAX_SIZE,
            reference_max_size: REFERENCE_MAX_SIZE,
            reference: None,
        }
    }
}

/// Shrink the starting grid until a sheet of `tile_width` by `tile_height`
/// tiles stays within `max_size` pixels on both axes. Columns give way before
/// rows, and neither drops below one.
pub fn fit_grid(tile_width: u32, tile_height: u32, max_size: u32) -> Result<(u32, u32), Error> {
    let (mut columns, mut rows) = GRID_START;
    while columns > 1 && tile_width * columns > max_size {
        columns -= 1;
    }
    while rows > 1 && tile_height * rows > max_size {
        rows -= 1;
    }
    if tile_width * columns > max_size || tile_height * rows > max_size {
        return Err(Error::Usage(format!(
            "a single {tile_width}x{tile_height} card already exceeds the {max_size} px sheet limit"
        )));
    }
    tracing::debug!(columns, rows, "fitted deck grid");
    Ok((columns, rows))
}

fn tile(card: &RgbaImage, columns: u32, rows: u32) -> RgbaImage {
    let (width, height) = card.dimensions();
    let mut sheet = RgbaImage::new(width * columns, height * rows);
    for row in 0..rows {
        for column in 0..columns {
            imageops::replace(&mut sheet, card, (column * width) as i64, (row * height) as i64);
        }
    }
    sheet
}

/// Bound the reference card to the reference cap, save the altered copy next
/// to the original, and hand back the size every card should match. A
/// reference already within the cap is used as is, without a copy.
fn prepare_reference(path: &Path, max_size: u32) -> Result<(u32, u32), Error> {
    let reference = image::open(path)
        .map_err(|e| Error::Resource(format!("reference card {}: {e}", path.display())))?;
    let (width, height) = reference.dimensions();
    if width <= max_size && height <= max_size {
        return Ok((width, height));
    }
    let reference = reference.thumbnail(max_size, max_size);
    let out = paths::timestamped(path);
    reference.save(&out)?;
    tracing::info!(
        path = %out.display(),
        width = reference.width(),
        height = reference.height(),
        "saved resized reference card"
    );
    Ok(reference.dimensions())
}

fn tile_one(
    card_path: &Path,
    reference_size: Option<(u32, u32)>,
    max_size: u32,
) -> Result<PathBuf, Error> {
    let card = image::open(card_path)
        .map_err(|e| Error::Resource(format!("card {}: {e}", card_path.display())))?;
    let card = match reference_size {
        Some((width, height)) => {
            card.resize_exact(width, height, imageops::FilterType::Lanczos3)
        }
        None => card,
    };
    let card = card.to_rgba8();

    let (columns, rows) = fit_grid(card.width(), card.height(), max_size)?;
    let sheet = tile(&card, columns, rows);

    let out = paths::timestamped(card_path);
    sheet.save(&out)?;
    tracing::info!(path = %out.display(), columns, rows, "saved deck sheet");
    Ok(out)
}

/// Tile one card image into a deck sheet, returning the sheet's path.
pub fn build_deck(card_path: &Path, options: &DeckOptions) -> Result<PathBuf, Error> {
    let reference_size = options
        .reference
        .as_deref()
        .map(|path| prepare_reference(path, options.reference_max_size))
        .transpose()?;
    tile_one(card_path, reference_size, options.max_size)
}

/// Tile every raster image in `directory` into its own deck sheet. The
/// reference card, when given, is prepared once and shared by every sheet.
pub fn build_deck_batch(directory: &Path, options: &DeckOptions) -> Result<Vec<PathBuf>, Error> {
    let reference_size = options
        .reference
        .as_deref()
        .map(|path| prepare_reference(path, options.reference_max_size))
        .transpose()?;

    let mut sheets = Vec::new();
    for path in paths::raster_files(directory)? {
        sheets.push(tile_one(&path, reference_size, options.max_size)?);
    }
    if sheets.is_empty() {
        return Err(Error::Resource(format!(
            "no card images found in {}",
            directory.display()
        )));
    }
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn small_cards_keep_the_full_grid() {
        assert_eq!(fit_grid(100, 100, 10_000).unwrap(), (10, 7));
    }

    #[test]
    fn wide_cards_lose_columns_first() {
        // 1200 * 10 = 12000 overflows, 1200 * 8 = 9600 fits
        assert_eq!(fit_grid(1200, 100, 10_000).unwrap(), (8, 7));
    }

    #[test]
    fn tall_cards_lose_rows() {
        // 1600 * 7 = 11200 overflows, 1600 * 6 = 9600 fits
        assert_eq!(fit_grid(100, 1600, 10_000).unwrap(), (10, 6));
    }

    #[test]
    fn the_grid_bottoms_out_at_one_by_one() {
        assert_eq!(fit_grid(6000, 6000, 10_000).unwrap(), (1, 1));
    }

    #[test]
    fn an_oversized_card_is_a_usage_error() {
        let err = fit_grid(10_001, 100, 10_000).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn a_sheet_tiles_the_card_row_major() {
        let dir = tempfile::tempdir().unwrap();
        let card_path = dir.path().join("card.png");
        RgbaImage::from_pixel(30, 20, Rgba([250, 10, 10, 255]))
            .save(&card_path)
            .unwrap();

        let out = build_deck(&card_path, &DeckOptions::default()).unwrap();
        assert_ne!(out, card_path);

        let sheet = image::open(&out).unwrap().to_rgba8();
        assert_eq!(sheet.dimensions(), (300, 140));
        assert_eq!(sheet.get_pixel(0, 0), &Rgba([250, 10, 10, 255]));
        assert_eq!(sheet.get_pixel(299, 139), &Rgba([250, 10, 10, 255]));
    }

    #[test]
    fn cards_are_resized_to_the_reference_before_tiling() {
        let dir = tempfile::tempdir().unwrap();
        let card_path = dir.path().join("card.png");
        RgbaImage::from_pixel(30, 20, Rgba([0, 200, 0, 255]))
            .save(&card_path)
            .unwrap();
        let reference_path = dir.path().join("reference.png");
        RgbaImage::from_pixel(200, 100, Rgba([0, 0, 200, 255]))
            .save(&reference_path)
            .unwrap();

        let options = DeckOptions {
            reference: Some(reference_path),
            reference_max_size: 100,
            ..DeckOptions::default()
        };
        let out = build_deck(&card_path, &options).unwrap();

        // the reference shrinks to 100x50, so each tile does too
        let sheet = image::open(&out).unwrap().to_rgba8();
        assert_eq!(sheet.dimensions(), (1000, 350));

        // the altered reference copy lands beside the original
        let copies = paths::raster_files(dir.path()).unwrap();
        assert!(copies.len() >= 4, "expected card, reference, altered copy and sheet");
    }

    #[test]
    fn an_in_cap_reference_is_not_copied() {
        let dir = tempfile::tempdir().unwrap();
        let card_path = dir.path().join("card.png");
        RgbaImage::from_pixel(30, 20, Rgba([0, 200, 0, 255]))
            .save(&card_path)
            .unwrap();
        let reference_path = dir.path().join("reference.png");
        RgbaImage::from_pixel(40, 20, Rgba([0, 0, 200, 255]))
            .save(&reference_path)
            .unwrap();

        let options = DeckOptions {
            reference: Some(reference_path),
            ..DeckOptions::default()
        };
        let out = build_deck(&card_path, &options).unwrap();

        // tiles take the reference's own size
        assert_eq!(image::open(&out).unwrap().dimensions(), (400, 140));

        // nothing was altered, so only the card, reference and sheet exist
        let files = paths::raster_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn batch_mode_tiles_every_card_in_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["one.png", "two.png"] {
            RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]))
                .save(dir.path().join(name))
                .unwrap();
        }

        let sheets = build_deck_batch(dir.path(), &DeckOptions::default()).unwrap();
        assert_eq!(sheets.len(), 2);
        for sheet in sheets {
            assert_eq!(image::open(sheet).unwrap().dimensions(), (100, 70));
        }
    }

    #[test]
    fn an_empty_batch_directory_is_a_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_deck_batch(dir.path(), &DeckOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
