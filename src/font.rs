use crate::colour::Colour;
use crate::error::Error;
use crate::units::Px;
use image::RgbaImage;
use rusttype::{point, Scale};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Which face of a style's font family a run selects, based on its
/// bold/italic flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FontVariant {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub fn from_flags(bold: bool, italic: bool) -> FontVariant {
        match (bold, italic) {
            (false, false) => FontVariant::Regular,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italic,
            (true, true) => FontVariant::BoldItalic,
        }
    }
}

/// A parsed font face. Fonts are TTF or OTF files; text is rasterized
/// directly onto page images, so nothing of the face survives into the
/// output beyond its pixels.
pub struct Font {
    face: rusttype::Font<'static>,
}

impl Font {
    /// Load a font from raw bytes, returning an error if the font could not
    /// be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, Error> {
        let face = rusttype::Font::try_from_vec(bytes)
            .ok_or_else(|| Error::Resource("font data could not be parsed".into()))?;
        Ok(Font { face })
    }

    /// The distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Px) -> Px {
        Px(self.face.v_metrics(Scale::uniform(size.0)).ascent)
    }

    /// The distance from the baseline to the bottom of the font at the given
    /// size. Note: this is usually negative
    pub fn descent(&self, size: Px) -> Px {
        Px(self.face.v_metrics(Scale::uniform(size.0)).descent)
    }

    /// The default vertical offset between two rows of text at the given size
    pub fn line_height(&self, size: Px) -> Px {
        let vm = self.face.v_metrics(Scale::uniform(size.0));
        Px(vm.ascent - vm.descent + vm.line_gap)
    }

    /// The advance width of `text` at `size`: the sum of glyph advances with
    /// kerning applied, including any trailing whitespace
    pub fn width_of_text(&self, size: Px, text: &str) -> Px {
        let scale = Scale::uniform(size.0);
        let width = self
            .face
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        Px(width)
    }

    /// Rasterize `text` onto `image` with its top-left corner at `(x, y)`,
    /// blending glyph coverage against the existing pixels channel by channel.
    pub fn draw_text(&self, image: &mut RgbaImage, x: Px, y: Px, size: Px, colour: Colour, text: &str) {
        let scale = Scale::uniform(size.0);
        let v_metrics = self.face.v_metrics(scale);
        let text_colour = colour.to_rgba();
        let (width, height) = image.dimensions();

        for glyph in self.face.layout(text, scale, point(x.0, y.0 + v_metrics.ascent)) {
            if let Some(bounding_box) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let px = bounding_box.min.x + gx as i32;
                    let py = bounding_box.min.y + gy as i32;
                    if px >= 0 && px < width as i32 && py >= 0 && py < height as i32 {
                        let (px, py) = (px as u32, py as u32);
                        let current = *image.get_pixel(px, py);
                        let mut output = current;
                        for i in 0..3 {
                            output[i] = ((text_colour[i] as f32 * coverage)
                                + (current[i] as f32 * (1.0 - coverage)))
                                .round() as u8;
                        }
                        output[3] = 255;
                        image.put_pixel(px, py, output);
                    }
                });
            }
        }
    }
}

/// A handle to a font stored in a [FontLibrary]. Handles are only minted by
/// the library itself, so indexing with one cannot miss.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FontId(pub(crate) usize);

/// All fonts loaded for a job, interned by path so a face shared between
/// styles is parsed once.
#[derive(Default)]
pub struct FontLibrary {
    fonts: Vec<Font>,
    by_path: HashMap<PathBuf, FontId>,
}

impl FontLibrary {
    /// Load the font at `path`, reusing the previously parsed face when the
    /// same path was loaded before. A missing or unparseable file is a
    /// resource error naming the path.
    pub fn load(&mut self, path: &Path) -> Result<FontId, Error> {
        if let Some(id) = self.by_path.get(path) {
            return Ok(*id);
        }
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Resource(format!("font {}: {e}", path.display())))?;
        let font = Font::load(bytes)
            .map_err(|_| Error::Resource(format!("font {} could not be parsed", path.display())))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        self.by_path.insert(path.to_path_buf(), id);
        Ok(id)
    }

    pub fn get(&self, id: FontId) -> &Font {
        &self.fonts[id.0]
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Text measurement, abstracted so the layout engine can be driven by a
/// fixed-metric fake in tests instead of parsed font files.
pub trait TextMeasurer {
    /// The advance width of `text` drawn with `font` at `size`
    fn text_width(&self, font: FontId, size: Px, text: &str) -> Px;
}

impl TextMeasurer for FontLibrary {
    fn text_width(&self, font: FontId, size: Px, text: &str) -> Px {
        self.get(font).width_of_text(size, text)
    }
}
