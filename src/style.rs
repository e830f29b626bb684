use crate::colour::{colours, Colour};
use crate::error::Error;
use crate::font::{FontId, FontLibrary, FontVariant};
use crate::units::Px;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_SIZE: f32 = 32.0;
const DEFAULT_SPACING: f32 = 8.0;

/// One entry of the stylesheet as written on disk. Every field is optional;
/// unset fields of a named style fall back to the `[default]` entry, and
/// unset fields of the default entry fall back to built-in values (except
/// the regular font, which must be named somewhere).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StyleEntry {
    pub size: Option<f32>,
    pub colour: Option<String>,
    pub spacing: Option<f32>,
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub italic: Option<PathBuf>,
    pub bold_italic: Option<PathBuf>,
    pub list: Option<bool>,
}

impl StyleEntry {
    /// Coalesce this entry over `default`, field by field
    fn merged(&self, default: &StyleEntry) -> StyleEntry {
        StyleEntry {
            size: self.size.or(default.size),
            colour: self.colour.clone().or_else(|| default.colour.clone()),
            spacing: self.spacing.or(default.spacing),
            regular: self.regular.clone().or_else(|| default.regular.clone()),
            bold: self.bold.clone().or_else(|| default.bold.clone()),
            italic: self.italic.clone().or_else(|| default.italic.clone()),
            bold_italic: self
                .bold_italic
                .clone()
                .or_else(|| default.bold_italic.clone()),
            list: self.list.or(default.list),
        }
    }
}

/// On-disk shape of the whole stylesheet: a `[default]` table plus any
/// number of `[styles.<Name>]` tables keyed by the document's paragraph
/// style names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleSheetFile {
    #[serde(default)]
    pub default: StyleEntry,
    #[serde(default)]
    pub styles: HashMap<String, StyleEntry>,
}

/// The font faces a style can draw with. Variants the stylesheet does not
/// name fall back towards the regular face (bold-italic tries bold first).
#[derive(Debug, Clone, PartialEq)]
pub struct VariantFonts {
    pub regular: FontId,
    pub bold: Option<FontId>,
    pub italic: Option<FontId>,
    pub bold_italic: Option<FontId>,
}

impl VariantFonts {
    pub fn select(&self, variant: FontVariant) -> FontId {
        match variant {
            FontVariant::Regular => self.regular,
            FontVariant::Bold => self.bold.unwrap_or(self.regular),
            FontVariant::Italic => self.italic.unwrap_or(self.regular),
            FontVariant::BoldItalic => self
                .bold_italic
                .or(self.bold)
                .or(self.italic)
                .unwrap_or(self.regular),
        }
    }
}

/// A fully resolved paragraph style: fonts loaded, colour parsed, nothing
/// optional left.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub size: Px,
    pub spacing: Px,
    pub colour: Colour,
    pub list: bool,
    pub fonts: VariantFonts,
}

impl ParagraphStyle {
    /// The effective font, size, and colour for a run of this paragraph:
    /// explicit run attributes override, unset ones inherit.
    pub fn resolve_run(&self, run: &RunStyle) -> (FontId, Px, Colour) {
        let variant =
            FontVariant::from_flags(run.bold.unwrap_or(false), run.italic.unwrap_or(false));
        (
            self.fonts.select(variant),
            run.size.unwrap_or(self.size),
            run.colour.unwrap_or(self.colour),
        )
    }
}

/// Attribute overrides carried by a single run. `None` means "inherit from
/// the paragraph style"; each field coalesces independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub colour: Option<Colour>,
    pub size: Option<Px>,
}

/// All resolved styles for a job, queried by paragraph style name.
#[derive(Debug)]
pub struct StyleSheet {
    default: ParagraphStyle,
    styles: HashMap<String, ParagraphStyle>,
}

impl StyleSheet {
    /// Build a stylesheet from already resolved styles, without a config
    /// file. The layout engine only ever sees resolved styles, so this is
    /// the entry point for programmatic use.
    pub fn new(default: ParagraphStyle) -> StyleSheet {
        StyleSheet {
            default,
            styles: HashMap::new(),
        }
    }

    /// Add or replace a named style
    pub fn with_style<S: Into<String>>(mut self, name: S, style: ParagraphStyle) -> StyleSheet {
        self.styles.insert(name.into(), style);
        self
    }

    /// Load a stylesheet from a TOML file, loading every font it names into
    /// `fonts`. Font paths are taken relative to the stylesheet's own
    /// directory.
    pub fn load(path: &Path, fonts: &mut FontLibrary) -> Result<StyleSheet, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Resource(format!("stylesheet {}: {e}", path.display())))?;
        let file: StyleSheetFile = toml::from_str(&text)?;
        StyleSheet::from_file(file, path.parent(), fonts)
    }

    /// Resolve a parsed stylesheet: merge every named entry over the default
    /// entry and load the fonts each one names.
    pub fn from_file(
        file: StyleSheetFile,
        base: Option<&Path>,
        fonts: &mut FontLibrary,
    ) -> Result<StyleSheet, Error> {
        let default = resolve_entry(&file.default, base, fonts)?;
        let mut styles = HashMap::new();
        for (name, entry) in &file.styles {
            let style = resolve_entry(&entry.merged(&file.default), base, fonts)?;
            styles.insert(name.clone(), style);
        }
        Ok(StyleSheet { default, styles })
    }

    /// The style for a paragraph. Unknown or absent style names resolve to
    /// the default entry; unmapped names containing "List" (the usual
    /// word-processor bullet styles) keep their list behavior.
    pub fn resolve(&self, name: Option<&str>) -> ParagraphStyle {
        match name {
            Some(n) => match self.styles.get(n) {
                Some(style) => style.clone(),
                None => {
                    let mut style = self.default.clone();
                    if n.contains("List") {
                        style.list = true;
                    }
                    style
                }
            },
            None => self.default.clone(),
        }
    }

    pub fn default_style(&self) -> &ParagraphStyle {
        &self.default
    }
}

fn resolve_entry(
    entry: &StyleEntry,
    base: Option<&Path>,
    fonts: &mut FontLibrary,
) -> Result<ParagraphStyle, Error> {
    let colour = match &entry.colour {
        Some(hex) => Colour::from_hex(hex)?,
        None => colours::BLACK,
    };
    let regular_path = entry
        .regular
        .as_ref()
        .ok_or_else(|| Error::Resource("stylesheet names no regular font".into()))?;
    let regular = fonts.load(&join_base(base, regular_path))?;
    let load_optional = |fonts: &mut FontLibrary, path: &Option<PathBuf>| match path {
        Some(p) => fonts.load(&join_base(base, p)).map(Some),
        None => Ok(None),
    };
    let bold = load_optional(fonts, &entry.bold)?;
    let italic = load_optional(fonts, &entry.italic)?;
    let bold_italic = load_optional(fonts, &entry.bold_italic)?;

    Ok(ParagraphStyle {
        size: Px(entry.size.unwrap_or(DEFAULT_SIZE)),
        spacing: Px(entry.spacing.unwrap_or(DEFAULT_SPACING)),
        colour,
        list: entry.list.unwrap_or(false),
        fonts: VariantFonts {
            regular,
            bold,
            italic,
            bold_italic,
        },
    })
}

fn join_base(base: Option<&Path>, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        match base {
            Some(b) => b.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_with_all_variants() -> ParagraphStyle {
        ParagraphStyle {
            size: Px(32.0),
            spacing: Px(8.0),
            colour: colours::BLACK,
            list: false,
            fonts: VariantFonts {
                regular: FontId(0),
                bold: Some(FontId(1)),
                italic: Some(FontId(2)),
                bold_italic: Some(FontId(3)),
            },
        }
    }

    #[test]
    fn stylesheet_toml_parses_with_partial_entries() {
        let file: StyleSheetFile = toml::from_str(
            r##"
            [default]
            size = 24.0
            colour = "#102030"
            regular = "fonts/Sans.ttf"
            bold = "fonts/Sans-Bold.ttf"

            [styles.Heading1]
            size = 48.0

            [styles.ListParagraph]
            list = true
            "##,
        )
        .unwrap();

        assert_eq!(file.default.size, Some(24.0));
        let heading = file.styles.get("Heading1").unwrap().merged(&file.default);
        assert_eq!(heading.size, Some(48.0));
        assert_eq!(heading.colour.as_deref(), Some("#102030"));
        assert_eq!(heading.regular.as_deref(), Some(Path::new("fonts/Sans.ttf")));
        let list = file.styles.get("ListParagraph").unwrap();
        assert_eq!(list.list, Some(true));
        assert_eq!(list.size, None);
    }

    #[test]
    fn bold_run_selects_the_bold_face_and_overrides_coalesce_per_field() {
        let style = style_with_all_variants();

        let run = RunStyle {
            bold: Some(true),
            italic: Some(false),
            colour: None,
            size: None,
        };
        let (font, size, colour) = style.resolve_run(&run);
        assert_eq!(font, FontId(1));
        assert_eq!(size, Px(32.0));
        assert_eq!(colour, colours::BLACK);

        let run = RunStyle {
            bold: None,
            italic: None,
            colour: Some(colours::RED),
            size: Some(Px(10.0)),
        };
        let (font, size, colour) = style.resolve_run(&run);
        assert_eq!(font, FontId(0));
        assert_eq!(size, Px(10.0));
        assert_eq!(colour, colours::RED);
    }

    #[test]
    fn missing_variants_fall_back_towards_regular() {
        let fonts = VariantFonts {
            regular: FontId(0),
            bold: Some(FontId(1)),
            italic: None,
            bold_italic: None,
        };
        assert_eq!(fonts.select(FontVariant::Italic), FontId(0));
        assert_eq!(fonts.select(FontVariant::BoldItalic), FontId(1));

        let bare = VariantFonts {
            regular: FontId(0),
            bold: None,
            italic: None,
            bold_italic: None,
        };
        assert_eq!(bare.select(FontVariant::BoldItalic), FontId(0));
    }

    #[test]
    fn unknown_style_names_resolve_to_the_default_entry() {
        let sheet = StyleSheet::new(style_with_all_variants());
        let style = sheet.resolve(Some("NeverMapped"));
        assert_eq!(style.size, Px(32.0));
        assert!(!style.list);

        // word-processor bullet styles keep their bullets even when unmapped
        let style = sheet.resolve(Some("ListParagraph"));
        assert!(style.list);
    }

    #[test]
    fn missing_regular_font_is_an_error() {
        let file: StyleSheetFile = toml::from_str("[default]\nsize = 12.0\n").unwrap();
        let mut fonts = FontLibrary::default();
        let err = StyleSheet::from_file(file, None, &mut fonts).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
