use crate::colour::Colour;
use crate::error::Error;
use crate::font::{FontId, FontLibrary};
use crate::rect::Rect;
use crate::units::Px;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Canvas size used when no template image is supplied (A4 at 150 dpi)
pub const DEFAULT_PAGE_SIZE: (u32, u32) = (1240, 1754);

/// The font a placed span is drawn with
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpanFont {
    pub id: FontId,
    pub size: Px,
}

/// A placed piece of text: what it says, what it is drawn with, and the
/// top-left corner it is drawn at. Spans accumulate during layout and are
/// only rasterized when the page is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Px, Px),
}

/// A single manual page: a base canvas (template clone or solid colour),
/// the writable region within it, and the spans laid out so far.
#[derive(Clone)]
pub struct Page {
    /// The starting canvas the page is drawn over
    pub base: RgbaImage,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The laid out text
    pub contents: Vec<SpanLayout>,
}

impl Page {
    pub fn new(base: RgbaImage, content_box: Rect) -> Page {
        Page {
            base,
            content_box,
            contents: Vec::default(),
        }
    }

    /// A blank page of the given size filled with `background`
    pub fn blank(width: u32, height: u32, background: Colour, content_box: Rect) -> Page {
        let base = RgbaImage::from_pixel(width, height, background.to_rgba());
        Page::new(base, content_box)
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(span);
    }

    pub fn width(&self) -> Px {
        Px(self.base.width() as f32)
    }

    pub fn height(&self) -> Px {
        Px(self.base.height() as f32)
    }

    /// Rasterize every span over a clone of the base canvas
    pub fn render(&self, fonts: &FontLibrary) -> RgbaImage {
        let mut image = self.base.clone();
        for span in &self.contents {
            fonts.get(span.font.id).draw_text(
                &mut image,
                span.coords.0,
                span.coords.1,
                span.font.size,
                span.colour,
                &span.text,
            );
        }
        image
    }
}

/// Supplies fresh template pages and persists finished ones. The layout
/// engine owns exactly one page at a time; a page handed to `commit_page` is
/// complete and is never touched again.
pub trait PageSink {
    fn fresh_page(&mut self) -> Result<Page, Error>;
    fn commit_page(&mut self, page: Page) -> Result<(), Error>;
    /// How many pages have been committed so far
    fn committed(&self) -> usize;
}

/// Renders committed pages and writes them into a directory as
/// `page-NNN.png`, cloning a template canvas for every fresh page.
pub struct DirSink<'a> {
    template: RgbaImage,
    content_box: Rect,
    fonts: &'a FontLibrary,
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl<'a> DirSink<'a> {
    pub fn new(
        template: RgbaImage,
        content_box: Rect,
        fonts: &'a FontLibrary,
        directory: &Path,
    ) -> DirSink<'a> {
        DirSink {
            template,
            content_box,
            fonts,
            directory: directory.to_path_buf(),
            written: Vec::new(),
        }
    }

    /// Paths of every page written, in page order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PageSink for DirSink<'_> {
    fn fresh_page(&mut self) -> Result<Page, Error> {
        Ok(Page::new(self.template.clone(), self.content_box))
    }

    fn commit_page(&mut self, page: Page) -> Result<(), Error> {
        let rendered = page.render(self.fonts);
        let path = self
            .directory
            .join(format!("page-{:03}.png", self.written.len() + 1));
        rendered.save(&path)?;
        tracing::info!(path = %path.display(), "wrote page");
        self.written.push(path);
        Ok(())
    }

    fn committed(&self) -> usize {
        self.written.len()
    }
}

/// Collects committed pages in memory instead of writing them out, so
/// layout results can be inspected span by span.
#[derive(Clone)]
pub struct MemorySink {
    width: u32,
    height: u32,
    background: Colour,
    content_box: Rect,
    pub pages: Vec<Page>,
}

impl MemorySink {
    pub fn new(width: u32, height: u32, background: Colour, content_box: Rect) -> MemorySink {
        MemorySink {
            width,
            height,
            background,
            content_box,
            pages: Vec::new(),
        }
    }
}

impl PageSink for MemorySink {
    fn fresh_page(&mut self) -> Result<Page, Error> {
        Ok(Page::blank(
            self.width,
            self.height,
            self.background,
            self.content_box,
        ))
    }

    fn commit_page(&mut self, page: Page) -> Result<(), Error> {
        self.pages.push(page);
        Ok(())
    }

    fn committed(&self) -> usize {
        self.pages.len()
    }
}
