use crate::colour::colours;
use crate::document::Document;
use crate::error::Error;
use crate::fetch;
use crate::font::FontLibrary;
use crate::layout::{typeset, Margins};
use crate::page::{DirSink, DEFAULT_PAGE_SIZE};
use crate::pdf::{self, PdfInfo};
use crate::style::StyleSheet;
use crate::units::Px;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Everything one manual job needs, gathered up front so the pipeline below
/// stays a chain of plain function calls.
#[derive(Debug, Clone)]
pub struct ManualJob {
    /// Local document path or a Drive share link
    pub input: String,
    /// TOML stylesheet describing paragraph styles and their fonts
    pub styles: PathBuf,
    /// Page template image; a blank A4 canvas at 150 dpi when absent
    pub template: Option<PathBuf>,
    /// Fraction of each page edge given over to the margin
    pub margin: f32,
    /// Extra pixels added to every margin after the fraction
    pub margin_offset: f32,
    /// Image prepended to the compiled document as a cover
    pub title_page: Option<PathBuf>,
    /// Stop after writing page images, leaving no PDF
    pub skip_compile: bool,
    /// Bearer token file for fetching share-linked documents
    pub credentials: Option<PathBuf>,
    /// Directory receiving page images and the compiled PDF
    pub out_dir: PathBuf,
    pub info: PdfInfo,
}

/// What a finished manual job produced
#[derive(Debug)]
pub struct ManualReport {
    pub pages: usize,
    pub words: usize,
    pub pdf: Option<PathBuf>,
}

fn load_document(job: &ManualJob) -> Result<Document, Error> {
    if fetch::is_share_link(&job.input) {
        let bytes = fetch::fetch_document(&job.input, job.credentials.as_deref())?;
        Document::from_docx_bytes(&bytes)
    } else {
        Document::load_docx(Path::new(&job.input))
    }
}

fn load_template(template: Option<&Path>) -> Result<RgbaImage, Error> {
    match template {
        Some(path) => Ok(image::open(path)
            .map_err(|e| Error::Resource(format!("template {}: {e}", path.display())))?
            .to_rgba8()),
        None => {
            let (width, height) = DEFAULT_PAGE_SIZE;
            Ok(RgbaImage::from_pixel(width, height, colours::WHITE.to_rgba()))
        }
    }
}

/// Run one manual job end to end: read the document, lay it out over the
/// template, write the page images, and compile them into a PDF. The PDF is
/// only assembled once layout has fully succeeded, so a failed run never
/// leaves a half-built document behind.
pub fn run(job: &ManualJob) -> Result<ManualReport, Error> {
    let document = load_document(job)?;
    tracing::info!(
        paragraphs = document.paragraphs.len(),
        words = document.word_count(),
        "document loaded"
    );

    let mut fonts = FontLibrary::default();
    let styles = StyleSheet::load(&job.styles, &mut fonts)?;

    let template = load_template(job.template.as_deref())?;
    let page_width = Px(template.width() as f32);
    let page_height = Px(template.height() as f32);
    let margins = Margins::fractional(page_width, page_height, job.margin, Px(job.margin_offset));
    let content_box = margins.content_box(page_width, page_height)?;

    std::fs::create_dir_all(&job.out_dir)?;
    let mut sink = DirSink::new(template, content_box, &fonts, &job.out_dir);
    let stats = typeset(&document, &styles, &fonts, &mut sink)?;
    tracing::info!(pages = stats.pages, words = stats.words, "manual laid out");

    let pdf = if job.skip_compile {
        None
    } else {
        let mut pages: Vec<PathBuf> = Vec::new();
        if let Some(title_page) = &job.title_page {
            pages.push(title_page.clone());
        }
        pages.extend(sink.written().iter().cloned());
        let out = job.out_dir.join("manual.pdf");
        Some(pdf::compile(&pages, &out, &job.info)?)
    };

    Ok(ManualReport {
        pages: stats.pages,
        words: stats.words,
        pdf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(input: &str, dir: &Path) -> ManualJob {
        ManualJob {
            input: input.to_string(),
            styles: dir.join("styles.toml"),
            template: None,
            margin: 0.1,
            margin_offset: 0.0,
            title_page: None,
            skip_compile: false,
            credentials: None,
            out_dir: dir.join("out"),
            info: PdfInfo::default(),
        }
    }

    #[test]
    fn the_default_template_is_a_white_a4_canvas() {
        let template = load_template(None).unwrap();
        assert_eq!(template.dimensions(), DEFAULT_PAGE_SIZE);
        assert_eq!(template.get_pixel(0, 0), &image::Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn a_missing_template_is_a_resource_error() {
        let err = load_template(Some(Path::new("/nope/template.png"))).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn a_missing_local_document_fails_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path().join("absent.docx").to_str().unwrap(), dir.path());
        let err = run(&job).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
        assert!(!job.out_dir.exists());
    }

    #[test]
    fn a_share_link_without_credentials_fails_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let job = job("https://drive.google.com/file/d/abc/view", dir.path());
        let err = run(&job).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }
}
