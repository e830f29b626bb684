use crate::error::Error;
use image::{ColorType, GenericImageView};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Date as PDate, Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, TextStr};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// PDF object references, keyed by what each object is for
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    Image(usize),
    ImageMask(usize),
    ContentForPage(usize),
}

struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    fn gen(&mut self, ref_type: RefType) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        self.refs.insert(ref_type, id);
        id
    }
}

/// Metadata stamped into the compiled document
#[derive(Debug, Clone)]
pub struct PdfInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
}

impl Default for PdfInfo {
    fn default() -> PdfInfo {
        PdfInfo {
            title: format!("Created using {}", env!("CARGO_PKG_NAME")),
            author: env!("CARGO_PKG_NAME").to_string(),
            subject: "Tabletop prototyping assets".to_string(),
        }
    }
}

struct Encoded {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

/// One page of the compiled document: a single image drawn to fill a page of
/// exactly its pixel dimensions (one pixel per point).
struct PageImage {
    width: f32,
    height: f32,
    encoding: Encoded,
}

/// Compile `images`, in order, into a single PDF written to `out`. Each
/// image becomes one page. Returns the output path.
pub fn compile(images: &[PathBuf], out: &Path, info: &PdfInfo) -> Result<PathBuf, Error> {
    if images.is_empty() {
        return Err(Error::Usage("no page images to compile".into()));
    }

    let mut refs = ObjectReferences::new();
    let catalog_id = refs.gen(RefType::Catalog);
    let page_tree_id = refs.gen(RefType::PageTree);

    let mut writer = Pdf::new();
    write_info(&mut refs, &mut writer, info);

    let page_refs: Vec<Ref> = (0..images.len())
        .map(|i| refs.gen(RefType::Page(i)))
        .collect();
    writer
        .pages(page_tree_id)
        .count(page_refs.len() as i32)
        .kids(page_refs.iter().copied());

    for (i, path) in images.iter().enumerate() {
        tracing::info!(path = %path.display(), "adding page to document");
        let page = encode_image(path)?;
        let image_ref = write_image(&mut refs, &mut writer, i, &page);
        write_page(
            &mut refs,
            &mut writer,
            i,
            page_refs[i],
            page_tree_id,
            image_ref,
            &page,
        )?;
    }

    let mut catalog = writer.catalog(catalog_id);
    catalog.pages(page_tree_id);
    catalog.finish();

    std::fs::write(out, writer.finish())?;
    tracing::info!(path = %out.display(), pages = images.len(), "compiled document");
    Ok(out.to_path_buf())
}

fn write_info(refs: &mut ObjectReferences, writer: &mut Pdf, info: &PdfInfo) {
    let id = refs.gen(RefType::Info);
    let mut obj = writer.document_info(id);
    obj.title(TextStr(info.title.as_str()));
    obj.author(TextStr(info.author.as_str()));
    obj.subject(TextStr(info.subject.as_str()));
    obj.creator(TextStr(concat!(
        env!("CARGO_PKG_NAME"),
        " v",
        env!("CARGO_PKG_VERSION")
    )));

    use chrono::prelude::*;
    let now = Local::now();
    let offset = now.offset().fix();
    let offset_hours = offset.local_minus_utc() / (60 * 60);
    let offset_minutes = ((offset.local_minus_utc() - (offset_hours * (60 * 60))) / 60).abs();
    let date = PDate::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8)
        .utc_offset_hour(offset_hours as i8)
        .utc_offset_minute(offset_minutes as u8);
    obj.creation_date(date);
}

fn encode_image(path: &Path) -> Result<PageImage, Error> {
    let data = std::fs::read(path)
        .map_err(|e| Error::Resource(format!("page image {}: {e}", path.display())))?;
    let format = image::guess_format(&data)?;
    let img = image::load_from_memory_with_format(&data, format)?;
    let width = img.width() as f32;
    let height = img.height() as f32;

    let encoding = match (format, img.color()) {
        // an RGB jpeg's bytes are already a valid DCT stream
        (image::ImageFormat::Jpeg, ColorType::Rgb8) => Encoded {
            filter: Filter::DctDecode,
            bytes: data,
            mask: None,
        },
        _ => {
            let level = CompressionLevel::DefaultLevel as u8;
            let mask = img.color().has_alpha().then(|| {
                let alphas: Vec<_> = img.pixels().map(|p| (p.2).0[3]).collect();
                compress_to_vec_zlib(&alphas, level)
            });
            let bytes = compress_to_vec_zlib(img.to_rgb8().as_raw(), level);
            Encoded {
                filter: Filter::FlateDecode,
                bytes,
                mask,
            }
        }
    };

    Ok(PageImage {
        width,
        height,
        encoding,
    })
}

fn write_image(refs: &mut ObjectReferences, writer: &mut Pdf, index: usize, page: &PageImage) -> Ref {
    let id = refs.gen(RefType::Image(index));

    let mask_id = page
        .encoding
        .mask
        .as_ref()
        .map(|_| refs.gen(RefType::ImageMask(index)));

    let mut image = writer.image_xobject(id, page.encoding.bytes.as_slice());
    image.filter(page.encoding.filter);
    image.width(page.width as i32);
    image.height(page.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    if let Some(mask_id) = &mask_id {
        image.s_mask(*mask_id);
    }
    image.finish();

    // the transparency mask rides along as its own greyscale image
    if let (Some(mask_id), Some(mask)) = (mask_id, page.encoding.mask.as_ref()) {
        let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
        s_mask.filter(Filter::FlateDecode);
        s_mask.width(page.width as i32);
        s_mask.height(page.height as i32);
        s_mask.color_space().device_gray();
        s_mask.bits_per_component(8);
    }

    id
}

#[allow(clippy::write_with_newline)]
fn write_page(
    refs: &mut ObjectReferences,
    writer: &mut Pdf,
    index: usize,
    page_ref: Ref,
    parent: Ref,
    image_ref: Ref,
    page: &PageImage,
) -> Result<(), Error> {
    let content_id = refs.gen(RefType::ContentForPage(index));

    let mut p = writer.page(page_ref);
    p.media_box(PdfRect {
        x1: 0.0,
        y1: 0.0,
        x2: page.width,
        y2: page.height,
    });
    p.parent(parent);

    let mut resources = p.resources();
    let mut xobjects = resources.x_objects();
    xobjects.pair(Name(format!("I{index}").as_bytes()), image_ref);
    xobjects.finish();
    resources.finish();

    p.contents(content_id);
    p.finish();

    let mut content: Vec<u8> = Vec::default();
    write!(&mut content, "q\n")?;
    write!(&mut content, "{} 0 0 {} 0 0 cm\n", page.width, page.height)?;
    write!(&mut content, "/I{index} Do\n")?;
    write!(&mut content, "Q\n")?;
    writer.stream(content_id, content.as_slice());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn compiles_mixed_pages_into_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128]))
            .save(&png)
            .unwrap();
        let jpg = dir.path().join("b.jpg");
        RgbImage::from_pixel(2, 2, Rgb([200, 100, 50]))
            .save(&jpg)
            .unwrap();

        let out = dir.path().join("out.pdf");
        let info = PdfInfo {
            title: "trial manual".into(),
            author: "someone".into(),
            subject: "testing".into(),
        };
        compile(&[png, jpg], &out, &info).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"trial manual"));
        assert!(contains(&bytes, b"someone"));
        assert!(contains(&bytes, b"%%EOF"));
    }

    #[test]
    fn compiling_nothing_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = compile(&[], &dir.path().join("out.pdf"), &PdfInfo::default()).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn a_missing_page_image_is_a_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = compile(
            &[dir.path().join("nope.png")],
            &dir.path().join("out.pdf"),
            &PdfInfo::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
