use crate::error::Error;
use crate::style::RunStyle;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use std::path::Path;

/// A paragraph-structured document: the immutable input of a manual job,
/// loaded once before layout begins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph: an optional style name and an ordered sequence of runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub style_name: Option<String>,
    pub runs: Vec<Run>,
}

/// A contiguous span of text sharing one set of font attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new<S: Into<String>>(text: S) -> Run {
        Run {
            text: text.into(),
            style: RunStyle::default(),
        }
    }
}

impl Document {
    /// Read a `.docx` file from disk
    pub fn load_docx(path: &Path) -> Result<Document, Error> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Resource(format!("document {}: {e}", path.display())))?;
        Document::from_docx_bytes(&bytes)
    }

    /// Parse a `.docx` document from raw bytes
    pub fn from_docx_bytes(bytes: &[u8]) -> Result<Document, Error> {
        let docx = read_docx(bytes)
            .map_err(|e| Error::Resource(format!("failed to parse document: {e:?}")))?;

        let mut paragraphs = Vec::new();
        for child in &docx.document.children {
            if let DocumentChild::Paragraph(para) = child {
                paragraphs.push(convert_paragraph(para));
            }
        }
        Ok(Document { paragraphs })
    }

    /// Total number of whitespace-separated words across all runs
    pub fn word_count(&self) -> usize {
        self.paragraphs
            .iter()
            .flat_map(|p| p.runs.iter())
            .map(|r| r.text.split_whitespace().count())
            .sum()
    }
}

fn convert_paragraph(para: &docx_rs::Paragraph) -> Paragraph {
    let style_name = para.property.style.as_ref().map(|s| s.val.clone());

    let mut runs = Vec::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            let converted = convert_run(run);
            if !converted.text.is_empty() {
                runs.push(converted);
            }
        }
    }

    Paragraph { style_name, runs }
}

fn convert_run(run: &docx_rs::Run) -> Run {
    let mut text = String::new();
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }

    // bold and italic arrive as presence-only run properties; explicit size
    // and colour are not readable through this library, so they stay unset
    // and inherit from the paragraph style
    let props = &run.run_property;
    let style = RunStyle {
        bold: if props.bold.is_some() { Some(true) } else { None },
        italic: if props.italic.is_some() {
            Some(true)
        } else {
            None
        },
        colour: None,
        size: None,
    };

    Run { text, style }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_across_runs_and_paragraphs() {
        let doc = Document {
            paragraphs: vec![
                Paragraph {
                    style_name: None,
                    runs: vec![Run::new("alpha beta"), Run::new("gamma")],
                },
                Paragraph {
                    style_name: None,
                    runs: vec![Run::new("  delta\tepsilon\n")],
                },
            ],
        };
        assert_eq!(doc.word_count(), 5);
    }

    #[test]
    fn reads_paragraphs_runs_and_flags_from_a_docx() {
        use docx_rs::{Docx, Paragraph as DocxParagraph, Run as DocxRun};

        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(DocxParagraph::new().add_run(DocxRun::new().add_text("alpha beta")))
            .add_paragraph(
                DocxParagraph::new()
                    .style("ListParagraph")
                    .add_run(DocxRun::new().add_text("bullet point").bold()),
            )
            .build()
            .pack(&mut buf)
            .unwrap();

        let doc = Document::from_docx_bytes(&buf.into_inner()).unwrap();
        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(doc.paragraphs[0].style_name, None);
        assert_eq!(doc.paragraphs[0].runs[0].text, "alpha beta");
        assert_eq!(doc.paragraphs[0].runs[0].style.bold, None);
        assert_eq!(
            doc.paragraphs[1].style_name.as_deref(),
            Some("ListParagraph")
        );
        assert_eq!(doc.paragraphs[1].runs[0].style.bold, Some(true));
        assert_eq!(doc.paragraphs[1].runs[0].style.italic, None);
    }

    #[test]
    fn unreadable_document_bytes_are_a_resource_error() {
        let err = Document::from_docx_bytes(b"not a docx").unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
