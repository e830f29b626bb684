//! Paragraph layout: positioning document text on pages.
//!
//! The engine places words left to right against a page's content box,
//! wrapping lines when a word would cross the right edge and committing the
//! page to its [PageSink](crate::PageSink) when a line would cross the
//! bottom. Placement is span-based: layout only records where each word
//! goes, and pages rasterize their spans when rendered, so the whole engine
//! can run (and be tested) against fixed metrics without any font file.
//!
//! [Margins] describe how the content box is inset from the canvas;
//! [typeset] drives a whole document through a sink and reports how many
//! pages and words it produced.

mod margins;
mod typeset;

pub use margins::*;
pub use typeset::*;
