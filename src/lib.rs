mod colour;
pub use colour::*;

/// Deck sheet tiling for Tabletop Simulator
pub mod deck;

mod document;
pub use document::*;

mod error;
pub use error::*;

/// Retrieval of share-linked documents
pub mod fetch;

mod font;
pub use font::*;

/// Utility functions and structures to lay paragraphs of text out on pages
pub mod layout;

/// The end-to-end manual pipeline: document in, page images and a PDF out
pub mod manual;

/// Random asset scatter over map backgrounds
pub mod map;

mod page;
pub use page::*;

/// Output path naming and directory scanning helpers
pub mod paths;

/// Compilation of page images into a single PDF
pub mod pdf;

mod rect;
pub use rect::*;

mod style;
pub use style::*;

mod units;
pub use units::*;
