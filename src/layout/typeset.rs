use crate::document::Document;
use crate::error::Error;
use crate::font::TextMeasurer;
use crate::page::{PageSink, SpanFont, SpanLayout};
use crate::style::StyleSheet;

/// The glyph drawn before the first word of a list paragraph
const BULLET: &str = "\u{2022}";

/// What a finished layout run produced
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayoutStats {
    pub pages: usize,
    pub words: usize,
}

/// The next action for the word currently being placed
enum Step {
    Place,
    Wrap,
    NewPage,
}

/// Lay out every paragraph of `document` onto pages supplied by `sink`,
/// committing each page as it fills and the final partial page at the end.
///
/// Words are placed left to right from the content box's top-left corner.
/// A word whose right edge would cross the box wraps to the next line
/// (advancing by the run's font size plus the style's line spacing) and is
/// retried; a word whose bottom edge would cross the box commits the page,
/// starts a fresh one, and is retried. Both retries are single-shot: a word
/// that cannot fit on a fresh line of a fresh page is a
/// [LayoutOverflow](Error::LayoutOverflow) error rather than an endless
/// retry. List paragraphs draw a bullet first and indent only their first
/// line; wrapped lines and fresh pages always start at the box's left edge.
pub fn typeset<M: TextMeasurer, S: PageSink>(
    document: &Document,
    styles: &StyleSheet,
    measurer: &M,
    sink: &mut S,
) -> Result<LayoutStats, Error> {
    let mut page = sink.fresh_page()?;
    let bbox = page.content_box;
    let mut x = bbox.x1;
    let mut y = bbox.y1;
    // no word has been placed on the current line yet; a horizontal
    // overflow in this state means the word alone is wider than the box
    let mut fresh_line = true;
    let mut words_placed = 0usize;

    tracing::debug!(paragraphs = document.paragraphs.len(), "laying out document");

    for paragraph in &document.paragraphs {
        let style = styles.resolve(paragraph.style_name.as_deref());

        if style.list {
            // keep the bullet attached to its first word: if this line can
            // no longer fit vertically, break the page before drawing it
            if (y + style.size).0 > bbox.y2.0 {
                sink.commit_page(page)?;
                page = sink.fresh_page()?;
                x = bbox.x1;
                y = bbox.y1;
            }
            let font = SpanFont {
                id: style.fonts.regular,
                size: style.size,
            };
            let bullet_width = measurer.text_width(font.id, font.size, BULLET);
            let space_width = measurer.text_width(font.id, font.size, " ");
            page.add_span(SpanLayout {
                text: BULLET.into(),
                font,
                colour: style.colour,
                coords: (x, y),
            });
            x += bullet_width + space_width;
            fresh_line = false;
        }

        let mut last_size = style.size;
        for run in &paragraph.runs {
            let (font_id, size, colour) = style.resolve_run(&run.style);
            last_size = size;
            let space_width = measurer.text_width(font_id, size, " ");

            for word in run.text.split_whitespace() {
                let word_width = measurer.text_width(font_id, size, word);
                let mut paged = false;
                let mut step = Step::Place;

                loop {
                    match step {
                        Step::Place => {
                            if (x + word_width).0 > bbox.x2.0 {
                                if fresh_line {
                                    return Err(Error::LayoutOverflow { word: word.into() });
                                }
                                step = Step::Wrap;
                            } else if (y + size).0 > bbox.y2.0 {
                                if paged {
                                    return Err(Error::LayoutOverflow { word: word.into() });
                                }
                                step = Step::NewPage;
                            } else {
                                page.add_span(SpanLayout {
                                    text: word.into(),
                                    font: SpanFont { id: font_id, size },
                                    colour,
                                    coords: (x, y),
                                });
                                x += word_width + space_width;
                                fresh_line = false;
                                words_placed += 1;
                                break;
                            }
                        }
                        Step::Wrap => {
                            x = bbox.x1;
                            y += size + style.spacing;
                            fresh_line = true;
                            step = Step::Place;
                        }
                        Step::NewPage => {
                            sink.commit_page(page)?;
                            page = sink.fresh_page()?;
                            x = bbox.x1;
                            y = bbox.y1;
                            fresh_line = true;
                            paged = true;
                            step = Step::Place;
                        }
                    }
                }
            }
        }

        // paragraph finished: move to a new line for the next one
        y += last_size + style.spacing;
        x = bbox.x1;
        fresh_line = true;
    }

    sink.commit_page(page)?;

    let stats = LayoutStats {
        pages: sink.committed(),
        words: words_placed,
    };
    tracing::debug!(pages = stats.pages, words = stats.words, "layout finished");
    Ok(stats)
}
