use crate::error::Error;
use crate::rect::Rect;
use crate::units::Px;

/// Margins describe how far the writable region of a page is inset from the
/// canvas edges. They exist as guidelines for the layout engine; nothing
/// prevents drawing outside them directly. The writable region itself is
/// obtained through [`Margins::content_box`], which is recomputed identically
/// for every new page of a run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Px,
    pub right: Px,
    pub bottom: Px,
    pub left: Px,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise
    /// fashion starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Px, right: Px, bottom: Px, left: Px) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Px>>(value: D) -> Margins {
        let value: Px = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and
    /// bottom) and horizontal (left and right) margins
    pub fn symmetric(vertical: Px, horizontal: Px) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins {
            top: Px(0.0),
            right: Px(0.0),
            bottom: Px(0.0),
            left: Px(0.0),
        }
    }

    /// Create margins as a fraction of each canvas dimension plus a fixed
    /// pixel offset, which is how manual jobs express them: horizontal
    /// margins are `width * fraction + offset`, vertical margins are
    /// `height * fraction + offset`.
    pub fn fractional(page_width: Px, page_height: Px, fraction: f32, offset: Px) -> Margins {
        Margins {
            top: page_height * fraction + offset,
            right: page_width * fraction + offset,
            bottom: page_height * fraction + offset,
            left: page_width * fraction + offset,
        }
    }

    /// The writable rectangle these margins leave on a canvas of the given
    /// size. Margins that are negative or that swallow the whole canvas are
    /// a usage error; layout must fail fast rather than place words in a
    /// degenerate box.
    pub fn content_box(&self, page_width: Px, page_height: Px) -> Result<Rect, Error> {
        if self.top.0 < 0.0 || self.right.0 < 0.0 || self.bottom.0 < 0.0 || self.left.0 < 0.0 {
            return Err(Error::Usage(format!(
                "margins must not be negative (got {:?})",
                self
            )));
        }
        let rect = Rect::new(
            self.left,
            self.top,
            page_width - self.right,
            page_height - self.bottom,
        );
        if rect.width().0 <= 0.0 || rect.height().0 <= 0.0 {
            return Err(Error::Usage(format!(
                "margins leave no writable area on a {}x{} page",
                page_width, page_height
            )));
        }
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_margins_scale_with_each_dimension() {
        let m = Margins::fractional(Px(1000.0), Px(500.0), 0.1, Px(5.0));
        assert_eq!(m.left, Px(105.0));
        assert_eq!(m.right, Px(105.0));
        assert_eq!(m.top, Px(55.0));
        assert_eq!(m.bottom, Px(55.0));
    }

    #[test]
    fn content_box_insets_from_every_edge() {
        let m = Margins::trbl(Px(10.0), Px(20.0), Px(30.0), Px(40.0));
        let b = m.content_box(Px(200.0), Px(100.0)).unwrap();
        assert_eq!(b, Rect::new(Px(40.0), Px(10.0), Px(180.0), Px(70.0)));
    }

    #[test]
    fn oversized_margins_are_rejected() {
        let m = Margins::fractional(Px(100.0), Px(100.0), 0.5, Px(1.0));
        assert!(matches!(
            m.content_box(Px(100.0), Px(100.0)),
            Err(Error::Usage(_))
        ));
    }

    #[test]
    fn negative_margins_are_rejected() {
        let m = Margins::trbl(Px(-1.0), Px(0.0), Px(0.0), Px(0.0));
        assert!(matches!(
            m.content_box(Px(100.0), Px(100.0)),
            Err(Error::Usage(_))
        ));
    }
}
