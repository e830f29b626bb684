use crate::units::*;

/// A rectangle, specified by two opposite corners. Coordinates follow image
/// convention: x grows rightward, y grows downward, so `(x1, y1)` is the
/// top-left corner and `(x2, y2)` the bottom-right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the top-left corner.
    pub x1: Px,
    /// The y-coordinate of the top-left corner.
    pub y1: Px,
    /// The x-coordinate of the bottom-right corner.
    pub x2: Px,
    /// The y-coordinate of the bottom-right corner.
    pub y2: Px,
}

impl Rect {
    pub fn new(x1: Px, y1: Px, x2: Px, y2: Px) -> Rect {
        Rect { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> Px {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Px {
        self.y2 - self.y1
    }
}
