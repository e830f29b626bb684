use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, MulAssign, Sum};

/// A measurement in image pixels. All layout geometry is expressed in pixels
/// since pages are rendered to raster images rather than vector output.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Deref,
    DerefMut,
    Display,
    From,
    Into,
    MulAssign,
    Sum,
)]
pub struct Px(pub f32);

impl std::ops::Mul<f32> for Px {
    type Output = Px;

    fn mul(self, rhs: f32) -> Px {
        Px(self.0 * rhs)
    }
}

impl std::ops::Div<f32> for Px {
    type Output = Px;

    fn div(self, rhs: f32) -> Px {
        Px(self.0 / rhs)
    }
}

impl std::ops::Sub for Px {
    type Output = Px;

    fn sub(self, rhs: Px) -> Px {
        Px(self.0 - rhs.0)
    }
}

impl Px {
    /// Round up to the nearest whole pixel, clamping negatives to zero.
    /// Used when a pixel length becomes an image dimension or coordinate.
    pub fn ceil_u32(self) -> u32 {
        self.0.max(0.0).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_behaves_like_the_inner_float() {
        assert_eq!(Px(3.0) + Px(4.5), Px(7.5));
        assert_eq!(Px(10.0) - Px(4.0), Px(6.0));
        assert_eq!(Px(3.0) * 2.0, Px(6.0));
        assert_eq!(Px(9.0) / 3.0, Px(3.0));
    }

    #[test]
    fn ceil_u32_rounds_up_and_clamps() {
        assert_eq!(Px(3.2).ceil_u32(), 4);
        assert_eq!(Px(3.0).ceil_u32(), 3);
        assert_eq!(Px(-2.0).ceil_u32(), 0);
    }
}
