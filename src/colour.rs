use crate::error::Error;

/// An RGB colour; r, g, and b range from 0.0 to 1.0. Pages are raster images,
/// so colours always resolve to 8-bit RGBA pixels at render time.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    /// Create a new colour. r, g, and b range from 0.0 to 1.0
    pub fn new(r: f32, g: f32, b: f32) -> Colour {
        Colour { r, g, b }
    }

    /// Create a new colour. r, g, and b range from 0 to 255
    pub fn new_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse a colour from a `#rrggbb` hex string, as style configuration
    /// files express colours.
    pub fn from_hex(hex: &str) -> Result<Colour, Error> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Usage(format!(
                "invalid colour {hex:?}, expected #rrggbb"
            )));
        }
        let r = u8::from_str_radix(&digits[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&digits[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&digits[4..6], 16).unwrap_or(0);
        Ok(Colour::new_bytes(r, g, b))
    }

    /// Convert to a fully opaque 8-bit RGBA pixel
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ])
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

impl<T: Into<f32>> From<[T; 3]> for Colour {
    fn from(c: [T; 3]) -> Self {
        let [r, g, b] = c;
        Colour {
            r: r.into(),
            g: g.into(),
            b: b.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Colour = Colour {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const GREY: Colour = Colour {
        r: 0.5,
        g: 0.5,
        b: 0.5,
    };
    pub const RED: Colour = Colour {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        let c = Colour::from_hex("#ff8000").unwrap();
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 0.0).abs() < 1e-6);
        assert_eq!(Colour::from_hex("000000").unwrap(), colours::BLACK);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Colour::from_hex("#fff").is_err());
        assert!(Colour::from_hex("#zzzzzz").is_err());
        assert!(Colour::from_hex("").is_err());
    }

    #[test]
    fn converts_to_opaque_rgba() {
        assert_eq!(colours::WHITE.to_rgba(), image::Rgba([255, 255, 255, 255]));
        assert_eq!(colours::BLACK.to_rgba(), image::Rgba([0, 0, 0, 255]));
    }
}
