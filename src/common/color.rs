//! RGB colors as written in DrawingML `a:srgbClr` elements.

use std::fmt;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    /// Create a new RGB color.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slidecraft::common::RGBColor;
    ///
    /// let color = RGBColor::new(50, 50, 50);
    /// assert_eq!(color.to_hex(), "323232");
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex string such as `"FF0000"` or `"#ff0000"`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Uppercase six-digit hex form used by `a:srgbClr/@val`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = RGBColor::from_hex("#4b0082").unwrap();
        assert_eq!(c, RGBColor::new(75, 0, 130));
        assert_eq!(c.to_hex(), "4B0082");
        assert_eq!(c.to_string(), "4B0082");
    }

    #[test]
    fn test_invalid_hex() {
        assert!(RGBColor::from_hex("12345").is_none());
        assert!(RGBColor::from_hex("GG0000").is_none());
    }
}
