//! Colour parsing for chart styling.  Emits SVG-ready `#rrggbb` strings.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorError {
    InvalidHexDigit,
    InvalidHexLength,
}

// --- Rgb ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
    pub const fn black() -> Self {
        Self::new(0x00, 0x00, 0x00)
    }
    pub const fn red() -> Self {
        Self::new(0xdc, 0x35, 0x45)
    }
    pub const fn green() -> Self {
        Self::new(0x28, 0xa7, 0x45)
    }
    pub const fn blue() -> Self {
        Self::new(0x00, 0x7b, 0xff)
    }
    pub const fn orange() -> Self {
        Self::new(0xd2, 0x87, 0x0a)
    }
    pub const fn grey() -> Self {
        Self::new(0xe0, 0xe0, 0xe0)
    }
    pub const fn white() -> Self {
        Self::new(0xff, 0xff, 0xff)
    }

    /// Accepts a CSS-style name (`blue`, `grey`, ...) and otherwise tries `#rrggbb`.
    ///
    /// # Errors
    /// Returns [`ColorError`] when the input is neither a known name nor a
    /// six-digit hex triplet.
    pub fn from_name(s: &str) -> Result<Self, ColorError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(Self::black()),
            "red" => Ok(Self::red()),
            "green" => Ok(Self::green()),
            "blue" => Ok(Self::blue()),
            "orange" => Ok(Self::orange()),
            "grey" | "gray" => Ok(Self::grey()),
            "white" => Ok(Self::white()),
            _ => Self::from_hex(s),
        }
    }

    /// # Errors
    /// Returns [`ColorError`] on a wrong length or a non-hex digit.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return Err(ColorError::InvalidHexLength);
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidHexDigit);
        Ok(Self::new(byte(&h[..2])?, byte(&h[2..4])?, byte(&h[4..])?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Colours used for one chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub line: Rgb,
    pub marker: Rgb,
    pub grid: Rgb,
    pub text: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            line: Rgb::blue(),
            marker: Rgb::blue(),
            grid: Rgb::grey(),
            text: Rgb::black(),
        }
    }
}

impl Theme {
    /// Same theme with line and markers in `c`.
    #[must_use]
    pub fn with_accent(mut self, c: Rgb) -> Self {
        self.line = c;
        self.marker = c;
        self
    }
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidHexDigit => f.write_str("invalid hex colour digit"),
            ColorError::InvalidHexLength => f.write_str("hex colour must be exactly 6 digits"),
        }
    }
}
impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_hex_resolve_to_same_colour() {
        assert_eq!(Rgb::from_name("Blue").unwrap(), Rgb::from_hex("#007bff").unwrap());
        assert_eq!(Rgb::from_name(" gray ").unwrap(), Rgb::grey());
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert_eq!(Rgb::from_hex("#12345"), Err(ColorError::InvalidHexLength));
        assert_eq!(Rgb::from_hex("#12345g"), Err(ColorError::InvalidHexDigit));
        assert_eq!(Rgb::from_name("chartreuse-ish"), Err(ColorError::InvalidHexLength));
    }

    #[test]
    fn displays_as_svg_hex() {
        assert_eq!(Rgb::new(0, 123, 255).to_string(), "#007bff");
        assert_eq!(Theme::default().grid.to_string(), "#e0e0e0");
    }
}
