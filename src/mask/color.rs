//! Instance color keys for multi-color masks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An RGB triple identifying one instance's paint color.
///
/// Mask definition documents key color categories by the string form
/// `"(r, g, b)"`; [`fmt::Display`] and [`FromStr`] round-trip that exact
/// format. Ordering is lexicographic over (r, g, b) so color-keyed maps
/// iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    /// Creates a new color key.
    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The background color: pixels of this color belong to no instance.
    pub const BACKGROUND: ColorKey = ColorKey { r: 0, g: 0, b: 0 };

    /// Returns true for the background color.
    #[inline]
    pub fn is_background(&self) -> bool {
        *self == Self::BACKGROUND
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Error produced when a color key string cannot be parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid color key '{0}' (expected '(r, g, b)')")]
pub struct ParseColorKeyError(pub String);

impl FromStr for ColorKey {
    type Err = ParseColorKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParseColorKeyError(s.to_string()))?;

        let mut channels = inner.split(',').map(|part| part.trim().parse::<u8>());
        let mut next = || {
            channels
                .next()
                .and_then(Result::ok)
                .ok_or_else(|| ParseColorKeyError(s.to_string()))
        };
        let (r, g, b) = (next()?, next()?, next()?);
        if inner.split(',').count() != 3 {
            return Err(ParseColorKeyError(s.to_string()));
        }
        Ok(ColorKey::new(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_definition_format() {
        assert_eq!(ColorKey::new(100, 100, 100).to_string(), "(100, 100, 100)");
    }

    #[test]
    fn parse_roundtrip() {
        let key: ColorKey = "(12, 0, 255)".parse().unwrap();
        assert_eq!(key, ColorKey::new(12, 0, 255));
        assert_eq!(key.to_string().parse::<ColorKey>().unwrap(), key);
    }

    #[test]
    fn parse_tolerates_whitespace() {
        assert_eq!(
            " ( 1,2 , 3 ) ".parse::<ColorKey>().unwrap(),
            ColorKey::new(1, 2, 3)
        );
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        assert!("(1, 2)".parse::<ColorKey>().is_err());
        assert!("(1, 2, 3, 4)".parse::<ColorKey>().is_err());
        assert!("1, 2, 3".parse::<ColorKey>().is_err());
        assert!("(1, 2, 300)".parse::<ColorKey>().is_err());
    }

    #[test]
    fn background_is_black() {
        assert!(ColorKey::new(0, 0, 0).is_background());
        assert!(!ColorKey::new(0, 0, 1).is_background());
    }
}
