//! Colors, palettes and the channel ranges used for range-match recoloring

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    pub fn from_pixel(p: &image::Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Self { r, g, b, a }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
                Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    fn parse_components(s: &str) -> Option<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [r, g, b] => Some(Color::rgb(*r, *g, *b)),
            [r, g, b, a] => Some(Color::rgba(*r, *g, *b, *a)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts `#RGB`, `#RRGGBB`, `#RRGGBBAA` (leading `#` optional),
    /// `r,g,b`, `r,g,b,a` and the names `white`, `black`, `transparent`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let named = match s.to_ascii_lowercase().as_str() {
            "white" => Some(Color::WHITE),
            "black" => Some(Color::BLACK),
            "transparent" => Some(Color::TRANSPARENT),
            _ => None,
        };
        let parsed = named.or_else(|| {
            if s.contains(',') {
                Color::parse_components(s)
            } else {
                Color::parse_hex(s.strip_prefix('#').unwrap_or(s))
            }
        });
        parsed.ok_or_else(|| Error::ConfigError(format!("invalid color '{}'", s)))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Canvas fill before any shape is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    /// Filled with the design's brand color; substitutable by variants
    Brand,
    /// Fixed solid color, never substituted
    Solid(Color),
    /// Fully transparent
    Transparent,
}

impl FromStr for Background {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brand" => Ok(Background::Brand),
            "transparent" | "none" => Ok(Background::Transparent),
            _ => s.parse().map(Background::Solid),
        }
    }
}

impl TryFrom<String> for Background {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Background> for String {
    fn from(b: Background) -> Self {
        match b {
            Background::Brand => "brand".to_string(),
            Background::Solid(c) => c.to_hex(),
            Background::Transparent => "transparent".to_string(),
        }
    }
}

/// Inclusive per-channel ranges; alpha is ignored when matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub r: RangeInclusive<u8>,
    pub g: RangeInclusive<u8>,
    pub b: RangeInclusive<u8>,
}

impl ColorRange {
    /// Box of `tolerance` around a color, clamped to the channel limits
    pub fn around(c: Color, tolerance: u8) -> Self {
        let span = |v: u8| v.saturating_sub(tolerance)..=v.saturating_add(tolerance);
        Self {
            r: span(c.r),
            g: span(c.g),
            b: span(c.b),
        }
    }

    pub fn contains(&self, c: Color) -> bool {
        self.r.contains(&c.r) && self.g.contains(&c.g) && self.b.contains(&c.b)
    }
}

impl Default for ColorRange {
    /// The blue used by the weight-plate icon, with room for antialiasing.
    fn default() -> Self {
        Self {
            r: 30..=60,
            g: 80..=120,
            b: 240..=255,
        }
    }
}

impl FromStr for ColorRange {
    type Err = Error;

    /// Parses `r0-r1,g0-g1,b0-b1`; a single value means an exact match.
    fn from_str(s: &str) -> Result<Self> {
        let err = || Error::ConfigError(format!("invalid color range '{}', expected r0-r1,g0-g1,b0-b1", s));
        let channel = |part: &str| -> Result<RangeInclusive<u8>> {
            let (lo, hi) = part.split_once('-').unwrap_or((part, part));
            let lo = lo.trim().parse::<u8>().map_err(|_| err())?;
            let hi = hi.trim().parse::<u8>().map_err(|_| err())?;
            if lo > hi {
                return Err(err());
            }
            Ok(lo..=hi)
        };
        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [r, g, b] => Ok(Self {
                r: channel(r)?,
                g: channel(g)?,
                b: channel(b)?,
            }),
            _ => Err(err()),
        }
    }
}

/// A named variant color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Color,
}

/// Ordered mapping from variant name to color
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces an existing entry of the same name
    pub fn with(mut self, name: &str, color: Color) -> Self {
        self.insert(name, color);
        self
    }

    pub fn insert(&mut self, name: &str, color: Color) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => e.color = color,
            None => self.entries.push(PaletteEntry {
                name: name.to_string(),
                color,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<Color> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.color)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Material Design accents used for the dumbbell icon family
    pub fn material() -> Self {
        Palette::new()
            .with("red", Color::rgb(0xD3, 0x2F, 0x2F))
            .with("green", Color::rgb(0x38, 0x8E, 0x3C))
            .with("orange", Color::rgb(0xF5, 0x7C, 0x00))
            .with("purple", Color::rgb(0x7B, 0x1F, 0xA2))
            .with("dark", Color::rgb(0x21, 0x21, 0x21))
    }

    /// Bootstrap accents used for the weight-plate icon family
    pub fn bootstrap() -> Self {
        Palette::new()
            .with("red", Color::rgb(220, 53, 69))
            .with("green", Color::rgb(40, 167, 69))
            .with("orange", Color::rgb(253, 126, 20))
            .with("purple", Color::rgb(111, 66, 193))
            .with("dark", Color::rgb(52, 58, 64))
    }

    /// Look up a built-in palette by name; `none` yields an empty palette
    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            "material" => Ok(Self::material()),
            "bootstrap" => Ok(Self::bootstrap()),
            "none" => Ok(Self::new()),
            other => Err(Error::ConfigError(format!("unknown palette '{}'", other))),
        }
    }

    /// Variant names end up in file names: non-empty, unique, `[a-z0-9_-]`.
    pub fn validate(&self) -> Result<()> {
        for (i, e) in self.entries.iter().enumerate() {
            let valid = !e.name.is_empty()
                && e.name
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
            if !valid {
                return Err(Error::ConfigError(format!("invalid variant name '{}'", e.name)));
            }
            if self.entries[..i].iter().any(|prev| prev.name == e.name) {
                return Err(Error::ConfigError(format!("duplicate variant name '{}'", e.name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!("#1976D2".parse::<Color>().unwrap(), Color::rgb(25, 118, 210));
        assert_eq!("1976d2".parse::<Color>().unwrap(), Color::rgb(25, 118, 210));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("white".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#14141900".parse::<Color>().unwrap(), Color::rgba(20, 20, 25, 0));
        assert_eq!("220, 53, 69".parse::<Color>().unwrap(), Color::rgb(220, 53, 69));
        assert!("#12345".parse::<Color>().is_err());
        assert!("300,0,0".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn hex_output_drops_opaque_alpha() {
        assert_eq!(Color::rgb(25, 118, 210).to_hex(), "#1976D2");
        assert_eq!(Color::rgba(20, 20, 25, 200).to_hex(), "#141419C8");
    }

    #[test]
    fn background_parsing() {
        assert_eq!("brand".parse::<Background>().unwrap(), Background::Brand);
        assert_eq!("transparent".parse::<Background>().unwrap(), Background::Transparent);
        assert_eq!(
            "black".parse::<Background>().unwrap(),
            Background::Solid(Color::BLACK)
        );
    }

    #[test]
    fn default_range_matches_plate_blue_inclusively() {
        let range = ColorRange::default();
        assert!(range.contains(Color::rgb(41, 98, 255)));
        assert!(range.contains(Color::rgb(30, 80, 240)));
        assert!(!range.contains(Color::rgb(50, 50, 60)));
        assert!(!range.contains(Color::WHITE));
    }

    #[test]
    fn range_parsing() {
        let r: ColorRange = "30-60,80-120,240-255".parse().unwrap();
        assert_eq!(r, ColorRange::default());
        let exact: ColorRange = "0,0,0".parse().unwrap();
        assert!(exact.contains(Color::BLACK));
        assert!(!exact.contains(Color::rgb(0, 0, 1)));
        assert!("60-30,0,0".parse::<ColorRange>().is_err());
        assert!("1-2,3-4".parse::<ColorRange>().is_err());
    }

    #[test]
    fn range_around_saturates() {
        let r = ColorRange::around(Color::rgb(250, 3, 128), 10);
        assert_eq!(r.r, 240..=255);
        assert_eq!(r.g, 0..=13);
        assert_eq!(r.b, 118..=138);
    }

    #[test]
    fn palette_preserves_order_and_validates() {
        let p = Palette::bootstrap();
        let names: Vec<_> = p.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["red", "green", "orange", "purple", "dark"]);
        assert_eq!(p.get("red"), Some(Color::rgb(220, 53, 69)));
        assert!(p.validate().is_ok());

        assert!(Palette::new().with("Bad Name", Color::BLACK).validate().is_err());
        assert!(Palette::new().with("", Color::BLACK).validate().is_err());
    }

    #[test]
    fn palette_insert_replaces_existing() {
        let mut p = Palette::new().with("red", Color::BLACK);
        p.insert("red", Color::WHITE);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("red"), Some(Color::WHITE));
    }

    #[test]
    fn palette_serializes_as_list() {
        let p = Palette::new().with("red", Color::rgb(220, 53, 69));
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r##"[{"name":"red","color":"#DC3545"}]"##);
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn builtin_palettes() {
        assert_eq!(Palette::builtin("material").unwrap().len(), 5);
        assert!(Palette::builtin("none").unwrap().is_empty());
        assert!(Palette::builtin("neon").is_err());
    }
}
