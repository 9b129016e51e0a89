//! Text measurement and glyph coverage.
//!
//! Two backends: an outline font loaded from a TrueType/OpenType file (behind
//! the `outline-fonts` feature) and a built-in 5x7 bitmap font that is always
//! available. Loading never fails hard; anything that goes wrong while loading
//! the preferred font falls back to the bitmap font with a warning.

use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::rendering::paint::Bounds;
use crate::{Error, Result};

const CELL_WIDTH: i32 = 5;
const CELL_HEIGHT: i32 = 7;
const CELL_ADVANCE: i32 = 6;
const CELL_LINE: f32 = 8.0;

/// Measured extent of a text run relative to its line-box origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    /// Horizontal pen advance of the whole run
    pub advance: i32,
    /// Box of the pixels that receive ink, `None` for blank text
    pub ink: Option<Bounds>,
}

#[derive(Clone, Default)]
pub enum Font {
    /// Built-in 5x7 font scaled by whole pixels
    #[default]
    Bitmap,
    #[cfg(feature = "outline-fonts")]
    Outline(ab_glyph::FontArc),
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Font::Bitmap => f.write_str("Font::Bitmap"),
            #[cfg(feature = "outline-fonts")]
            Font::Outline(_) => f.write_str("Font::Outline"),
        }
    }
}

impl Font {
    /// Load the preferred font, falling back to the bitmap font.
    pub fn load_or_default(path: Option<&Path>) -> Font {
        let Some(path) = path else {
            debug!("no font configured, using built-in bitmap font");
            return Font::Bitmap;
        };
        match Font::try_load(path) {
            Ok(font) => font,
            Err(e) => {
                warn!("{}; falling back to built-in bitmap font", e);
                Font::Bitmap
            }
        }
    }

    /// Load a TrueType/OpenType file (collections use their first face).
    #[cfg(feature = "outline-fonts")]
    pub fn try_load(path: &Path) -> Result<Font> {
        let data = std::fs::read(path)
            .map_err(|e| Error::FontError(format!("cannot read {}: {}", path.display(), e)))?;
        let font = ab_glyph::FontVec::try_from_vec_and_index(data, 0)
            .map_err(|e| Error::FontError(format!("cannot parse {}: {}", path.display(), e)))?;
        Ok(Font::Outline(ab_glyph::FontArc::new(font)))
    }

    #[cfg(not(feature = "outline-fonts"))]
    pub fn try_load(path: &Path) -> Result<Font> {
        Err(Error::FontError(format!(
            "cannot load {}: outline font support is not compiled in",
            path.display()
        )))
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Font::Bitmap)
    }

    pub fn measure(&self, text: &str, px: f32) -> TextMetrics {
        let mut ink: Option<Bounds> = None;
        let advance = self.for_each_glyph_box(text, px, |b| {
            ink = Some(match ink {
                Some(acc) => acc.union(&b),
                None => b,
            });
        });
        TextMetrics { advance, ink }
    }

    /// Visit every pixel receiving ink as `(x, y, coverage)` relative to the
    /// line-box origin. Coverage is in `0.0..=1.0`.
    pub fn rasterize(&self, text: &str, px: f32, mut plot: impl FnMut(i32, i32, f32)) {
        match self {
            Font::Bitmap => {
                let scale = bitmap_scale(px);
                let mut pen = 0;
                for ch in text.chars() {
                    let rows = bitmap_glyph(ch);
                    for (row, bits) in rows.iter().enumerate() {
                        for col in 0..CELL_WIDTH {
                            if bits & (1 << (CELL_WIDTH - 1 - col)) == 0 {
                                continue;
                            }
                            let x0 = pen + col * scale;
                            let y0 = row as i32 * scale;
                            for dy in 0..scale {
                                for dx in 0..scale {
                                    plot(x0 + dx, y0 + dy, 1.0);
                                }
                            }
                        }
                    }
                    pen += CELL_ADVANCE * scale;
                }
            }
            #[cfg(feature = "outline-fonts")]
            Font::Outline(font) => {
                let (glyphs, _) = outline::layout(font, text, px);
                for glyph in glyphs {
                    let b = glyph.px_bounds();
                    let (ox, oy) = (b.min.x as i32, b.min.y as i32);
                    glyph.draw(|gx, gy, c| plot(ox + gx as i32, oy + gy as i32, c));
                }
            }
        }
    }

    /// Calls `visit` with the ink box of each glyph and returns the advance.
    fn for_each_glyph_box(&self, text: &str, px: f32, mut visit: impl FnMut(Bounds)) -> i32 {
        match self {
            Font::Bitmap => {
                let scale = bitmap_scale(px);
                let mut pen = 0;
                for ch in text.chars() {
                    if let Some(cell) = glyph_ink(&bitmap_glyph(ch)) {
                        visit(Bounds::new(
                            pen + cell.x0 * scale,
                            cell.y0 * scale,
                            pen + cell.x1 * scale,
                            cell.y1 * scale,
                        ));
                    }
                    pen += CELL_ADVANCE * scale;
                }
                pen
            }
            #[cfg(feature = "outline-fonts")]
            Font::Outline(font) => {
                let (glyphs, advance) = outline::layout(font, text, px);
                for glyph in &glyphs {
                    let b = glyph.px_bounds();
                    visit(Bounds::new(
                        b.min.x as i32,
                        b.min.y as i32,
                        b.max.x as i32,
                        b.max.y as i32,
                    ));
                }
                advance.round() as i32
            }
        }
    }
}

#[cfg(feature = "outline-fonts")]
mod outline {
    use ab_glyph::{point, Font as _, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont as _};

    /// Lay out a single line with its top at y = 0; returns the outlined
    /// glyphs and the final caret position.
    pub(super) fn layout(font: &FontArc, text: &str, px: f32) -> (Vec<OutlinedGlyph>, f32) {
        let scale = PxScale::from(px);
        let scaled = font.as_scaled(scale);
        let mut caret = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::new();
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            prev = Some(id);
            if let Some(outlined) = font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }
        (glyphs, caret)
    }
}

/// Whole-pixel scale so a line of the 5x7 font is roughly `px` tall
fn bitmap_scale(px: f32) -> i32 {
    ((px / CELL_LINE).round() as i32).max(1)
}

/// Ink box of a glyph in cell units
fn glyph_ink(rows: &[u8; 7]) -> Option<Bounds> {
    let mut ink: Option<Bounds> = None;
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..CELL_WIDTH {
            if bits & (1 << (CELL_WIDTH - 1 - col)) != 0 {
                let cell = Bounds::new(col, row as i32, col + 1, row as i32 + 1);
                ink = Some(ink.map_or(cell, |b| b.union(&cell)));
            }
        }
    }
    ink
}

/// Rows of a 5x7 glyph, most significant of the low five bits is the left column.
/// Lowercase letters render as uppercase; unknown characters as `?`.
fn bitmap_glyph(ch: char) -> [u8; CELL_HEIGHT as usize] {
    match ch.to_ascii_uppercase() {
        ' ' => [0; 7],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}
