//! Rendering: canvas, design layouts, rasterization and PNG encoding

pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use sha2::{Digest, Sha256};

use crate::color::{Background, Color};
use crate::{Error, Result};
use paint::Role;

/// Square pixel grid being composed, plus the role of every pixel.
///
/// Canvases decoded from PNG files carry no role map.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    roles: Option<Vec<Role>>,
}

impl Canvas {
    /// Allocate a `size x size` canvas filled with `background`. `brand` is the
    /// fill used for [`Background::Brand`].
    pub fn new(size: u32, background: Background, brand: Color) -> Result<Self> {
        if size == 0 {
            return Err(Error::ConfigError("canvas size must be positive".into()));
        }
        let (fill, role) = match background {
            Background::Brand => (brand, Role::Brand),
            Background::Solid(c) => (c, Role::Fixed),
            Background::Transparent => (Color::TRANSPARENT, Role::Empty),
        };
        let len = (size as usize) * (size as usize);
        Ok(Self {
            pixels: RgbaImage::from_pixel(size, size, fill.to_pixel()),
            roles: Some(vec![role; len]),
        })
    }

    /// Wrap an existing image; it has no role map.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels, roles: None }
    }

    pub fn from_png(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(data, ImageFormat::Png)?;
        Ok(Self::from_image(img.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn has_roles(&self) -> bool {
        self.roles.is_some()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// # Panics
    /// If `(x, y)` is outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        Color::from_pixel(self.pixels.get_pixel(x, y))
    }

    pub fn role(&self, x: u32, y: u32) -> Option<Role> {
        let idx = self.index(x, y);
        self.roles.as_ref().map(|r| r[idx])
    }

    /// Source-over blend of `color` scaled by `coverage`; the pixel takes
    /// `role` when anything visible was painted. Out-of-canvas writes are
    /// ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32, role: Role) {
        if !self.contains(x, y) || coverage <= 0.0 {
            return;
        }
        let (ux, uy) = (x as u32, y as u32);
        let src_a = (color.a as f32 / 255.0) * coverage.min(1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.pixel(ux, uy);
        let out = if src_a >= 1.0 {
            color
        } else {
            let dst_a = dst.a as f32 / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            let mix = |s: u8, d: u8| {
                ((s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a).round() as u8
            };
            Color::rgba(
                mix(color.r, dst.r),
                mix(color.g, dst.g),
                mix(color.b, dst.b),
                (out_a * 255.0).round() as u8,
            )
        };
        self.pixels.put_pixel(ux, uy, out.to_pixel());
        let idx = self.index(ux, uy);
        if let Some(roles) = self.roles.as_mut() {
            roles[idx] = role;
        }
    }

    /// Replace the RGB channels of a pixel, keeping alpha and role.
    pub fn substitute(&mut self, x: u32, y: u32, color: Color) {
        let p = self.pixels.get_pixel_mut(x, y);
        p.0[0] = color.r;
        p.0[1] = color.g;
        p.0[2] = color.b;
    }

    pub fn is_opaque(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 255)
    }

    /// Encode as PNG: RGB when every pixel is opaque, RGBA otherwise.
    pub fn encode_png(&self) -> Result<EncodedIcon> {
        let img = if self.is_opaque() {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(self.pixels.clone()).to_rgb8())
        } else {
            DynamicImage::ImageRgba8(self.pixels.clone())
        };
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)?;
        Ok(EncodedIcon {
            width: self.width(),
            height: self.height(),
            png_data: buf.into_inner(),
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width() as usize + x as usize
    }
}

/// A canvas after PNG encoding
#[derive(Debug, Clone)]
pub struct EncodedIcon {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl EncodedIcon {
    /// Hex SHA-256 of the PNG bytes
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_filled_and_tagged() {
        let brand = Color::rgb(25, 118, 210);
        let c = Canvas::new(8, Background::Brand, brand).unwrap();
        assert_eq!((c.width(), c.height()), (8, 8));
        assert_eq!(c.pixel(0, 0), brand);
        assert_eq!(c.role(7, 7), Some(Role::Brand));

        let t = Canvas::new(4, Background::Transparent, brand).unwrap();
        assert_eq!(t.pixel(3, 0), Color::TRANSPARENT);
        assert_eq!(t.role(3, 0), Some(Role::Empty));
        assert!(Canvas::new(0, Background::Transparent, brand).is_err());
    }

    #[test]
    fn blend_half_alpha_over_opaque() {
        let mut c = Canvas::new(2, Background::Solid(Color::BLACK), Color::BLACK).unwrap();
        c.blend(0, 0, Color::WHITE.with_alpha(128), 1.0, Role::Fixed);
        let p = c.pixel(0, 0);
        assert_eq!(p.a, 255);
        assert!((127..=129).contains(&p.r));
        c.blend(5, 5, Color::WHITE, 1.0, Role::Fixed);
        assert_eq!(c.pixel(1, 1), Color::BLACK);
    }

    #[test]
    fn blend_over_transparent_keeps_source() {
        let mut c = Canvas::new(2, Background::Transparent, Color::BLACK).unwrap();
        c.blend(1, 1, Color::rgba(20, 20, 25, 200), 1.0, Role::Fixed);
        assert_eq!(c.pixel(1, 1), Color::rgba(20, 20, 25, 200));
        assert_eq!(c.role(1, 1), Some(Role::Fixed));
    }

    #[test]
    fn opaque_canvas_encodes_as_rgb_png() {
        let c = Canvas::new(4, Background::Solid(Color::WHITE), Color::BLACK).unwrap();
        let png = c.encode_png().unwrap();
        assert_eq!(&png.png_data[0..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png.png_data).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!(png.digest().len(), 64);
    }

    #[test]
    fn transparent_canvas_roundtrips_without_roles() {
        let c = Canvas::new(4, Background::Transparent, Color::BLACK).unwrap();
        let png = c.encode_png().unwrap();
        let back = Canvas::from_png(&png.png_data).unwrap();
        assert!(!back.has_roles());
        assert_eq!(back.pixel(0, 0), Color::TRANSPARENT);
        assert_eq!(back.role(0, 0), None);
    }
}
