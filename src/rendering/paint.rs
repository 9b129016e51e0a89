/// Paint commands: the shape descriptors a layout produces and the rasterizer consumes

use std::fmt;

use crate::color::Color;
use crate::rendering::text::Font;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Bounds {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }

    pub fn union(&self, other: &Bounds) -> Self {
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Every covered pixel coordinate lies in `[0, size)`
    pub fn within(&self, size: u32) -> bool {
        let size = size as i64;
        self.x0 >= 0 && self.y0 >= 0 && (self.x1 as i64) <= size && (self.y1 as i64) <= size
    }

    /// Center of the box in pixel-edge coordinates
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x0 + self.x1) as f32 / 2.0,
            (self.y0 + self.y1) as f32 / 2.0,
        )
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})x[{}, {})", self.x0, self.x1, self.y0, self.y1)
    }
}

/// What a painted pixel belongs to. `Brand` pixels are the ones palette
/// variants substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Nothing painted yet (transparent background)
    Empty,
    Brand,
    Fixed,
}

#[derive(Debug, Clone)]
pub enum Primitive {
    /// Rectangle with circular corners; `radius` is clamped to half the short side
    RoundedRect { bounds: Bounds, radius: i32 },
    /// Axis-aligned ellipse; coordinates are pixel-edge based, so pixel `(x, y)`
    /// is sampled at `(x + 0.5, y + 0.5)`
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    /// Text run whose line box starts at `(x, y)`
    Text {
        x: i32,
        y: i32,
        text: String,
        font: Font,
        px: f32,
    },
}

impl Primitive {
    pub fn circle(cx: f32, cy: f32, r: f32) -> Self {
        Primitive::Ellipse { cx, cy, rx: r, ry: r }
    }

    /// Pixel box that can receive paint; `None` for text without ink
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Primitive::RoundedRect { bounds, .. } => Some(*bounds),
            Primitive::Ellipse { cx, cy, rx, ry } => Some(Bounds::new(
                (cx - rx).floor() as i32,
                (cy - ry).floor() as i32,
                (cx + rx).ceil() as i32,
                (cy + ry).ceil() as i32,
            )),
            Primitive::Text { x, y, text, font, px } => font
                .measure(text, *px)
                .ink
                .map(|ink| ink.translate(*x, *y)),
        }
    }
}

/// One shape descriptor: what to draw, in which color, tagged with its role
#[derive(Debug, Clone)]
pub struct PaintCommand {
    pub name: &'static str,
    pub primitive: Primitive,
    pub fill: Color,
    pub role: Role,
}

impl PaintCommand {
    pub fn new(name: &'static str, primitive: Primitive, fill: Color, role: Role) -> Self {
        Self {
            name,
            primitive,
            fill,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_within_canvas() {
        assert!(Bounds::new(0, 0, 1024, 1024).within(1024));
        assert!(!Bounds::new(-1, 0, 10, 10).within(1024));
        assert!(!Bounds::new(0, 0, 1025, 10).within(1024));
        assert!(Bounds::from_size(10, 10, 5, 5).within(16));
    }

    #[test]
    fn ellipse_bounds_cover_radius() {
        let b = Primitive::circle(512.0, 512.0, 491.0).bounds().unwrap();
        assert_eq!(b, Bounds::new(21, 21, 1003, 1003));
        let b = Primitive::circle(10.5, 10.5, 2.0).bounds().unwrap();
        assert_eq!(b, Bounds::new(8, 8, 13, 13));
    }

    #[test]
    fn union_and_translate() {
        let a = Bounds::new(0, 0, 2, 2);
        let b = Bounds::new(5, -1, 6, 1);
        assert_eq!(a.union(&b), Bounds::new(0, -1, 6, 2));
        assert_eq!(a.translate(3, 4), Bounds::new(3, 4, 5, 6));
        assert_eq!(a.center(), (1.0, 1.0));
        assert!(Bounds::new(3, 3, 3, 9).is_empty());
    }

    #[test]
    fn paint_command_keeps_role() {
        let cmd = PaintCommand::new(
            "bar",
            Primitive::RoundedRect {
                bounds: Bounds::from_size(0, 0, 10, 10),
                radius: 2,
            },
            Color::WHITE,
            Role::Fixed,
        );
        match cmd.primitive {
            Primitive::RoundedRect { bounds, .. } => assert_eq!(bounds.width(), 10),
            _ => panic!("unexpected"),
        }
        assert_eq!(cmd.role, Role::Fixed);
    }
}
