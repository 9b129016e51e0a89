/// Rasterizer: fills paint commands onto a canvas in order (later commands occlude earlier ones)

use log::trace;

use crate::rendering::paint::{Bounds, PaintCommand, Primitive};
use crate::rendering::Canvas;

pub fn rasterize(canvas: &mut Canvas, commands: &[PaintCommand]) {
    for cmd in commands {
        paint(canvas, cmd);
    }
}

pub fn paint(canvas: &mut Canvas, cmd: &PaintCommand) {
    trace!("painting {} ({:?})", cmd.name, cmd.role);
    match &cmd.primitive {
        Primitive::RoundedRect { bounds, radius } => {
            if bounds.is_empty() {
                return;
            }
            let r = (*radius).clamp(0, bounds.width().min(bounds.height()) / 2) as f32;
            let (ix0, iy0) = (bounds.x0 as f32 + r, bounds.y0 as f32 + r);
            let (ix1, iy1) = (bounds.x1 as f32 - r, bounds.y1 as f32 - r);
            fill_where(canvas, bounds, cmd, |px, py| {
                let dx = px - px.clamp(ix0, ix1);
                let dy = py - py.clamp(iy0, iy1);
                dx * dx + dy * dy <= r * r
            });
        }
        Primitive::Ellipse { cx, cy, rx, ry } => {
            if *rx <= 0.0 || *ry <= 0.0 {
                return;
            }
            let Some(bounds) = cmd.primitive.bounds() else {
                return;
            };
            fill_where(canvas, &bounds, cmd, |px, py| {
                let nx = (px - cx) / rx;
                let ny = (py - cy) / ry;
                nx * nx + ny * ny <= 1.0
            });
        }
        Primitive::Text { x, y, text, font, px } => {
            font.rasterize(text, *px, |dx, dy, coverage| {
                canvas.blend(x + dx, y + dy, cmd.fill, coverage, cmd.role);
            });
        }
    }
}

/// Fill every pixel of `bounds` whose center satisfies `inside`.
fn fill_where(canvas: &mut Canvas, bounds: &Bounds, cmd: &PaintCommand, inside: impl Fn(f32, f32) -> bool) {
    let x0 = bounds.x0.max(0);
    let y0 = bounds.y0.max(0);
    let x1 = bounds.x1.min(canvas.width() as i32);
    let y1 = bounds.y1.min(canvas.height() as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            if inside(x as f32 + 0.5, y as f32 + 0.5) {
                canvas.blend(x, y, cmd.fill, 1.0, cmd.role);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Background, Color};
    use crate::rendering::paint::Role;
    use crate::rendering::text::Font;

    fn blank(size: u32) -> Canvas {
        Canvas::new(size, Background::Solid(Color::BLACK), Color::BLACK).unwrap()
    }

    fn count_white(c: &Canvas) -> usize {
        c.image().pixels().filter(|p| p.0 == [255, 255, 255, 255]).count()
    }

    #[test]
    fn square_rect_fills_exact_area() {
        let mut c = blank(16);
        let cmd = PaintCommand::new(
            "rect",
            Primitive::RoundedRect { bounds: Bounds::new(2, 3, 12, 7), radius: 0 },
            Color::WHITE,
            Role::Fixed,
        );
        paint(&mut c, &cmd);
        assert_eq!(count_white(&c), 40);
        assert_eq!(c.pixel(2, 3), Color::WHITE);
        assert_eq!(c.pixel(11, 6), Color::WHITE);
        assert_eq!(c.pixel(12, 6), Color::BLACK);
        assert_eq!(c.role(2, 3), Some(Role::Fixed));
    }

    #[test]
    fn rounded_rect_clips_corners() {
        let mut c = blank(32);
        let cmd = PaintCommand::new(
            "rounded",
            Primitive::RoundedRect { bounds: Bounds::new(0, 0, 20, 20), radius: 8 },
            Color::WHITE,
            Role::Fixed,
        );
        paint(&mut c, &cmd);
        assert_eq!(c.pixel(0, 0), Color::BLACK);
        assert_eq!(c.pixel(19, 19), Color::BLACK);
        assert_eq!(c.pixel(10, 0), Color::WHITE);
        assert_eq!(c.pixel(10, 10), Color::WHITE);
        assert!(count_white(&c) < 400);
    }

    #[test]
    fn circle_is_symmetric() {
        let mut c = blank(20);
        let cmd = PaintCommand::new("dot", Primitive::circle(10.0, 10.0, 5.0), Color::WHITE, Role::Brand);
        paint(&mut c, &cmd);
        assert_eq!(c.pixel(10, 10), Color::WHITE);
        assert_eq!(c.pixel(5, 10), Color::WHITE);
        assert_eq!(c.pixel(14, 10), Color::WHITE);
        assert_eq!(c.pixel(4, 10), Color::BLACK);
        assert_eq!(c.pixel(15, 10), Color::BLACK);
        assert_eq!(c.role(10, 10), Some(Role::Brand));
    }

    #[test]
    fn inverted_rect_paints_nothing() {
        let mut c = blank(16);
        let cmd = PaintCommand::new(
            "inverted",
            Primitive::RoundedRect { bounds: Bounds::from_size(10, 4, -6, 8), radius: 3 },
            Color::WHITE,
            Role::Fixed,
        );
        paint(&mut c, &cmd);
        assert_eq!(count_white(&c), 0);
    }

    #[test]
    fn later_commands_occlude_earlier_ones() {
        let mut c = blank(10);
        let red = Color::rgb(255, 0, 0);
        let cmds = vec![
            PaintCommand::new(
                "under",
                Primitive::RoundedRect { bounds: Bounds::new(0, 0, 10, 10), radius: 0 },
                red,
                Role::Brand,
            ),
            PaintCommand::new(
                "over",
                Primitive::RoundedRect { bounds: Bounds::new(0, 0, 5, 10), radius: 0 },
                Color::WHITE,
                Role::Fixed,
            ),
        ];
        rasterize(&mut c, &cmds);
        assert_eq!(c.pixel(0, 0), Color::WHITE);
        assert_eq!(c.role(0, 0), Some(Role::Fixed));
        assert_eq!(c.pixel(9, 0), red);
        assert_eq!(c.role(9, 0), Some(Role::Brand));
    }

    #[test]
    fn text_lands_at_measured_bounds() {
        let mut c = blank(64);
        let prim = Primitive::Text {
            x: 4,
            y: 6,
            text: "LBS".into(),
            font: Font::Bitmap,
            px: 8.0,
        };
        let expected = prim.bounds().unwrap();
        paint(&mut c, &PaintCommand::new("label", prim, Color::WHITE, Role::Fixed));
        let mut seen: Option<Bounds> = None;
        for (x, y, p) in c.image().enumerate_pixels() {
            if p.0 == [255, 255, 255, 255] {
                let b = Bounds::new(x as i32, y as i32, x as i32 + 1, y as i32 + 1);
                seen = Some(seen.map_or(b, |s| s.union(&b)));
            }
        }
        assert_eq!(seen, Some(expected));
    }
}
