/// Design layouts: turn proportional constants into paint commands
///
/// All lengths are fractions of the canvas size. The defaults reproduce the
/// original 1024 px artwork exactly at that size and scale with it otherwise.

use std::f32::consts::TAU;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::Design;
use crate::rendering::paint::{Bounds, PaintCommand, Primitive, Role};
use crate::rendering::text::Font;
use crate::{Error, Result};

/// Most grip holes a plate may have
pub const MAX_GRIPS: u32 = 64;
/// Longest label or unit text, in characters
pub const MAX_TEXT_CHARS: usize = 16;

fn check_fraction(design: &str, field: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "{} {} must be a fraction of the canvas in 0..=1, got {}",
            design, field, value
        )))
    }
}

/// Dumbbell with rounded plates and brand-colored accent holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumbbellLayout {
    pub bar_width: f32,
    pub bar_height: f32,
    pub bar_radius: f32,
    pub plate_width: f32,
    pub plate_height: f32,
    pub plate_radius: f32,
    /// How far each plate reaches over the bar end
    pub plate_overlap: f32,
    pub accent_radius: f32,
    /// Accent circle offsets from the left edge of their plate
    pub left_accent_inset: f32,
    pub right_accent_inset: f32,
    pub foreground: Color,
}

impl Default for DumbbellLayout {
    fn default() -> Self {
        Self {
            bar_width: 400.0 / 1024.0,
            bar_height: 60.0 / 1024.0,
            bar_radius: 20.0 / 1024.0,
            plate_width: 140.0 / 1024.0,
            plate_height: 200.0 / 1024.0,
            plate_radius: 15.0 / 1024.0,
            plate_overlap: 20.0 / 1024.0,
            accent_radius: 25.0 / 1024.0,
            left_accent_inset: 35.0 / 1024.0,
            right_accent_inset: 80.0 / 1024.0,
            foreground: Color::WHITE,
        }
    }
}

impl DumbbellLayout {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("bar_width", self.bar_width),
            ("bar_height", self.bar_height),
            ("bar_radius", self.bar_radius),
            ("plate_width", self.plate_width),
            ("plate_height", self.plate_height),
            ("plate_radius", self.plate_radius),
            ("plate_overlap", self.plate_overlap),
            ("accent_radius", self.accent_radius),
            ("left_accent_inset", self.left_accent_inset),
            ("right_accent_inset", self.right_accent_inset),
        ] {
            check_fraction("dumbbell", field, value)?;
        }
        Ok(())
    }
}

/// Flat dumbbell: pill-shaped bar with weights flush against its ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimalDumbbellLayout {
    pub bar_width: f32,
    pub bar_height: f32,
    pub weight_width: f32,
    pub weight_height: f32,
    pub weight_radius: f32,
    pub foreground: Color,
}

impl Default for MinimalDumbbellLayout {
    fn default() -> Self {
        Self {
            bar_width: 0.5,
            bar_height: 0.08,
            weight_width: 0.15,
            weight_height: 0.35,
            weight_radius: 0.02,
            foreground: Color::WHITE,
        }
    }
}

impl MinimalDumbbellLayout {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("bar_width", self.bar_width),
            ("bar_height", self.bar_height),
            ("weight_width", self.weight_width),
            ("weight_height", self.weight_height),
            ("weight_radius", self.weight_radius),
        ] {
            check_fraction("minimal-dumbbell", field, value)?;
        }
        Ok(())
    }
}

/// Weight plate seen face-on, with a stamped label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateLayout {
    pub outer_radius: f32,
    pub plate_radius: f32,
    pub rim_radius: f32,
    pub hole_radius: f32,
    pub highlight_radius: f32,
    pub grip_count: u32,
    pub grip_radius: f32,
    pub grip_distance: f32,
    pub label: String,
    pub label_size: f32,
    /// Upward shift of the label from dead center
    pub label_bias: f32,
    pub shadow_offset: f32,
    pub unit: String,
    pub unit_size: f32,
    /// Distance from the center down to the top of the unit text
    pub unit_offset: f32,
    pub plate_color: Color,
    pub rim_color: Color,
    pub hole_color: Color,
    pub highlight_color: Color,
    pub grip_color: Color,
    pub shadow_color: Color,
    pub label_color: Color,
    pub unit_color: Color,
}

impl Default for PlateLayout {
    fn default() -> Self {
        Self {
            outer_radius: 0.48,
            plate_radius: 0.42,
            rim_radius: 0.38,
            hole_radius: 0.15,
            highlight_radius: 0.12,
            grip_count: 8,
            grip_radius: 0.02,
            grip_distance: 0.35,
            label: "45".to_string(),
            label_size: 0.15,
            label_bias: 0.02,
            shadow_offset: 0.005,
            unit: "LBS".to_string(),
            unit_size: 0.06,
            unit_offset: 0.08,
            plate_color: Color::rgb(50, 50, 60),
            rim_color: Color::rgb(70, 70, 80),
            hole_color: Color::rgb(30, 30, 35),
            highlight_color: Color::rgb(40, 40, 45),
            grip_color: Color::rgb(40, 40, 45),
            shadow_color: Color::rgba(20, 20, 25, 200),
            label_color: Color::rgb(200, 200, 210),
            unit_color: Color::rgb(160, 160, 170),
        }
    }
}

impl PlateLayout {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("outer_radius", self.outer_radius),
            ("plate_radius", self.plate_radius),
            ("rim_radius", self.rim_radius),
            ("hole_radius", self.hole_radius),
            ("highlight_radius", self.highlight_radius),
            ("grip_radius", self.grip_radius),
            ("grip_distance", self.grip_distance),
            ("label_size", self.label_size),
            ("label_bias", self.label_bias),
            ("shadow_offset", self.shadow_offset),
            ("unit_size", self.unit_size),
            ("unit_offset", self.unit_offset),
        ] {
            check_fraction("plate", field, value)?;
        }
        if self.grip_count > MAX_GRIPS {
            return Err(Error::ConfigError(format!(
                "plate grip_count {} exceeds {}",
                self.grip_count, MAX_GRIPS
            )));
        }
        for (field, text) in [("label", &self.label), ("unit", &self.unit)] {
            if text.chars().count() > MAX_TEXT_CHARS {
                return Err(Error::ConfigError(format!(
                    "plate {} is longer than {} characters",
                    field, MAX_TEXT_CHARS
                )));
            }
        }
        Ok(())
    }
}

/// Compute the paint commands of a design, back to front.
pub fn layout(design: &Design, size: u32, brand: Color, font: &Font) -> Vec<PaintCommand> {
    let commands = match design {
        Design::Dumbbell(l) => dumbbell(l, size, brand),
        Design::MinimalDumbbell(l) => minimal_dumbbell(l, size),
        Design::Plate(l) => plate(l, size, brand, font),
    };
    debug!("{} layout at {}px: {} commands", design.kind(), size, commands.len());
    commands
}

/// Every command that paints something must stay within `[0, size)`.
pub fn check_bounds(commands: &[PaintCommand], size: u32) -> Result<()> {
    for cmd in commands {
        if let Some(bounds) = cmd.primitive.bounds() {
            if !bounds.is_empty() && !bounds.within(size) {
                return Err(Error::OutOfBounds {
                    shape: cmd.name.to_string(),
                    bounds,
                    size,
                });
            }
        }
    }
    Ok(())
}

/// Truncating, like the integer pixel constants of the original artwork
fn scaled(size: u32, fraction: f32) -> i32 {
    (fraction * size as f32) as i32
}

fn rounded(bounds: Bounds, radius: i32) -> Primitive {
    Primitive::RoundedRect { bounds, radius }
}

fn dumbbell(l: &DumbbellLayout, size: u32, brand: Color) -> Vec<PaintCommand> {
    let center = size as i32 / 2;
    let bar_w = scaled(size, l.bar_width);
    let bar_h = scaled(size, l.bar_height);
    let plate_w = scaled(size, l.plate_width);
    let plate_h = scaled(size, l.plate_height);
    let overlap = scaled(size, l.plate_overlap);
    let accent_r = scaled(size, l.accent_radius);

    let bar_left = center - bar_w / 2;
    let bar_top = center - bar_h / 2;
    let plate_top = center - plate_h / 2;
    let left_plate_x = bar_left - plate_w + overlap;
    let right_plate_x = bar_left + bar_w - overlap;

    let accent = |plate_x: i32, inset: f32| {
        Primitive::circle(
            (plate_x + scaled(size, inset) + accent_r) as f32,
            center as f32,
            accent_r as f32,
        )
    };

    let fg = l.foreground;
    vec![
        PaintCommand::new(
            "bar",
            rounded(Bounds::from_size(bar_left, bar_top, bar_w, bar_h), scaled(size, l.bar_radius)),
            fg,
            Role::Fixed,
        ),
        PaintCommand::new(
            "left plate",
            rounded(
                Bounds::from_size(left_plate_x, plate_top, plate_w, plate_h),
                scaled(size, l.plate_radius),
            ),
            fg,
            Role::Fixed,
        ),
        PaintCommand::new(
            "right plate",
            rounded(
                Bounds::from_size(right_plate_x, plate_top, plate_w, plate_h),
                scaled(size, l.plate_radius),
            ),
            fg,
            Role::Fixed,
        ),
        PaintCommand::new("left accent", accent(left_plate_x, l.left_accent_inset), brand, Role::Brand),
        PaintCommand::new("right accent", accent(right_plate_x, l.right_accent_inset), brand, Role::Brand),
    ]
}

fn minimal_dumbbell(l: &MinimalDumbbellLayout, size: u32) -> Vec<PaintCommand> {
    let center = size as i32 / 2;
    let bar_w = scaled(size, l.bar_width);
    let bar_h = scaled(size, l.bar_height);
    let weight_w = scaled(size, l.weight_width);
    let weight_h = scaled(size, l.weight_height);
    let weight_r = scaled(size, l.weight_radius);

    let bar = Bounds::from_size(center - bar_w / 2, center - bar_h / 2, bar_w, bar_h);
    let weight_top = center - weight_h / 2;

    vec![
        PaintCommand::new("bar", rounded(bar, bar_h / 2), l.foreground, Role::Fixed),
        PaintCommand::new(
            "left weight",
            rounded(Bounds::from_size(bar.x0 - weight_w, weight_top, weight_w, weight_h), weight_r),
            l.foreground,
            Role::Fixed,
        ),
        PaintCommand::new(
            "right weight",
            rounded(Bounds::from_size(bar.x1, weight_top, weight_w, weight_h), weight_r),
            l.foreground,
            Role::Fixed,
        ),
    ]
}

fn plate(l: &PlateLayout, size: u32, brand: Color, font: &Font) -> Vec<PaintCommand> {
    let s = size as f32;
    let c = (size / 2) as f32;
    let ring = |fraction: f32| Primitive::circle(c, c, scaled(size, fraction) as f32);

    let mut commands = vec![
        PaintCommand::new("outer glow", ring(l.outer_radius), brand, Role::Brand),
        PaintCommand::new("plate body", ring(l.plate_radius), l.plate_color, Role::Fixed),
        PaintCommand::new("inner rim", ring(l.rim_radius), l.rim_color, Role::Fixed),
        PaintCommand::new("center hole", ring(l.hole_radius), l.hole_color, Role::Fixed),
        PaintCommand::new("hole highlight", ring(l.highlight_radius), l.highlight_color, Role::Fixed),
    ];

    let grip_r = scaled(size, l.grip_radius) as f32;
    let grip_d = scaled(size, l.grip_distance) as f32;
    for i in 0..l.grip_count {
        let angle = i as f32 * TAU / l.grip_count as f32;
        commands.push(PaintCommand::new(
            "grip hole",
            Primitive::circle(c + grip_d * angle.cos(), c + grip_d * angle.sin(), grip_r),
            l.grip_color,
            Role::Fixed,
        ));
    }

    let label_px = l.label_size * s;
    if let Some(ink) = font.measure(&l.label, label_px).ink {
        let (ix, iy) = ink.center();
        let x = (c - ix).round() as i32;
        let y = (c - iy - l.label_bias * s).round() as i32;
        let shadow = (l.shadow_offset * s).round() as i32;
        let text = |x: i32, y: i32| Primitive::Text {
            x,
            y,
            text: l.label.clone(),
            font: font.clone(),
            px: label_px,
        };
        commands.push(PaintCommand::new("label shadow", text(x + shadow, y + shadow), l.shadow_color, Role::Fixed));
        commands.push(PaintCommand::new("label", text(x, y), l.label_color, Role::Fixed));
    }

    let unit_px = l.unit_size * s;
    if let Some(ink) = font.measure(&l.unit, unit_px).ink {
        let (ix, _) = ink.center();
        commands.push(PaintCommand::new(
            "unit",
            Primitive::Text {
                x: (c - ix).round() as i32,
                y: (c + l.unit_offset * s).round() as i32 - ink.y0,
                text: l.unit.clone(),
                font: font.clone(),
                px: unit_px,
            },
            l.unit_color,
            Role::Fixed,
        ));
    }

    commands
}
