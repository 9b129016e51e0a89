//! Palette variants: recolored derivatives of a base icon

use log::debug;

use crate::color::{Color, Palette};
use crate::config::{IconConfig, RecolorRule};
use crate::rendering::paint::Role;
use crate::rendering::Canvas;
use crate::{Error, Result};

/// One palette variant, named after its palette entry
#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
    pub color: Color,
    pub canvas: Canvas,
}

/// Copy of `base` where every pixel selected by `rule` takes the RGB of
/// `target`. Alpha is kept; all other pixels are left untouched.
pub fn recolor(base: &Canvas, target: Color, rule: &RecolorRule) -> Result<Canvas> {
    if matches!(rule, RecolorRule::Region) && !base.has_roles() {
        return Err(Error::ConfigError(
            "canvas has no region tags (decoded image?); use a color range rule".into(),
        ));
    }
    let mut out = base.clone();
    let mut changed = 0usize;
    for y in 0..base.height() {
        for x in 0..base.width() {
            let selected = match rule {
                RecolorRule::Region => base.role(x, y) == Some(Role::Brand),
                RecolorRule::Range(range) => range.contains(base.pixel(x, y)),
            };
            if selected {
                out.substitute(x, y, target);
                changed += 1;
            }
        }
    }
    debug!("recolor to {}: {} pixels substituted", target, changed);
    Ok(out)
}

/// Recolor `base` once per palette entry.
pub fn recolor_variants(base: &Canvas, palette: &Palette, rule: &RecolorRule) -> Result<Vec<Variant>> {
    palette
        .iter()
        .map(|entry| {
            Ok(Variant {
                name: entry.name.clone(),
                color: entry.color,
                canvas: recolor(base, entry.color, rule)?,
            })
        })
        .collect()
}

/// Render the configured design again for every palette entry, with the
/// entry's color as brand color.
pub fn rerender_variants(config: &IconConfig) -> Result<Vec<Variant>> {
    config
        .palette
        .iter()
        .map(|entry| {
            Ok(Variant {
                name: entry.name.clone(),
                color: entry.color,
                canvas: crate::render(&config.with_brand(entry.color))?,
            })
        })
        .collect()
}
