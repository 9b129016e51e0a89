//! iconsmith
//!
//! Procedurally draws app icons (a dumbbell or a weight plate) onto a square
//! raster canvas, derives palette variants and writes them as PNG files.
//!
//! # Features
//!
//! - **png** (default): PNG encoding and decoding through the `image` crate
//! - **outline-fonts** (default): TrueType/OpenType text through `ab_glyph`;
//!   without it (or without a configured font) text uses a built-in bitmap font
//!
//! # Example
//!
//! ```no_run
//! use iconsmith::{IconConfig, output::FileSink};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IconConfig {
//!     size: 512,
//!     ..IconConfig::plate()
//! };
//!
//! let written = iconsmith::generate(&config, &mut FileSink::new())?;
//! for icon in written {
//!     println!("{} ({})", icon.path.display(), icon.digest);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use log::info;

pub mod capability;
pub mod color;
pub mod config;
pub mod error;
pub mod output;
pub mod rendering;
pub mod variants;

pub use color::{Background, Color, ColorRange, Palette};
pub use config::{Design, IconConfig, RecolorRule, VariantStrategy};
pub use error::{Error, Result};
pub use rendering::{Canvas, EncodedIcon};

use output::OutputSink;
use rendering::text::Font;
use rendering::{layout, raster};

/// A file produced by [`generate`]
#[derive(Debug, Clone)]
pub struct GeneratedIcon {
    /// Palette variant name, `None` for the base icon
    pub variant: Option<String>,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Hex SHA-256 of the written PNG
    pub digest: String,
}

/// Render the configured icon into a fresh canvas.
///
/// No filesystem access happens here besides reading the optional font.
pub fn render(config: &IconConfig) -> Result<Canvas> {
    config.validate()?;
    let font = Font::load_or_default(config.font_path.as_deref());
    let commands = layout::layout(&config.design, config.size, config.brand, &font);
    layout::check_bounds(&commands, config.size)?;

    let mut canvas = Canvas::new(config.size, config.background, config.brand)?;
    raster::rasterize(&mut canvas, &commands);
    Ok(canvas)
}

/// Render the base icon and every palette variant, then write them through
/// `sink`. Existing files are overwritten.
pub fn generate(config: &IconConfig, sink: &mut dyn OutputSink) -> Result<Vec<GeneratedIcon>> {
    capability::check()?;
    let base = render(config)?;

    let variants = match config.strategy {
        VariantStrategy::Recolor => variants::recolor_variants(&base, &config.palette, &config.rule)?,
        VariantStrategy::Rerender => variants::rerender_variants(config)?,
    };

    let mut written = Vec::with_capacity(1 + variants.len());
    written.push(write_icon(config, &base, None, sink)?);
    for v in &variants {
        written.push(write_icon(config, &v.canvas, Some(&v.name), sink)?);
    }
    info!("generated {} icon(s) in {}", written.len(), config.output_dir.display());
    Ok(written)
}

fn write_icon(
    config: &IconConfig,
    canvas: &Canvas,
    variant: Option<&str>,
    sink: &mut dyn OutputSink,
) -> Result<GeneratedIcon> {
    let encoded = canvas.encode_png()?;
    let path = config.output_path(variant);
    sink.write(&path, &encoded.png_data)?;
    let digest = encoded.digest();
    info!("created {} ({}x{}, sha256 {})", path.display(), encoded.width, encoded.height, &digest[..12]);
    Ok(GeneratedIcon {
        variant: variant.map(str::to_string),
        path,
        width: encoded.width,
        height: encoded.height,
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use output::MemorySink;

    #[test]
    fn render_is_square_with_background_corners() {
        let cfg = IconConfig {
            size: 256,
            ..IconConfig::default()
        };
        let canvas = render(&cfg).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (256, 256));
        for (x, y) in [(0, 0), (255, 0), (0, 255), (255, 255)] {
            assert_eq!(canvas.pixel(x, y), cfg.brand);
        }
    }

    #[test]
    fn generate_writes_base_and_variants() {
        let cfg = IconConfig {
            size: 128,
            ..IconConfig::plate()
        };
        let mut sink = MemorySink::new();
        let written = generate(&cfg, &mut sink).unwrap();
        assert_eq!(written.len(), 6);
        assert_eq!(sink.len(), 6);
        assert!(written[0].variant.is_none());
        assert_eq!(written[1].variant.as_deref(), Some("red"));
        assert!(sink.get("assets/icon/app_icon_dark.png").is_some());
    }

    #[test]
    fn invalid_config_is_rejected_before_drawing() {
        let cfg = IconConfig {
            size: 8,
            ..IconConfig::default()
        };
        assert!(matches!(render(&cfg), Err(Error::ConfigError(_))));
    }
}
