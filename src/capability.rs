//! Backend capability check, performed once before anything is written

use std::fmt;

use image::ImageFormat;
use log::debug;

use crate::{Error, Result};

/// Which optional backends this build carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub png_encoder: bool,
    pub png_decoder: bool,
    pub outline_fonts: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        Self {
            png_encoder: ImageFormat::Png.writing_enabled(),
            png_decoder: ImageFormat::Png.reading_enabled(),
            outline_fonts: cfg!(feature = "outline-fonts"),
        }
    }

    pub fn require_encoder(&self) -> Result<()> {
        if self.png_encoder {
            Ok(())
        } else {
            Err(Error::DependencyUnavailable(
                "PNG encoder (rebuild with the `png` feature)".into(),
            ))
        }
    }

    pub fn require_decoder(&self) -> Result<()> {
        if self.png_decoder {
            Ok(())
        } else {
            Err(Error::DependencyUnavailable(
                "PNG decoder (rebuild with the `png` feature)".into(),
            ))
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "available" } else { "missing" };
        writeln!(f, "png encoder:   {}", yes_no(self.png_encoder))?;
        writeln!(f, "png decoder:   {}", yes_no(self.png_decoder))?;
        write!(f, "outline fonts: {}", yes_no(self.outline_fonts))
    }
}

/// Detect capabilities and fail unless icons can be encoded.
pub fn check() -> Result<Capabilities> {
    let caps = Capabilities::detect();
    debug!("capabilities: {:?}", caps);
    caps.require_encoder()?;
    Ok(caps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_can_encode() {
        let caps = check().expect("png is a default feature");
        assert!(caps.png_encoder);
        assert!(caps.png_decoder);
    }

    #[test]
    fn missing_encoder_is_a_typed_error() {
        let caps = Capabilities {
            png_encoder: false,
            png_decoder: true,
            outline_fonts: false,
        };
        match caps.require_encoder() {
            Err(Error::DependencyUnavailable(msg)) => assert!(msg.contains("png")),
            other => panic!("expected DependencyUnavailable, got {:?}", other),
        }
        assert!(caps.require_decoder().is_ok());
    }

    #[test]
    fn report_lists_every_backend() {
        let text = Capabilities::detect().to_string();
        assert!(text.contains("png encoder"));
        assert!(text.contains("outline fonts"));
    }
}
