//! Icon configuration: every size, color, path and layout constant in one value

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{Background, Color, ColorRange, Palette};
use crate::rendering::layout::{DumbbellLayout, MinimalDumbbellLayout, PlateLayout};
use crate::{Error, Result};

pub const MIN_SIZE: u32 = 32;
pub const MAX_SIZE: u32 = 16384;

/// Which icon to draw, with its proportional layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Design {
    Dumbbell(DumbbellLayout),
    MinimalDumbbell(MinimalDumbbellLayout),
    Plate(PlateLayout),
}

impl Design {
    pub fn kind(&self) -> &'static str {
        match self {
            Design::Dumbbell(_) => "dumbbell",
            Design::MinimalDumbbell(_) => "minimal-dumbbell",
            Design::Plate(_) => "plate",
        }
    }

    /// Reject layout constants that would not produce a drawable icon.
    pub fn validate(&self) -> Result<()> {
        match self {
            Design::Dumbbell(l) => l.validate(),
            Design::MinimalDumbbell(l) => l.validate(),
            Design::Plate(l) => l.validate(),
        }
    }

    /// Default layout of a design by its kind name
    pub fn from_kind(kind: &str) -> Result<Self> {
        match kind {
            "dumbbell" => Ok(Design::Dumbbell(DumbbellLayout::default())),
            "minimal-dumbbell" => Ok(Design::MinimalDumbbell(MinimalDumbbellLayout::default())),
            "plate" => Ok(Design::Plate(PlateLayout::default())),
            other => Err(Error::ConfigError(format!("unknown design '{}'", other))),
        }
    }
}

/// How palette variants are derived from the base icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantStrategy {
    /// Substitute pixels of the rendered base canvas
    #[default]
    Recolor,
    /// Render the design again with the brand color replaced
    Rerender,
}

/// Which pixels a recolor substitutes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RecolorRule {
    /// Pixels tagged as brand regions while drawing
    #[default]
    Region,
    /// Pixels whose channels fall inside an inclusive range
    Range(ColorRange),
}

/// Configuration for one icon family (base icon plus variants)
///
/// Every field is optional in JSON; missing fields take the defaults of
/// the preset matching `design.kind`.
///
/// # Examples
///
/// ```
/// let cfg = iconsmith::IconConfig::default();
/// assert_eq!(cfg.size, 1024);
/// assert_eq!(cfg.design.kind(), "dumbbell");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconConfig {
    /// Edge length of the square canvas in pixels
    pub size: u32,
    pub background: Background,
    /// Substitutable accent color of the design
    pub brand: Color,
    pub design: Design,
    /// Preferred font for text; the built-in bitmap font is used when absent
    pub font_path: Option<PathBuf>,
    /// Directory receiving `<base_name>.png` and `<base_name>_<variant>.png`
    pub output_dir: PathBuf,
    pub base_name: String,
    pub palette: Palette,
    pub strategy: VariantStrategy,
    pub rule: RecolorRule,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self::dumbbell()
    }
}

impl IconConfig {
    /// Material-blue dumbbell; variants are re-rendered in Material accents.
    pub fn dumbbell() -> Self {
        Self {
            size: 1024,
            background: Background::Brand,
            brand: Color::rgb(0x19, 0x76, 0xD2),
            design: Design::Dumbbell(DumbbellLayout::default()),
            font_path: None,
            output_dir: PathBuf::from("assets/icon"),
            base_name: "app_icon".to_string(),
            palette: Palette::material(),
            strategy: VariantStrategy::Rerender,
            rule: RecolorRule::Region,
        }
    }

    /// White dumbbell on black, no variants.
    pub fn minimal_dumbbell() -> Self {
        Self {
            brand: Color::BLACK,
            design: Design::MinimalDumbbell(MinimalDumbbellLayout::default()),
            palette: Palette::new(),
            strategy: VariantStrategy::Recolor,
            ..Self::dumbbell()
        }
    }

    /// Weight plate on transparent background; variants recolor the outer ring.
    pub fn plate() -> Self {
        Self {
            background: Background::Transparent,
            brand: Color::rgb(41, 98, 255),
            design: Design::Plate(PlateLayout::default()),
            palette: Palette::bootstrap(),
            strategy: VariantStrategy::Recolor,
            ..Self::dumbbell()
        }
    }

    pub fn preset(kind: &str) -> Result<Self> {
        match kind {
            "dumbbell" => Ok(Self::dumbbell()),
            "minimal-dumbbell" => Ok(Self::minimal_dumbbell()),
            "plate" => Ok(Self::plate()),
            other => Err(Error::ConfigError(format!("unknown design '{}'", other))),
        }
    }

    /// Parse a JSON config; fields left out come from the preset named by
    /// `design.kind` (the dumbbell preset when no design is given).
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_design(json, None)
    }

    /// Like [`from_json`](Self::from_json), but draws the design named by
    /// `kind` when given. Fields the JSON leaves out then come from that
    /// design's preset, and a `design` object of another kind is dropped.
    pub fn from_json_with_design(json: &str, kind: Option<&str>) -> Result<Self> {
        let mut value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(format!("invalid JSON: {}", e)))?;
        let overrides = value
            .as_object_mut()
            .ok_or_else(|| Error::ConfigError("config must be a JSON object".into()))?;

        let file_kind = overrides
            .get("design")
            .and_then(|d| d.get("kind"))
            .and_then(|k| k.as_str())
            .map(str::to_string);
        let kind = match (kind, file_kind) {
            (Some(wanted), Some(found)) if wanted != found => {
                debug!("config design '{}' replaced by '{}'", found, wanted);
                overrides.remove("design");
                wanted.to_string()
            }
            (Some(wanted), _) => wanted.to_string(),
            (None, found) => found.unwrap_or_else(|| "dumbbell".to_string()),
        };
        let preset = Self::preset(&kind)?;

        let mut merged = serde_json::to_value(&preset).map_err(|e| Error::Other(e.to_string()))?;
        if let Some(base) = merged.as_object_mut() {
            for (key, v) in std::mem::take(overrides) {
                base.insert(key, v);
            }
        }
        let cfg: IconConfig =
            serde_json::from_value(merged).map_err(|e| Error::ConfigError(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json_file_with_design(path, None)
    }

    pub fn from_json_file_with_design(path: &Path, kind: Option<&str>) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_with_design(&json, kind)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(Error::ConfigError(format!(
                "size {} outside {}..={}",
                self.size, MIN_SIZE, MAX_SIZE
            )));
        }
        if self.base_name.is_empty() || self.base_name.contains(['/', '\\']) {
            return Err(Error::ConfigError(format!("invalid base name '{}'", self.base_name)));
        }
        self.design.validate()?;
        self.palette.validate()
    }

    /// Output path of the base icon (`None`) or a named variant
    pub fn output_path(&self, variant: Option<&str>) -> PathBuf {
        let file = match variant {
            Some(name) => format!("{}_{}.png", self.base_name, name),
            None => format!("{}.png", self.base_name),
        };
        self.output_dir.join(file)
    }

    /// Same icon with another brand color
    pub fn with_brand(&self, brand: Color) -> Self {
        Self {
            brand,
            ..self.clone()
        }
    }
}
