use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};

use iconsmith::capability::{self, Capabilities};
use iconsmith::output::{FileSink, OutputSink};
use iconsmith::variants;
use iconsmith::{Background, Canvas, Color, ColorRange, IconConfig, Palette, RecolorRule, VariantStrategy};

#[derive(Parser, Debug)]
#[command(name = "iconsmith", version, about = "Generate dumbbell and weight-plate app icons")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the base icon and its palette variants (the default)
    Render(RenderArgs),
    /// Recolor an existing PNG by matching a channel range
    Recolor(RecolorArgs),
    /// Report which backends this build carries
    Capabilities,
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    design: Option<DesignKind>,
    /// Canvas edge length in pixels
    #[arg(long)]
    size: Option<u32>,
    /// Brand color, e.g. "#1976D2"
    #[arg(long)]
    brand: Option<Color>,
    /// "brand", "transparent" or a color
    #[arg(long)]
    background: Option<Background>,
    /// Preferred TrueType/OpenType font for text
    #[arg(long)]
    font: Option<PathBuf>,
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Base file name without extension
    #[arg(long)]
    name: Option<String>,
    /// Built-in palette: material, bootstrap or none
    #[arg(long)]
    palette: Option<String>,
    /// Extra variant as name=color (repeatable)
    #[arg(long = "variant", value_parser = parse_variant)]
    variants: Vec<(String, Color)>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Recolor pixels inside r0-r1,g0-g1,b0-b1 instead of tagged brand regions
    #[arg(long)]
    range: Option<ColorRange>,
    /// Fail when the output directory does not exist
    #[arg(long)]
    no_create_dirs: bool,
}

#[derive(Args, Debug)]
struct RecolorArgs {
    /// PNG to recolor
    #[arg(long)]
    input: PathBuf,
    /// Defaults to the directory of the input
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Defaults to the input file stem
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    palette: Option<String>,
    #[arg(long = "variant", value_parser = parse_variant)]
    variants: Vec<(String, Color)>,
    /// Channel range to substitute, r0-r1,g0-g1,b0-b1
    #[arg(long, default_value = "30-60,80-120,240-255")]
    range: ColorRange,
    #[arg(long)]
    no_create_dirs: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DesignKind {
    Dumbbell,
    MinimalDumbbell,
    Plate,
}

impl DesignKind {
    fn as_str(self) -> &'static str {
        match self {
            DesignKind::Dumbbell => "dumbbell",
            DesignKind::MinimalDumbbell => "minimal-dumbbell",
            DesignKind::Plate => "plate",
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Recolor,
    Rerender,
}

fn parse_variant(s: &str) -> std::result::Result<(String, Color), String> {
    let (name, color) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=color, got '{}'", s))?;
    let color = color.parse::<Color>().map_err(|e| e.to_string())?;
    Ok((name.trim().to_string(), color))
}

fn build_palette(palette: Option<&str>, variants: &[(String, Color)], fallback: Palette) -> Result<Palette> {
    let mut result = match palette {
        Some(name) => Palette::builtin(name)?,
        None if !variants.is_empty() => Palette::new(),
        None => fallback,
    };
    for (name, color) in variants {
        result.insert(name, *color);
    }
    result.validate()?;
    Ok(result)
}

fn sink(no_create_dirs: bool) -> FileSink {
    if no_create_dirs {
        FileSink::new().without_create_dirs()
    } else {
        FileSink::new()
    }
}

fn build_config(args: &RenderArgs) -> Result<IconConfig> {
    let design = args.design.map(DesignKind::as_str);
    let mut cfg = match &args.config {
        Some(path) => IconConfig::from_json_file_with_design(path, design)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => IconConfig::preset(design.unwrap_or("dumbbell"))?,
    };
    if let Some(size) = args.size {
        cfg.size = size;
    }
    if let Some(brand) = args.brand {
        cfg.brand = brand;
    }
    if let Some(background) = args.background {
        cfg.background = background;
    }
    if let Some(font) = &args.font {
        cfg.font_path = Some(font.clone());
    }
    if let Some(dir) = &args.out_dir {
        cfg.output_dir = dir.clone();
    }
    if let Some(name) = &args.name {
        cfg.base_name = name.clone();
    }
    cfg.palette = build_palette(args.palette.as_deref(), &args.variants, cfg.palette)?;
    if let Some(strategy) = args.strategy {
        cfg.strategy = match strategy {
            StrategyArg::Recolor => VariantStrategy::Recolor,
            StrategyArg::Rerender => VariantStrategy::Rerender,
        };
    }
    if let Some(range) = &args.range {
        cfg.rule = RecolorRule::Range(range.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let cfg = build_config(args)?;
    info!(
        "rendering {} icon at {}x{} (brand {})",
        cfg.design.kind(),
        cfg.size,
        cfg.size,
        cfg.brand
    );
    let written = iconsmith::generate(&cfg, &mut sink(args.no_create_dirs))?;
    info!("done: {} file(s)", written.len());
    Ok(())
}

fn run_recolor(args: &RecolorArgs) -> Result<()> {
    let caps = capability::check()?;
    caps.require_decoder()?;

    let palette = build_palette(args.palette.as_deref(), &args.variants, Palette::new())?;
    if palette.is_empty() {
        bail!("nothing to do: pass --palette or at least one --variant");
    }

    let data = std::fs::read(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let base = Canvas::from_png(&data).with_context(|| format!("decoding {}", args.input.display()))?;

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => args.input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let stem = match &args.name {
        Some(name) => name.clone(),
        None => args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .context("input path has no usable file name")?
            .to_string(),
    };

    let rule = RecolorRule::Range(args.range.clone());
    let mut sink = sink(args.no_create_dirs);
    for variant in variants::recolor_variants(&base, &palette, &rule)? {
        let path = out_dir.join(format!("{}_{}.png", stem, variant.name));
        let encoded = variant.canvas.encode_png()?;
        sink.write(&path, &encoded.png_data)?;
        info!("created {} (sha256 {})", path.display(), &encoded.digest()[..12]);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => run_render(&RenderArgs::default()),
        Some(Command::Render(args)) => run_render(&args),
        Some(Command::Recolor(args)) => run_recolor(&args),
        Some(Command::Capabilities) => {
            println!("{}", Capabilities::detect());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn variant_flag_parsing() {
        assert_eq!(
            parse_variant("red=220,53,69").unwrap(),
            ("red".to_string(), Color::rgb(220, 53, 69))
        );
        assert!(parse_variant("red").is_err());
        assert!(parse_variant("red=#nope").is_err());
    }

    #[test]
    fn flags_override_preset() {
        let cli = Cli::parse_from([
            "iconsmith", "render", "--design", "plate", "--size", "256", "--variant", "teal=#008080", "--range",
            "0-10,0-10,0-10",
        ]);
        let Some(Command::Render(args)) = cli.command else {
            panic!("expected render");
        };
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.design.kind(), "plate");
        assert_eq!(cfg.size, 256);
        assert_eq!(cfg.palette.len(), 1);
        assert_eq!(cfg.palette.get("teal"), Some(Color::rgb(0, 128, 128)));
        assert!(matches!(cfg.rule, RecolorRule::Range(_)));
    }

    #[test]
    fn palette_flag_with_extra_variant() {
        let p = build_palette(Some("bootstrap"), &[("teal".into(), Color::BLACK)], Palette::new()).unwrap();
        assert_eq!(p.len(), 6);
        assert!(build_palette(Some("neon"), &[], Palette::new()).is_err());
    }

    #[test]
    fn design_flag_overrides_config_file_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.json");
        std::fs::write(&path, r#"{ "design": { "kind": "dumbbell" }, "size": 256 }"#).unwrap();
        let args = RenderArgs {
            config: Some(path),
            design: Some(DesignKind::Plate),
            ..Default::default()
        };
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.design.kind(), "plate");
        assert_eq!(cfg.size, 256);
        assert_eq!(cfg.background, Background::Transparent);
        assert_eq!(cfg.brand, IconConfig::plate().brand);
        assert_eq!(cfg.palette, Palette::bootstrap());
    }

    fn plate_png(dir: &Path) -> PathBuf {
        let cfg = IconConfig {
            size: 128,
            ..IconConfig::plate()
        };
        let png = iconsmith::render(&cfg).unwrap().encode_png().unwrap();
        let path = dir.join("plate.png");
        std::fs::write(&path, &png.png_data).unwrap();
        path
    }

    fn recolor_args(input: PathBuf, variants: Vec<(String, Color)>) -> RecolorArgs {
        RecolorArgs {
            input,
            out_dir: None,
            name: None,
            palette: None,
            variants,
            range: ColorRange::default(),
            no_create_dirs: false,
        }
    }

    #[test]
    fn recolor_writes_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = plate_png(dir.path());
        let red = Color::rgb(220, 53, 69);
        run_recolor(&recolor_args(input, vec![("red".into(), red)])).unwrap();

        let out = dir.path().join("plate_red.png");
        assert!(out.exists());
        let img = image::open(&out).unwrap().to_rgba8();
        // outer ring, plate body, transparent corner
        assert_eq!(img.get_pixel(64, 5).0, [220, 53, 69, 255]);
        assert_eq!(img.get_pixel(64, 14).0, [50, 50, 60, 255]);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn recolor_honours_out_dir_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = plate_png(dir.path());
        let args = RecolorArgs {
            out_dir: Some(dir.path().join("variants")),
            name: Some("badge".into()),
            palette: Some("bootstrap".into()),
            ..recolor_args(input, Vec::new())
        };
        run_recolor(&args).unwrap();
        for name in ["red", "green", "orange", "purple", "dark"] {
            assert!(dir.path().join(format!("variants/badge_{}.png", name)).exists(), "{}", name);
        }
    }

    #[test]
    fn recolor_without_variants_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = plate_png(dir.path());
        let err = run_recolor(&recolor_args(input.clone(), Vec::new())).unwrap_err();
        assert!(err.to_string().contains("nothing to do"), "{}", err);
        let none = RecolorArgs {
            palette: Some("none".into()),
            ..recolor_args(input, Vec::new())
        };
        assert!(run_recolor(&none).is_err());
    }

    #[test]
    fn no_arguments_means_default_render() {
        let cli = Cli::parse_from(["iconsmith"]);
        assert!(cli.command.is_none());
        let cfg = build_config(&RenderArgs::default()).unwrap();
        assert_eq!(cfg, IconConfig::default());
    }
}
