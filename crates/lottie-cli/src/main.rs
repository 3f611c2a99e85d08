use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lottie_core::ExportConfig;
use lottie_export::lottie::write_json;
use lottie_export::tgs::compress_tgs;
use lottie_export::{export_embedded_html, parse_tgs, Severity, Strip, TgsOptions, TgsValidator};
use lottie_model::{Animation, Json, Layer, LottieObject};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "lottie",
    version,
    about = "Convert, check and inspect Lottie animations and Telegram stickers"
)]
struct Cli {
    /// Export settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between Lottie JSON, TGS and HTML, chosen by file extension
    Convert {
        /// Lottie JSON or TGS file to read
        #[arg()]
        input: PathBuf,

        /// Output file: .json, .tgs or .html
        #[arg()]
        output: PathBuf,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,

        /// Fit the animation to the sticker canvas and frame rates
        #[arg(long)]
        sanitize: bool,

        /// Round numbers and drop names and indices
        #[arg(long)]
        strip: bool,
    },

    /// Check a file against the Telegram sticker requirements
    Check {
        #[arg()]
        input: PathBuf,

        /// Lowest severity reported
        #[arg(long, value_enum, default_value = "note")]
        level: Level,
    },

    /// Print canvas, timing and layers of a file
    Info {
        #[arg()]
        input: PathBuf,
    },

    /// Write the default export settings to a file
    InitConfig {
        #[arg(default_value = "lottie.toml")]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Note,
    Warning,
    Error,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Note => Severity::Note,
            Level::Warning => Severity::Warning,
            Level::Error => Severity::Error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ExportConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => ExportConfig::default(),
    };

    match cli.command {
        Commands::Convert {
            input,
            output,
            pretty,
            sanitize,
            strip,
        } => {
            let mut config = config;
            config.json.pretty |= pretty;
            config.tgs.sanitize |= sanitize;
            if strip {
                config.strip.enabled = true;
                config.strip.transform_defaults = true;
                config
                    .strip
                    .remove_attributes
                    .extend(lottie_export::strip::HEAVY_ATTRIBUTES.map(String::from));
            }
            cmd_convert(&input, &output, &config)
        }
        Commands::Check { input, level } => cmd_check(&input, level.into()),
        Commands::Info { input } => cmd_info(&input),
        Commands::InitConfig { path } => cmd_init_config(&path),
    }
}

fn read_animation(path: &Path) -> Result<Animation> {
    let file =
        File::open(path).with_context(|| format!("failed to open file: {}", path.display()))?;
    parse_tgs(BufReader::new(file))
        .with_context(|| format!("failed to load animation: {}", path.display()))
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn cmd_convert(input: &Path, output: &Path, config: &ExportConfig) -> Result<()> {
    let mut animation = read_animation(input)?;
    let format = extension(output);

    if config.tgs.sanitize {
        animation.tgs_sanitize();
    }
    let strip = config.strip.enabled.then(|| Strip::from(&config.strip));
    let dict = |animation: &Animation| match &strip {
        Some(strip) => strip.to_dict(animation),
        None => animation.to_dict(),
    };

    let file = File::create(output)
        .with_context(|| format!("failed to create file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);

    match format.as_str() {
        "json" => {
            let indent = config.json.pretty.then_some(config.json.indent);
            write_json(&Json::Object(dict(&animation)?), &mut writer, indent)?;
        }
        "tgs" => {
            let options = TgsOptions::from(&config.tgs);
            let bytes = compress_tgs(dict(&animation)?, &options)?;
            writer.write_all(&bytes)?;
            if options.validate {
                let mut validator = TgsValidator::default();
                validator.check_animation(&animation);
                validator.check_size(bytes.len(), &output.display().to_string());
                for issue in validator.issues() {
                    println!("   {issue}");
                }
            }
        }
        "html" | "htm" => export_embedded_html(&animation, &mut writer)?,
        other => anyhow::bail!("unsupported output format: {other:?}"),
    }
    writer.flush()?;

    info!(input = %input.display(), output = %output.display(), "converted");
    Ok(())
}

fn cmd_check(input: &Path, level: Severity) -> Result<()> {
    println!("Checking {}", input.display());
    let mut validator = TgsValidator::new(level);
    validator
        .check_file(input)
        .with_context(|| format!("failed to read file: {}", input.display()))?;

    for issue in validator.issues() {
        println!("   {issue}");
    }
    if validator.has_errors() {
        let count = validator
            .issues()
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        anyhow::bail!("{count} error(s) found");
    }
    println!("   OK");
    Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
    let animation = read_animation(input)?;
    println!("{}", animation.name.as_deref().unwrap_or("(unnamed)"));
    println!(
        "   Canvas:  {}x{}",
        animation.width.unwrap_or_default(),
        animation.height.unwrap_or_default()
    );
    println!(
        "   Frames:  {} to {} at {} fps",
        animation.in_point.unwrap_or_default(),
        animation.out_point.unwrap_or_default(),
        animation.frame_rate.unwrap_or_default()
    );
    println!("   Version: {}", animation.version.as_deref().unwrap_or("?"));
    println!("   Assets:  {}", animation.assets.as_ref().map_or(0, Vec::len));
    println!("   Layers:");
    for layer in &animation.layers {
        println!("      {}", describe_layer(layer));
    }
    Ok(())
}

fn describe_layer(layer: &Layer) -> String {
    let index = layer
        .index()
        .map_or_else(|| "-".to_string(), |i| i.to_string());
    let mut line = format!(
        "[{index}] {} {:?}",
        layer.node().class_name(),
        layer.name().unwrap_or("")
    );
    if let Some(parent) = layer.parent_index() {
        line.push_str(&format!(" parent={parent}"));
    }
    if let Some(shapes) = layer.as_shape_layer() {
        line.push_str(&format!(" shapes={}", shapes.shapes.len()));
    }
    line
}

fn cmd_init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("'{}' already exists", path.display());
    }
    ExportConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
