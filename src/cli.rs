use crate::config::load_config;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_funnel;
use crate::render::{RenderOptions, render_funnel, write_output_png, write_output_svg};
use crate::surface::SvgSurface;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "funnel", version, about = "Funnel diagram renderer in Rust")]
pub struct Args {
    /// Input file (.json, .json5 or text funnel) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (themeVariables and funnel layout settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width of the funnel body
    #[arg(short = 'w', long = "width", default_value_t = 900.0)]
    pub width: f32,

    /// Height of the funnel body, excluding the title header
    #[arg(short = 'H', long = "height", default_value_t = 600.0)]
    pub height: f32,

    /// Id given to the root SVG element and used as the label id prefix
    #[arg(long = "containerId", default_value = "funnel")]
    pub container_id: String,

    /// Seed for label jitter, for reproducible output
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Write the computed geometry as JSON to this path
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    config.render.width = args.width;
    config.render.height = args.height;
    if args.seed.is_some() {
        config.render.seed = args.seed;
    }

    let input = read_input(args.input.as_deref())?;
    let funnel = parse_funnel(&input)?;
    tracing::debug!(phases = funnel.len(), "parsed funnel");

    let options = RenderOptions::from(&config);
    let rendered = render_funnel::<SvgSurface>(
        &args.container_id,
        config.render.width,
        config.render.height,
        &funnel,
        &options,
    );

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &rendered.layout, &rendered.links)?;
    }

    config.render.height = rendered.layout.total_height();
    let svg = rendered.surface.finish();
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "funnel",
            "-i",
            "in.json",
            "-e",
            "png",
            "-o",
            "out.png",
            "--seed",
            "4",
            "--containerId",
            "chart",
        ])
        .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("in.json")));
        assert!(matches!(args.output_format, OutputFormat::Png));
        assert_eq!(args.seed, Some(4));
        assert_eq!(args.container_id, "chart");
        assert_eq!(args.width, 900.0);
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        assert_eq!(
            ensure_output(&Some(PathBuf::from("a.png")), "png").unwrap(),
            PathBuf::from("a.png")
        );
    }
}
