use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use image::Rgb;
use maskfx::capture::{CaptureSource, FileSource, WebcamCapture};
use maskfx::codec::{Codec, ImageCodec};
use maskfx::compositing::{BlendParameters, DisplayBounds};
use maskfx::config::{self, CompositeMode, PipelineConfig};
use maskfx::output::{FileSurface, LoopbackSurface, PresentationSurface};
use maskfx::pipeline::run_pipeline;
use maskfx::segmentation::{self, Classifier, MaskEncoding, MaskFileClassifier};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Tint the selected region
    Recolor,
    /// Blur everything outside the selected region
    Background,
    /// Render the selection as a two-color image
    Matte,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MaskKind {
    /// Pixel values are category ids
    Categories,
    /// Pixel values are confidence scaled to 0-255
    Confidence,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image file
    #[arg(short, long, conflicts_with = "camera")]
    input: Option<PathBuf>,

    /// Capture the input still from this webcam index instead of a file
    #[arg(long)]
    camera: Option<u32>,

    /// Path to segmentation model (ONNX file)
    #[arg(long, conflicts_with = "mask")]
    model: Option<PathBuf>,

    /// Model input width
    #[arg(long, default_value_t = 512)]
    model_width: u32,

    /// Model input height
    #[arg(long, default_value_t = 512)]
    model_height: u32,

    /// Precomputed mask image to use instead of a model
    #[arg(long)]
    mask: Option<PathBuf>,

    /// How the values of --mask are read
    #[arg(long, value_enum, default_value_t = MaskKind::Categories)]
    mask_encoding: MaskKind,

    /// Compositing mode
    #[arg(short, long, value_enum, default_value_t = Mode::Background)]
    mode: Mode,

    /// Selection threshold (pixels strictly above it are selected).
    /// Defaults to 0 for recolor, 0.1 for background and 0.2 for matte
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f32>,

    /// Recolor tint as R,G,B
    #[arg(long, value_parser = parse_color, default_value = "255,0,0")]
    tint: Rgb<u8>,

    /// Weight of the original image in recolor mode
    #[arg(long, default_value_t = config::DEFAULT_ALPHA)]
    alpha: f32,

    /// Weight of the tint in recolor mode (defaults to 1 - alpha)
    #[arg(long)]
    beta: Option<f32>,

    /// Gaussian kernel width for the background effect (positive, odd)
    #[arg(long, default_value_t = config::DEFAULT_BLUR_KERNEL)]
    blur_kernel: u32,

    /// Matte foreground color as R,G,B
    #[arg(long, value_parser = parse_color, default_value = "255,255,255")]
    foreground: Rgb<u8>,

    /// Matte background color as R,G,B
    #[arg(long, value_parser = parse_color, default_value = "192,192,192")]
    background: Rgb<u8>,

    /// Maximum display width
    #[arg(long, default_value_t = config::DEFAULT_DISPLAY_BOUNDS.max_width)]
    max_width: u32,

    /// Maximum display height
    #[arg(long, default_value_t = config::DEFAULT_DISPLAY_BOUNDS.max_height)]
    max_height: u32,

    /// Write the full-resolution composite here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the display-sized composite here
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Present the display-sized composite on a v4l2loopback device
    #[arg(long)]
    loopback: Option<PathBuf>,

    /// Keep the loopback frame up until Enter is pressed
    #[arg(long, requires = "loopback")]
    hold: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn parse_color(value: &str) -> std::result::Result<Rgb<u8>, String> {
    let channels = value
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid color '{value}': {e}"))?;

    match channels.as_slice() {
        &[r, g, b] => Ok(Rgb([r, g, b])),
        _ => Err(format!("expected R,G,B, got '{value}'")),
    }
}

fn build_config(args: &Args) -> PipelineConfig {
    let mode = match args.mode {
        Mode::Recolor => {
            let mut blend = BlendParameters::new(args.alpha);
            if let Some(beta) = args.beta {
                blend = blend.with_beta(beta);
            }
            CompositeMode::Recolor {
                tint: args.tint,
                blend,
            }
        }
        Mode::Background => CompositeMode::BackgroundEffect {
            kernel_size: args.blur_kernel,
        },
        Mode::Matte => CompositeMode::Matte {
            foreground: args.foreground,
            background: args.background,
        },
    };

    let config = PipelineConfig::new(mode)
        .with_bounds(DisplayBounds::new(args.max_width, args.max_height));
    match args.threshold {
        Some(threshold) => config.with_threshold(threshold),
        None => config,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("maskfx starting");

    let config = build_config(&args);
    config
        .validate()
        .context("Invalid compositing parameters")?;
    tracing::info!(
        "Mode: {}, threshold: {}, display bounds: {}x{}",
        config.mode.name(),
        config.threshold,
        config.bounds.max_width,
        config.bounds.max_height
    );

    let mut source: Box<dyn CaptureSource> = match (&args.input, args.camera) {
        (Some(path), _) => Box::new(FileSource::new(path, ImageCodec)),
        (None, Some(index)) => Box::new(WebcamCapture::new(index)),
        (None, None) => bail!("Either --input or --camera is required"),
    };

    let mut classifier: Box<dyn Classifier> = match (&args.mask, &args.model) {
        (Some(mask_path), _) => {
            tracing::info!("Using precomputed mask {}", mask_path.display());
            let encoding = match args.mask_encoding {
                MaskKind::Categories => MaskEncoding::Categories,
                MaskKind::Confidence => MaskEncoding::Confidence,
            };
            Box::new(MaskFileClassifier::new(mask_path, encoding))
        }
        (None, Some(model_path)) => {
            segmentation::create_default_model(model_path, (args.model_width, args.model_height))
                .context("Failed to load segmentation model")?
        }
        (None, None) => bail!("Either --model or --mask is required"),
    };
    if let Some((width, height)) = classifier.input_size() {
        tracing::info!("Classifier input size: {}x{}", width, height);
    }

    let mut surfaces: Vec<Box<dyn PresentationSurface>> = Vec::new();
    if let Some(path) = &args.preview {
        surfaces.push(Box::new(FileSurface::new(path, ImageCodec)));
    }
    if let Some(device) = &args.loopback {
        surfaces.push(Box::new(LoopbackSurface::new(device, args.hold)));
    }
    if surfaces.is_empty() && args.output.is_none() {
        tracing::warn!("No --output, --preview or --loopback given; the result will be discarded");
    }

    let output = run_pipeline(source.as_mut(), classifier.as_mut(), &mut surfaces, &config)?;

    if let Some(path) = &args.output {
        ImageCodec
            .encode(&output.composite, path)
            .context("Failed to write composite")?;
        tracing::info!("Composite written to {}", path.display());
    }

    tracing::info!("Done");
    Ok(())
}
