use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::{IVec2, UVec2};
use tracing::{info, warn};

use snowglobe::spin::ROTATION_CONSTANT;
use snowglobe::{
    calibration_pattern, save_raster, CalibrationModel, CalibrationSession, Compositor,
    CornerPattern, EquirectImage, FrameRenderer, Move, Raster, RenderOptions, Spin,
};

/// Pre-warps images for a fisheye spherical projection display.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Base log level; RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Also write daily-rotated log files into this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render an equirectangular image for the globe.
    Render(RenderArgs),
    /// Draw the calibration test pattern.
    Pattern(PatternArgs),
    /// Adjust and save a calibration record.
    Calibrate(CalibrateArgs),
    /// Render a sequence of frames of the spinning globe.
    Spin(SpinArgs),
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Calibration record (.yaml, .json or .toml).
    #[arg(long)]
    calibration: PathBuf,

    /// Equirectangular source image.
    #[arg(long)]
    image: PathBuf,

    #[arg(long)]
    output: PathBuf,

    /// Longitude rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotation: f64,

    /// Box-filter over the four pixel corners instead of the legacy pattern.
    #[arg(long)]
    square_corners: bool,

    /// Composite onto a black display of this size, e.g. 848x480.
    #[arg(long, value_parser = parse_size)]
    display: Option<UVec2>,
}

#[derive(Debug, Args)]
struct PatternArgs {
    #[arg(long)]
    calibration: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long, value_parser = parse_size)]
    display: Option<UVec2>,

    /// Adjustments to replay first, e.g. `grow:10 left:3`.
    #[arg(long, num_args = 1..)]
    moves: Vec<Move>,
}

#[derive(Debug, Args)]
struct CalibrateArgs {
    #[arg(long)]
    calibration: PathBuf,

    #[arg(long)]
    radius: Option<u32>,

    #[arg(long)]
    offset: Option<f64>,

    /// Sphere center on the display, e.g. `431,210`.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    center: Option<IVec2>,
}

#[derive(Debug, Args)]
struct SpinArgs {
    #[arg(long)]
    calibration: PathBuf,

    #[arg(long)]
    image: PathBuf,

    #[arg(long)]
    output_dir: PathBuf,

    #[arg(long)]
    frames: u32,

    /// Multiple of the standard spin speed; negative spins the other way.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    speed: f64,
}

fn parse_size(s: &str) -> Result<UVec2, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width '{}'", w))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height '{}'", h))?;
    if w == 0 || h == 0 {
        return Err(format!("display size must be non-zero, got '{}'", s));
    }
    Ok(UVec2::new(w, h))
}

fn parse_point(s: &str) -> Result<IVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x: i32 = x.trim().parse().map_err(|_| format!("bad x '{}'", x))?;
    let y: i32 = y.trim().parse().map_err(|_| format!("bad y '{}'", y))?;
    Ok(IVec2::new(x, y))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::log_setup::setup_logging(&cli.log_level, cli.log_dir.as_deref())?;

    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Pattern(args) => run_pattern(args),
        Command::Calibrate(args) => run_calibrate(args),
        Command::Spin(args) => run_spin(args),
    }
}

fn load_model(path: &Path) -> Result<CalibrationModel> {
    CalibrationModel::load_or_default(path)
        .with_context(|| format!("loading calibration {}", path.display()))
}

/// Writes `frame`, first placing it on a display raster when one is asked for.
fn save_frame(
    frame: &Raster,
    model: &CalibrationModel,
    display: Option<UVec2>,
    output: &Path,
) -> Result<()> {
    match display {
        Some(size) => {
            let mut compositor = Compositor::new(size);
            if compositor.present(frame, model).is_none() {
                warn!(center = ?model.center, "frame lies entirely off the display");
            }
            save_raster(compositor.display(), output)?;
        }
        None => save_raster(frame, output)?,
    }
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let model = load_model(&args.calibration)?;
    let image = EquirectImage::open(&args.image)?;

    let options = RenderOptions {
        corners: if args.square_corners {
            CornerPattern::Square
        } else {
            CornerPattern::Observed
        },
        rotation: args.rotation.to_radians(),
    };
    let frame = FrameRenderer::with_options(&model, &image, options).render();
    save_frame(&frame, &model, args.display, &args.output)?;

    info!(output = %args.output.display(), size = frame.width(), "rendered frame");
    Ok(())
}

fn run_pattern(args: PatternArgs) -> Result<()> {
    let mut session = CalibrationSession::new(load_model(&args.calibration)?);
    session.replay(&args.moves);
    let model = *session.model();

    let pattern = calibration_pattern(&model);
    save_frame(&pattern, &model, args.display, &args.output)?;

    info!(
        output = %args.output.display(),
        radius = model.radius,
        offset = model.offset,
        center = ?model.center,
        "drew calibration pattern"
    );
    Ok(())
}

fn run_calibrate(args: CalibrateArgs) -> Result<()> {
    let mut model = load_model(&args.calibration)?;

    if let Some(radius) = args.radius {
        if radius == 0 {
            bail!("radius must be positive");
        }
        model.radius = radius;
    }
    if let Some(offset) = args.offset {
        if !offset.is_finite() || offset < 0.0 {
            bail!("offset must be a non-negative number, got {}", offset);
        }
        model.offset = offset;
    }
    if let Some(center) = args.center {
        model.center = center;
    }

    model.save(&args.calibration)?;
    info!(
        path = %args.calibration.display(),
        radius = model.radius,
        offset = model.offset,
        center = ?model.center,
        "saved calibration"
    );
    Ok(())
}

fn run_spin(args: SpinArgs) -> Result<()> {
    let model = load_model(&args.calibration)?;
    let image = EquirectImage::open(&args.image)?;
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let mut spin = Spin::with_velocity(args.speed * ROTATION_CONSTANT);
    for index in 0..args.frames {
        let options = spin.render_options(RenderOptions::default());
        let frame = FrameRenderer::with_options(&model, &image, options).render();
        let path = args.output_dir.join(format!("frame_{:04}.png", index));
        save_raster(&frame, &path)?;
        spin.tick();
    }

    info!(
        frames = args.frames,
        output_dir = %args.output_dir.display(),
        "rendered spin"
    );
    Ok(())
}
