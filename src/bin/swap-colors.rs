// CLI entry for swap_colors
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use log::{debug, info};
use std::path::PathBuf;
use std::process::ExitCode;

use swap_colors::constants::DEFAULT_EXPORT_NAME;
use swap_colors::image_loader::{load_image, save_png};
use swap_colors::{EngineConfig, HsvColor, RecolorError, RecolorSession, Rgb};

#[derive(Parser, Debug)]
#[command(name = "swap-colors", version, about = "Find dominant colors and recolor them")]
struct Cli {
    /// JSON configuration file (missing fields use defaults)
    #[arg(long = "config", global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ranked palette of an image
    Palette {
        /// Input image path
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Print JSON instead of a table
        #[arg(long = "json")]
        json: bool,
    },
    /// Recolor one palette color and write a PNG
    Recolor(RecolorArgs),
}

#[derive(Args, Debug)]
struct RecolorArgs {
    /// Input image path
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output PNG path
    #[arg(short = 'o', long = "output", default_value = DEFAULT_EXPORT_NAME, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Palette index of the color to replace (0 = most frequent)
    #[arg(short = 'i', long = "index", conflicts_with = "reference")]
    index: Option<usize>,
    /// Reference color as hex, e.g. "#ff0000"
    #[arg(short = 'r', long = "reference")]
    reference: Option<String>,

    /// Target hue in degrees [0, 360]
    #[arg(long = "hue")]
    hue: Option<f64>,
    /// Target saturation in percent [0, 100]
    #[arg(long = "saturation")]
    saturation: Option<f64>,
    /// Target value in percent [0, 100]
    #[arg(long = "value")]
    value: Option<f64>,

    /// Match tolerance (radius = tolerance * 2.5 in RGB space)
    #[arg(short = 't', long = "tolerance")]
    tolerance: Option<f64>,
}

/// Exit status for bad input the user can correct and retry
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{:?}", err);
            eprintln!("error: {}", error_report(&err));
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Message shown to the user: the library's own wording for engine errors,
/// the full context chain otherwise
fn error_report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<RecolorError>() {
        Some(engine) => engine.user_message(),
        None => format!("{:#}", err),
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RecolorError>() {
        Some(engine) if engine.is_recoverable() => EXIT_USAGE,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut session = RecolorSession::new(config)?;

    match cli.command {
        Command::Palette { input, json } => print_palette(&mut session, input, json),
        Command::Recolor(args) => recolor(&mut session, args),
    }
}

fn print_palette(session: &mut RecolorSession, input: PathBuf, json: bool) -> Result<()> {
    let image = load_image(&input).with_context(|| format!("reading {}", input.display()))?;
    let palette = session.load(image);

    if json {
        println!("{}", serde_json::to_string_pretty(palette.frequencies())?);
        return Ok(());
    }
    if palette.is_empty() {
        println!("No opaque colors found in {}", input.display());
        return Ok(());
    }
    for (i, entry) in palette.iter().enumerate() {
        let hsv = entry.color.to_hsv().rounded();
        println!(
            "{:>2}  {}  {:<20} {:<24} {}",
            i,
            entry.color.to_hex(),
            entry.color.to_string(),
            hsv.to_string(),
            entry.count
        );
    }
    Ok(())
}

fn recolor(session: &mut RecolorSession, args: RecolorArgs) -> Result<()> {
    let image = load_image(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    session.load(image);

    let reference = match (args.index, &args.reference) {
        (Some(index), _) => session.select(index)?,
        (None, Some(hex)) => {
            let color = Rgb::from_hex(hex)?;
            session.select_color(color);
            color
        }
        (None, None) => bail!("either --index or --reference is required"),
    };

    let seeded = session.target();
    let target = HsvColor::new(
        args.hue.unwrap_or(seeded.h),
        args.saturation.unwrap_or(seeded.s),
        args.value.unwrap_or(seeded.v),
    )?;
    session.set_target(target)?;
    if let Some(tolerance) = args.tolerance {
        session.set_tolerance(tolerance)?;
    }

    let (result, stats) = session.apply()?;
    save_png(result, &args.output).with_context(|| format!("writing {}", args.output.display()))?;

    info!("Wrote {}", args.output.display());
    println!(
        "Replaced {} ({}) with {} in {} of {} pixels -> {}",
        reference,
        reference.to_hex(),
        target.to_rgb().to_hex(),
        stats.matched,
        stats.total_pixels,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_use_user_message() {
        let err = anyhow::Error::new(RecolorError::ColorIndexOutOfRange { index: 7, len: 3 });
        assert_eq!(
            error_report(&err),
            "Color #7 does not exist; the palette has 3 colors."
        );
        assert_eq!(exit_status(&err), EXIT_USAGE);
    }

    #[test]
    fn test_context_does_not_hide_engine_error() {
        let err = anyhow::Error::new(RecolorError::ImageLoadError {
            message: "truncated file".to_string(),
            source: None,
        })
            .context("reading broken.png");
        assert_eq!(
            error_report(&err),
            "Could not load the image. Please check the file format and try again."
        );
        assert_eq!(exit_status(&err), 1);
    }

    #[test]
    fn test_other_errors_keep_chain() {
        let err = anyhow::anyhow!("either --index or --reference is required");
        assert_eq!(error_report(&err), "either --index or --reference is required");
        assert_eq!(exit_status(&err), 1);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
