//! webcam: capture photos of paper notes from a USB webcam
//!
//! Auto-detects an external camera, uses its largest supported resolution,
//! and writes an original plus an `oxipng`-optimised PNG.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
use webcam_core::capture::CaptureSequencer;
use webcam_core::config::Settings;
use webcam_core::deps::check_dependencies;
use webcam_core::device::parse_device_listing;
use webcam_core::error::WebcamError;
use webcam_core::model::{DEFAULT_AVERAGE_FRAMES, DEFAULT_SKIP_FRAMES, SnapRequest, SnapStage};
use webcam_core::process::SystemRunner;
use webcam_core::util::format::format_bytes;
use webcam_core::util::label::label_or_timestamp;
use webcam_core::v4l2::V4l2Ctl;

const AFTER_HELP: &str = "\
ENVIRONMENT:
  WEBCAM_DEVICE        Override default device
  WEBCAM_RES           Override default resolution
  WEBCAM_OUTPUT_DIR    Override output directory (default: notes-captures)
  RUST_LOG             Diagnostic log filter

EXAMPLES:
  webcam list
  webcam caps
  webcam snap my-notes
  webcam snap -r 3840x2160 -d /dev/video2 hires

PREREQUISITES:
  sudo apt install fswebcam v4l-utils
  cargo install oxipng  (optional, for PNG optimization)";

#[derive(Parser)]
#[command(name = "webcam")]
#[command(about = "Capture photos from USB webcam", version)]
#[command(arg_required_else_help = true, after_help = AFTER_HELP)]
struct Cli {
    /// Write diagnostic logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available video devices
    #[command(visible_alias = "l")]
    List {
        /// Print the parsed device groups as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show camera capabilities and controls
    #[command(visible_alias = "c")]
    Caps {
        /// Video device (default: auto-detect external)
        device:      Option<String>,
        /// Video device, same as the positional argument
        #[arg(short = 'd', long = "device", value_name = "PATH")]
        device_flag: Option<String>,
    },
    /// Take a photo (saves as PNG)
    #[command(visible_alias = "s")]
    Snap {
        /// Label for the output files (default: notes-<timestamp>)
        name:           Option<String>,
        /// Video device (default: auto-detect external)
        #[arg(short, long, value_name = "PATH")]
        device:         Option<String>,
        /// Capture resolution (default: max supported)
        #[arg(short, long, value_name = "WxH")]
        resolution:     Option<String>,
        /// Minimal output
        #[arg(short, long)]
        quiet:          bool,
        /// Frames to discard before capturing
        #[arg(long, default_value_t = DEFAULT_SKIP_FRAMES)]
        skip_frames:    u32,
        /// Frames to average into the image
        #[arg(long, default_value_t = DEFAULT_AVERAGE_FRAMES)]
        average_frames: u32,
        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output_dir:     Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    if let Err(e) = init_logging(cli.log_json) {
        error(&format!("{e:#}"));
        return ExitCode::from(1);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

fn init_logging(json: bool) -> Result<()> {
    // Respects RUST_LOG; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("webcam_cli=info,webcam_core=warn"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env();
    let runner = Arc::new(SystemRunner::new());
    check_dependencies(runner.as_ref())?;

    let sequencer = CaptureSequencer::new(runner, settings);

    match cli.command {
        Commands::List { json } => list_devices(&sequencer, json).await,
        Commands::Caps {
            device,
            device_flag,
        } => show_capabilities(&sequencer, device_flag.or(device)).await,
        Commands::Snap {
            name,
            device,
            resolution,
            quiet,
            skip_frames,
            average_frames,
            output_dir,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| sequencer.settings().output_dir.clone());
            let request = SnapRequest {
                label: name,
                device,
                resolution,
                skip_frames,
                average_frames,
                output_dir,
            };
            snap(&sequencer, request, quiet).await
        }
    }
}

async fn list_devices(sequencer: &CaptureSequencer, json: bool) -> Result<()> {
    let listing = match V4l2Ctl::new(sequencer.runner()).list_devices().await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::debug!("Device listing failed: {}", e);
            error("No video devices found");
            return Ok(());
        }
    };

    if json {
        let groups = parse_device_listing(&listing);
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        println!("Available video devices:\n");
        print!("{listing}");
    }

    Ok(())
}

async fn show_capabilities(sequencer: &CaptureSequencer, device: Option<String>) -> Result<()> {
    let device = sequencer.resolve_device(device.as_deref()).await?;
    let v4l2 = V4l2Ctl::new(sequencer.runner());

    println!("Device: {device}\n");

    println!("=== Supported Formats & Resolutions ===\n");
    print!("{}", v4l2.list_formats(&device).await?);

    println!("\n=== Camera Controls ===\n");
    print!("{}", v4l2.list_controls(&device).await?);

    println!("\n=== Tips for paper notes ===");
    println!("• Max resolution is auto-detected and used by default");
    println!("• Good lighting reduces noise and improves sharpness");
    println!("• Disable auto-focus to prevent hunting:\n");
    println!("  v4l2-ctl -d {device} --set-ctrl=focus_automatic_continuous=0");
    println!("  v4l2-ctl -d {device} --set-ctrl=focus_absolute=30");
    println!();

    Ok(())
}

async fn snap(sequencer: &CaptureSequencer, request: SnapRequest, quiet: bool) -> Result<()> {
    // Resolve up front so the summary can be shown before the capture starts
    let device = sequencer.resolve_device(request.device.as_deref()).await?;
    let resolution = sequencer
        .resolve_resolution(&device, request.resolution.as_deref())
        .await?;
    let label = label_or_timestamp(request.label.as_deref());

    if !quiet {
        println!("Capturing...");
        println!("  Device:     {device}");
        println!("  Resolution: {resolution}");
        println!(
            "  Frames:     skip {}, average {}",
            request.skip_frames, request.average_frames
        );
        println!("  Output:     {}/{label}_*.png", request.output_dir.display());
        println!();
    }

    let request = SnapRequest {
        label: Some(label),
        device: Some(device),
        resolution: Some(resolution.to_string()),
        ..request
    };
    let report = sequencer
        .snap_with_progress(&request, |stage| {
            if let Some(line) = progress_line(stage, quiet) {
                println!("{line}");
            }
        })
        .await?;

    success(&format!(
        "{} ({})",
        report.output.original.display(),
        format_bytes(report.original_size as i64)
    ));

    match (report.optimised_size, report.bytes_saved()) {
        (Some(size), Some(saved)) => success(&format!(
            "{} ({}, saved {})",
            report.output.optimised.display(),
            format_bytes(size as i64),
            format_bytes(saved)
        )),
        _ if !quiet => warn(&WebcamError::OptimizerUnavailable.remediation_hint()),
        _ => {}
    }

    Ok(())
}

/// Progress text shown as a snap moves into `stage`
fn progress_line(stage: SnapStage, quiet: bool) -> Option<&'static str> {
    match stage {
        SnapStage::Optimizing if !quiet => Some("Optimizing PNG..."),
        _ => None,
    }
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<WebcamError>() {
        Some(e) => {
            error(&e.to_string());
            eprintln!("  {}", e.remediation_hint());
        }
        None => error(&format!("{err:#}")),
    }
    ExitCode::from(exit_code(err))
}

/// Exit status for a failed run
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<WebcamError>()
        .map(WebcamError::exit_code)
        .unwrap_or(1)
}

fn success(msg: &str) {
    println!("✓ {msg}");
}

fn warn(msg: &str) {
    println!("! {msg}");
}

fn error(msg: &str) {
    eprintln!("✗ {msg}");
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_snap_arguments() {
        let cli = Cli::try_parse_from([
            "webcam", "snap", "-d", "/dev/video2", "-r", "3840x2160", "-q", "hires",
        ])
        .unwrap();

        match cli.command {
            Commands::Snap {
                name,
                device,
                resolution,
                quiet,
                skip_frames,
                average_frames,
                output_dir,
            } => {
                assert_eq!(name.as_deref(), Some("hires"));
                assert_eq!(device.as_deref(), Some("/dev/video2"));
                assert_eq!(resolution.as_deref(), Some("3840x2160"));
                assert!(quiet);
                assert_eq!(skip_frames, 30);
                assert_eq!(average_frames, 3);
                assert_eq!(output_dir, None);
            }
            _ => panic!("expected snap"),
        }
    }

    #[test]
    fn test_aliases() {
        assert!(matches!(
            Cli::try_parse_from(["webcam", "l"]).unwrap().command,
            Commands::List { json: false }
        ));
        assert!(matches!(
            Cli::try_parse_from(["webcam", "s"]).unwrap().command,
            Commands::Snap { .. }
        ));
        let caps = Cli::try_parse_from(["webcam", "c", "/dev/video4"]).unwrap();
        assert!(matches!(
            caps.command,
            Commands::Caps { device: Some(ref d), device_flag: None } if d == "/dev/video4"
        ));
    }

    #[test]
    fn test_caps_device_flag() {
        let cli = Cli::try_parse_from(["webcam", "caps", "-d", "/dev/video2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Caps { device: None, device_flag: Some(ref d) } if d == "/dev/video2"
        ));
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let err = Cli::try_parse_from(["webcam", "record"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_no_arguments_shows_help() {
        let err = Cli::try_parse_from(["webcam"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand);
    }

    #[test]
    fn test_optimizing_progress_respects_quiet() {
        assert_eq!(progress_line(SnapStage::Optimizing, false), Some("Optimizing PNG..."));
        assert_eq!(progress_line(SnapStage::Optimizing, true), None);
        assert_eq!(progress_line(SnapStage::Capturing, false), None);
        assert_eq!(progress_line(SnapStage::Done, false), None);
    }

    #[test]
    fn test_failures_exit_with_one() {
        let no_device = anyhow::Error::from(WebcamError::NoDeviceFound);
        let capture = anyhow::Error::from(WebcamError::CaptureFailed {
            device: "/dev/video2".to_string(),
            reason: "timeout".to_string(),
        });
        let other = anyhow::anyhow!("serialization failed");

        assert_eq!(exit_code(&no_device), 1);
        assert_eq!(exit_code(&capture), 1);
        assert_eq!(exit_code(&other), 1);
    }
}
