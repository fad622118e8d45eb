mod app;
mod camera;
mod config;
mod controller;
mod detector;
mod photo;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use app::AppSettings;
use camera::{CameraSettings, Resolution};
use controller::SessionOptions;
use detector::SmileParams;
use photo::FilenameScheme;

/// Parse and validate resolution (WIDTHxHEIGHT format)
fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 640x480)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in resolution", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in resolution", parts[1]))?;
    if width == 0 || height == 0 {
        return Err("Resolution width and height must be greater than 0".to_string());
    }
    Ok(Resolution { width, height })
}

/// Parse and validate framerate (1-120 fps)
fn parse_framerate(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid framerate", s))?;
    if !(1..=120).contains(&fps) {
        return Err(format!(
            "Framerate must be between 1 and 120 fps, got {}",
            fps
        ));
    }
    Ok(fps)
}

/// Parse and validate the smile threshold (0.0-1.0)
fn parse_smile_threshold(s: &str) -> Result<f32, String> {
    let threshold: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(format!(
            "Smile threshold must be between 0.0 and 1.0, got {}",
            threshold
        ));
    }
    Ok(threshold)
}

/// Automatic smile-triggered photo capture from your webcam
#[derive(Parser, Debug)]
#[command(name = "smilecam")]
#[command(version, about = "Smile at the camera; smilecam counts down and takes the photo", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Run with the default camera
    smilecam --model seeta_fd_frontal_v1.0.bin

    # Mirror the view, save with timestamp names
    smilecam --mirror --filename timestamp

    # Skip the countdown, capture on detection
    smilecam --no-countdown

    # List available cameras
    smilecam list-cameras

KEYS (while running):
    q / Esc / Ctrl+C   Quit")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Camera device index (from list-cameras)
    #[arg(long, short = 'c')]
    camera: Option<u32>,

    /// Mirror the preview horizontally
    #[arg(long)]
    mirror: bool,

    /// Capture resolution (WIDTHxHEIGHT, e.g., 640x480)
    #[arg(long, short = 'r', value_parser = parse_resolution)]
    resolution: Option<Resolution>,

    /// Target framerate (1-120 fps)
    #[arg(long, short = 'f', value_parser = parse_framerate)]
    fps: Option<u32>,

    /// Directory to save photos into
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Photo filename scheme
    #[arg(long, value_enum)]
    filename: Option<NameScheme>,

    /// Capture immediately on detection instead of counting down
    #[arg(long)]
    no_countdown: bool,

    /// Path to the SeetaFace detection model
    #[arg(long, short = 'm')]
    model: Option<PathBuf>,

    /// Smile sensitivity (0.0-1.0, lower triggers more easily)
    #[arg(long, value_parser = parse_smile_threshold)]
    smile_threshold: Option<f32>,

    /// Hide the status line
    #[arg(long)]
    no_status: bool,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

/// Photo filename scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NameScheme {
    Sequence,
    Timestamp,
}

impl From<NameScheme> for FilenameScheme {
    fn from(s: NameScheme) -> Self {
        match s {
            NameScheme::Sequence => FilenameScheme::Sequence,
            NameScheme::Timestamp => FilenameScheme::Timestamp,
        }
    }
}

/// Places the detection model is looked for when not set explicitly.
fn default_model_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("seeta_fd_frontal_v1.0.bin")];
    if let Some(data) = dirs::data_dir() {
        candidates.push(data.join("smilecam").join("seeta_fd_frontal_v1.0.bin"));
    }
    candidates
}

/// Resolve the model path: CLI > config > well-known locations.
fn resolve_model_path(
    cli: Option<PathBuf>,
    cfg: Option<PathBuf>,
) -> Result<PathBuf, String> {
    if let Some(path) = cli.or(cfg) {
        return Ok(path);
    }
    for candidate in default_model_candidates() {
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err("No face detection model found.\n\n\
         Download the SeetaFace frontal model (seeta_fd_frontal_v1.0.bin) from\n\
         the rustface repository and pass it with --model, or place it next to\n\
         the binary or under your data directory in smilecam/."
        .to_string())
}

fn run_list_cameras() -> Result<(), String> {
    let devices = camera::list_devices().map_err(|e| e.to_string())?;
    if devices.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }
    println!("Available cameras:");
    for device in &devices {
        println!("  {}", device);
    }
    Ok(())
}

fn run_config(action: ConfigAction, path: Option<PathBuf>) -> Result<(), String> {
    match action {
        ConfigAction::Show => {
            let cfg = config::Config::load(path.as_deref()).map_err(|e| e.to_string())?;
            println!(
                "Config file: {}",
                path.unwrap_or_else(config::default_path).display()
            );
            println!("{:#?}", cfg);
            Ok(())
        }
        ConfigAction::Init => {
            let written = config::Config::init(path.as_deref()).map_err(|e| e.to_string())?;
            println!("Wrote default config to {}", written.display());
            Ok(())
        }
    }
}

/// Merge CLI args over the config file into the resolved run settings.
fn build_settings(args: &Args, cfg: config::Config) -> Result<AppSettings, String> {
    let resolution = args
        .resolution
        .or_else(|| match (cfg.camera.width, cfg.camera.height) {
            (Some(width), Some(height)) => Some(Resolution { width, height }),
            _ => None,
        })
        .unwrap_or_default();

    let camera = CameraSettings {
        device_index: args.camera.or(cfg.camera.device).unwrap_or(0),
        resolution,
        fps: args.fps.or(cfg.camera.fps).unwrap_or(30),
        mirror: args.mirror || cfg.camera.mirror.unwrap_or(false),
    };

    let session = SessionOptions {
        enable_countdown: !args.no_countdown && cfg.controller.countdown,
        ticks_per_stage: cfg.controller.ticks_per_stage,
        cooldown_frames: cfg.controller.cooldown_frames,
        message_frames: cfg.controller.message_frames,
        commit_count_on: cfg.capture.count_on,
    };

    let smile_params = SmileParams {
        ratio_threshold: args
            .smile_threshold
            .or(cfg.detector.smile_threshold)
            .unwrap_or(SmileParams::default().ratio_threshold),
        ..SmileParams::default()
    };

    let model_path = resolve_model_path(args.model.clone(), cfg.detector.model)?;

    Ok(AppSettings {
        camera,
        session,
        model_path,
        min_face_size: cfg.detector.min_face_size.unwrap_or(40),
        smile_params,
        output_dir: args
            .output_dir
            .clone()
            .or(cfg.capture.output_dir)
            .unwrap_or_else(|| PathBuf::from("captured_smiles")),
        filename: args.filename.map(Into::into).unwrap_or(cfg.capture.filename),
        status_bar: !args.no_status && cfg.ui.status_bar,
    })
}

fn run_capture(args: &Args) -> Result<(), String> {
    let cfg = config::Config::load(args.config.as_deref()).map_err(|e| e.to_string())?;
    let settings = build_settings(args, cfg)?;

    if let Err(e) = app::setup_shutdown_handler() {
        eprintln!("Warning: Could not set up Ctrl+C handler: {}", e);
    }

    println!("smilecam {} - smile to capture, q to quit", env!("CARGO_PKG_VERSION"));
    println!("Photos will be saved to {}", settings.output_dir.display());

    let summary = app::run(settings).map_err(|e| e.to_string())?;
    println!("Capture stopped. Photos this session: {}", summary.photos);
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();

    let result = match &args.command {
        Some(Command::ListCameras) => run_list_cameras(),
        Some(Command::Config { action }) => run_config(action.clone(), args.config.clone()),
        None => run_capture(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["smilecam"]);
        assert!(args.command.is_none());
        assert!(args.camera.is_none());
        assert!(!args.mirror);
        assert!(args.resolution.is_none());
        assert!(args.fps.is_none());
        assert!(!args.no_countdown);
        assert!(!args.no_status);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_resolution_valid() {
        assert_eq!(
            parse_resolution("640x480").unwrap(),
            Resolution {
                width: 640,
                height: 480
            }
        );
        assert_eq!(
            parse_resolution("1280x720").unwrap(),
            Resolution {
                width: 1280,
                height: 720
            }
        );
    }

    #[test]
    fn test_parse_resolution_invalid() {
        assert!(parse_resolution("640").is_err());
        assert!(parse_resolution("640:480").is_err());
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("widthxheight").is_err());
    }

    #[test]
    fn test_parse_framerate_bounds() {
        assert_eq!(parse_framerate("30").unwrap(), 30);
        assert_eq!(parse_framerate("1").unwrap(), 1);
        assert_eq!(parse_framerate("120").unwrap(), 120);
        assert!(parse_framerate("0").is_err());
        assert!(parse_framerate("121").is_err());
        assert!(parse_framerate("abc").is_err());
    }

    #[test]
    fn test_parse_smile_threshold_bounds() {
        assert_eq!(parse_smile_threshold("0.28").unwrap(), 0.28);
        assert!(parse_smile_threshold("-0.1").is_err());
        assert!(parse_smile_threshold("1.1").is_err());
        assert!(parse_smile_threshold("lots").is_err());
    }

    #[test]
    fn test_build_settings_defaults() {
        let args = Args::parse_from(["smilecam", "--model", "model.bin"]);
        let settings = build_settings(&args, config::Config::default()).expect("settings");
        assert_eq!(settings.camera.device_index, 0);
        assert_eq!(settings.camera.resolution, Resolution::MEDIUM);
        assert_eq!(settings.camera.fps, 30);
        assert!(!settings.camera.mirror);
        assert!(settings.session.enable_countdown);
        assert_eq!(settings.session.ticks_per_stage, 30);
        assert_eq!(settings.session.cooldown_frames, 90);
        assert_eq!(settings.output_dir, PathBuf::from("captured_smiles"));
        assert!(settings.status_bar);
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "smilecam",
            "--model",
            "model.bin",
            "--camera",
            "2",
            "--fps",
            "15",
            "--no-countdown",
            "--no-status",
            "--filename",
            "timestamp",
        ]);
        let cfg: config::Config = toml::from_str(
            r#"
            [camera]
            device = 1
            fps = 60

            [capture]
            filename = "sequence"
        "#,
        )
        .expect("config");

        let settings = build_settings(&args, cfg).expect("settings");
        assert_eq!(settings.camera.device_index, 2);
        assert_eq!(settings.camera.fps, 15);
        assert!(!settings.session.enable_countdown);
        assert!(!settings.status_bar);
        assert_eq!(settings.filename, FilenameScheme::Timestamp);
    }

    #[test]
    fn test_config_fills_when_cli_silent() {
        let args = Args::parse_from(["smilecam", "--model", "model.bin"]);
        let cfg: config::Config = toml::from_str(
            r#"
            [camera]
            device = 1
            mirror = true

            [controller]
            cooldown_frames = 45
        "#,
        )
        .expect("config");

        let settings = build_settings(&args, cfg).expect("settings");
        assert_eq!(settings.camera.device_index, 1);
        assert!(settings.camera.mirror);
        assert_eq!(settings.session.cooldown_frames, 45);
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let args = Args::parse_from(["smilecam"]);
        let result = build_settings(&args, config::Config::default());
        // No --model, no config entry, no file on disk: must fail with the
        // download hint rather than later at detector load time.
        match result {
            Err(msg) => assert!(msg.contains("seeta_fd_frontal_v1.0.bin")),
            Ok(settings) => {
                // Only reachable if a model file happens to sit in the test
                // working directory.
                assert!(settings.model_path.exists());
            }
        }
    }
}
