//! Configuration file handling for smilecam.
//!
//! Loads configuration from `~/.config/smilecam/config.toml` or a custom
//! path. Settings merge as: CLI args > config file > built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::controller::CommitCountOn;
use crate::photo::FilenameScheme;

/// Configuration file structure for smilecam.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    /// Camera device index
    pub device: Option<u32>,
    /// Mirror the preview horizontally
    pub mirror: Option<bool>,
    /// Requested capture width
    pub width: Option<u32>,
    /// Requested capture height
    pub height: Option<u32>,
    /// Requested frame rate
    pub fps: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DetectorConfig {
    /// Path to the SeetaFace detection model
    pub model: Option<PathBuf>,
    /// Minimum face size in pixels
    pub min_face_size: Option<u32>,
    /// Smile heuristic threshold (dark-band width / face width)
    pub smile_threshold: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct ControllerConfig {
    /// Run the 3-2-1 countdown before capturing
    #[serde(default = "default_true")]
    pub countdown: bool,
    /// Frames per countdown stage
    #[serde(default = "default_ticks_per_stage")]
    pub ticks_per_stage: u32,
    /// Frames of cooldown after a capture
    #[serde(default = "default_cooldown_frames")]
    pub cooldown_frames: u32,
    /// Frames the capture acknowledgment is shown
    #[serde(default = "default_message_frames")]
    pub message_frames: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            countdown: true,
            ticks_per_stage: default_ticks_per_stage(),
            cooldown_frames: default_cooldown_frames(),
            message_frames: default_message_frames(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct CaptureConfig {
    /// Directory photos are written into
    pub output_dir: Option<PathBuf>,
    /// Filename scheme for saved photos
    #[serde(default)]
    pub filename: FilenameScheme,
    /// When a photo counts toward the session total
    #[serde(default)]
    pub count_on: CommitCountOn,
}

#[derive(Debug, Deserialize)]
pub struct UiConfig {
    /// Show the persistent status line
    #[serde(default = "default_true")]
    pub status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { status_bar: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_ticks_per_stage() -> u32 {
    30
}

fn default_cooldown_frames() -> u32 {
    90
}

fn default_message_frames() -> u32 {
    30
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Write a commented default config to `path`, creating parent
    /// directories as needed. Refuses to overwrite an existing file.
    pub fn init(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);
        if path.exists() {
            return Err(ConfigError::AlreadyExists { path });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
        }
        std::fs::write(&path, DEFAULT_TEMPLATE).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

/// Template written by `smilecam config init`.
const DEFAULT_TEMPLATE: &str = r#"# smilecam configuration

[camera]
# device = 0
# mirror = false
# width = 640
# height = 480
# fps = 30

[detector]
# Path to the SeetaFace frontal face model
# model = "/usr/share/smilecam/seeta_fd_frontal_v1.0.bin"
# min_face_size = 40
# smile_threshold = 0.28

[controller]
# countdown = true
# ticks_per_stage = 30
# cooldown_frames = 90
# message_frames = 30

[capture]
# output_dir = "captured_smiles"
# filename = "sequence"   # or "timestamp"
# count_on = "success"    # or "attempt"

[ui]
# status_bar = true
"#;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    AlreadyExists {
        path: PathBuf,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::AlreadyExists { path } => {
                write!(f, "Config file '{}' already exists", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::AlreadyExists { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("smilecam").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/smilecam/config.toml")
        })
}
