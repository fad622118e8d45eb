//! Photo sink: persists captured frames as JPEG files.
//!
//! Invoked exactly once per capture action. A failed save is reported to the
//! caller and never retried here; the capture cooldown already prevents an
//! immediate retrigger.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::camera::Frame;

/// How photo filenames are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameScheme {
    /// `smile_0001.jpg`, `smile_0002.jpg`, ... skipping files already on disk.
    #[default]
    Sequence,
    /// `smile_20260806_142501.jpg`, with a numeric suffix on collisions.
    Timestamp,
}

/// Errors that can occur while saving a photo.
#[derive(Debug)]
pub enum PhotoError {
    /// Could not create the output directory
    CreateDirFailed { path: PathBuf, source: std::io::Error },
    /// Frame buffer did not form a valid image
    InvalidFrame { width: u32, height: u32 },
    /// Encoding or writing the file failed
    WriteFailed { path: PathBuf, message: String },
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "Failed to create photo directory '{}': {}",
                    path.display(),
                    source
                )
            }
            PhotoError::InvalidFrame { width, height } => {
                write!(f, "Frame buffer does not match {}x{} RGB", width, height)
            }
            PhotoError::WriteFailed { path, message } => {
                write!(f, "Failed to write photo '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for PhotoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PhotoError::CreateDirFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Writes photos into an output directory with collision-free names.
#[derive(Debug)]
pub struct PhotoSink {
    dir: PathBuf,
    scheme: FilenameScheme,
    /// Next sequence number to try; advances past names already on disk.
    next_seq: u32,
}

impl PhotoSink {
    /// Create a sink writing into `dir`. The directory is created lazily on
    /// the first save.
    pub fn new(dir: impl Into<PathBuf>, scheme: FilenameScheme) -> Self {
        Self {
            dir: dir.into(),
            scheme,
            next_seq: 1,
        }
    }

    /// Output directory this sink writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `frame` as a JPEG and return the path it was written to.
    ///
    /// Filenames never collide within a session: the sequence scheme skips
    /// indices already present on disk, and the timestamp scheme appends a
    /// numeric suffix when two saves land in the same second.
    pub fn save(&mut self, frame: &Frame) -> Result<PathBuf, PhotoError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PhotoError::CreateDirFailed {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.next_path();
        let image = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or(PhotoError::InvalidFrame {
                width: frame.width,
                height: frame.height,
            })?;
        image.save(&path).map_err(|e| PhotoError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(path)
    }

    fn next_path(&mut self) -> PathBuf {
        match self.scheme {
            FilenameScheme::Sequence => loop {
                let candidate = self.dir.join(format!("smile_{:04}.jpg", self.next_seq));
                self.next_seq += 1;
                if !candidate.exists() {
                    return candidate;
                }
            },
            FilenameScheme::Timestamp => {
                let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                let candidate = self.dir.join(format!("smile_{}.jpg", stamp));
                if !candidate.exists() {
                    return candidate;
                }
                let mut suffix = 1;
                loop {
                    let candidate = self.dir.join(format!("smile_{}_{}.jpg", stamp, suffix));
                    if !candidate.exists() {
                        return candidate;
                    }
                    suffix += 1;
                }
            }
        }
    }
}
