//! Data models and type definitions for webcam-core
//!
//! This module defines the core types used throughout the crate:
//! - [`Resolution`] and its `WxH` text form
//! - [`DeviceGroup`] parsed from `v4l2-ctl --list-devices`
//! - Capture request/outcome types for the snap sequence

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WebcamError;

/// Default number of frames fswebcam discards before capturing
pub const DEFAULT_SKIP_FRAMES: u32 = 30;

/// Default number of frames fswebcam averages into the final image
pub const DEFAULT_AVERAGE_FRAMES: u32 = 3;

/// Output directory used when neither a flag nor `WEBCAM_OUTPUT_DIR` is set
pub const DEFAULT_OUTPUT_DIR: &str = "notes-captures";

/// A discrete capture size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels (non-zero)
    pub width:  u32,
    /// Height in pixels (non-zero)
    pub height: u32,
}

impl Resolution {
    /// Creates a resolution, rejecting zero-sized dimensions
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Total pixel count
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = WebcamError;

    /// Parses `WIDTHxHEIGHT` (case-insensitive `x`, surrounding spaces allowed)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| WebcamError::InvalidResolution {
            value:  s.to_string(),
            reason: reason.to_string(),
        };

        let lower = s.trim().to_ascii_lowercase();
        let (w, h) = lower
            .split_once('x')
            .ok_or_else(|| invalid("expected WIDTHxHEIGHT"))?;
        let width: u32 = w.trim().parse().map_err(|_| invalid("width is not a number"))?;
        let height: u32 = h.trim().parse().map_err(|_| invalid("height is not a number"))?;

        Resolution::new(width, height).ok_or_else(|| invalid("dimensions must be positive"))
    }
}

/// One group of `v4l2-ctl --list-devices` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroup {
    /// Friendly name from the header line, without the trailing colon
    pub name:  String,
    /// Device nodes listed under the header, in order
    pub paths: Vec<String>,
}

impl DeviceGroup {
    /// Whether the header marks a built-in laptop camera
    pub fn is_integrated(&self) -> bool {
        self.name.to_lowercase().contains("integrated")
    }

    /// Video capture nodes (`/dev/video*`) of this group
    pub fn video_paths(&self) -> impl Iterator<Item = &str> {
        self.paths
            .iter()
            .map(String::as_str)
            .filter(|p| is_video_node(p))
    }
}

/// Whether a path names a V4L2 video node
pub fn is_video_node(path: &str) -> bool {
    path.starts_with("/dev/video")
}

/// The pair of files a capture produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOutput {
    /// Label shared by both files
    pub label:     String,
    /// Unmodified capture, `<label>_original.png`
    pub original:  PathBuf,
    /// Optimizer target, `<label>_optimised.png`
    pub optimised: PathBuf,
}

impl CaptureOutput {
    /// Builds the output paths for `label` under `dir`
    pub fn new(dir: &Path, label: &str) -> Self {
        Self {
            label:     label.to_string(),
            original:  dir.join(format!("{label}_original.png")),
            optimised: dir.join(format!("{label}_optimised.png")),
        }
    }
}

/// Stages of a single snap invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapStage {
    Idle,
    ResolvingDevice,
    ResolvingResolution,
    Capturing,
    Optimizing,
    Done,
    Failed,
}

impl SnapStage {
    /// Returns the stage as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapStage::Idle => "idle",
            SnapStage::ResolvingDevice => "resolving_device",
            SnapStage::ResolvingResolution => "resolving_resolution",
            SnapStage::Capturing => "capturing",
            SnapStage::Optimizing => "optimizing",
            SnapStage::Done => "done",
            SnapStage::Failed => "failed",
        }
    }
}

impl fmt::Display for SnapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for one capture
///
/// `device` and `resolution` are explicit overrides; when `None` they are
/// resolved from the environment settings and then from `v4l2-ctl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapRequest {
    pub label:          Option<String>,
    pub device:         Option<String>,
    pub resolution:     Option<String>,
    pub skip_frames:    u32,
    pub average_frames: u32,
    pub output_dir:     PathBuf,
}

impl Default for SnapRequest {
    fn default() -> Self {
        Self {
            label:          None,
            device:         None,
            resolution:     None,
            skip_frames:    DEFAULT_SKIP_FRAMES,
            average_frames: DEFAULT_AVERAGE_FRAMES,
            output_dir:     PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Outcome of a successful capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapReport {
    pub device:         String,
    pub resolution:     Resolution,
    pub output:         CaptureOutput,
    pub original_size:  u64,
    /// Size of the optimised copy, `None` when the optimizer was unavailable
    pub optimised_size: Option<u64>,
    pub stage:          SnapStage,
}

impl SnapReport {
    /// Bytes saved by optimization (negative if the copy grew)
    pub fn bytes_saved(&self) -> Option<i64> {
        self.optimised_size
            .map(|optimised| self.original_size as i64 - optimised as i64)
    }
}
