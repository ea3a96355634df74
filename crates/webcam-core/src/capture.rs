//! Capture sequencing
//!
//! A snap walks a fixed sequence of stages:
//!
//! ```text
//! Idle -> ResolvingDevice -> ResolvingResolution -> Capturing -> Optimizing -> Done
//!                                                          \-> Done (no oxipng)
//! ```
//!
//! Any fatal error moves the run to `Failed`. Nothing is retried, and a
//! failed capture never reaches the optimizer.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::deps::{FSWEBCAM, OXIPNG};
use crate::device::{override_device, parse_device_listing, select_device};
use crate::error::{WebcamError, WebcamResult};
use crate::model::{CaptureOutput, Resolution, SnapReport, SnapRequest, SnapStage};
use crate::process::CommandRunner;
use crate::resolution::{FALLBACK_RESOLUTION, max_resolution};
use crate::util::label::label_or_timestamp;
use crate::v4l2::V4l2Ctl;

/// Arguments for `fswebcam`: PNG at compression 0, no banner
pub fn fswebcam_args(
    device: &str,
    resolution: Resolution,
    skip_frames: u32,
    average_frames: u32,
    output: &Path,
) -> Vec<String> {
    vec![
        "-d".to_string(),
        device.to_string(),
        "-r".to_string(),
        resolution.to_string(),
        "--png".to_string(),
        "0".to_string(),
        "--no-banner".to_string(),
        "-S".to_string(),
        skip_frames.to_string(),
        "-F".to_string(),
        average_frames.to_string(),
        output.display().to_string(),
    ]
}

/// Arguments for `oxipng`: level 4, strip safe metadata, in place
pub fn oxipng_args(path: &Path) -> Vec<String> {
    vec![
        "-o".to_string(),
        "4".to_string(),
        "--strip".to_string(),
        "safe".to_string(),
        path.display().to_string(),
    ]
}

/// Resolves devices and resolutions and drives the capture tools
pub struct CaptureSequencer {
    runner:   Arc<dyn CommandRunner>,
    settings: Settings,
}

impl CaptureSequencer {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: Settings) -> Self {
        Self { runner, settings }
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Picks the device: `explicit` > `WEBCAM_DEVICE` > `v4l2-ctl` listing
    ///
    /// The listing is only queried when no override is set. A failing
    /// listing is treated as empty.
    pub async fn resolve_device(&self, explicit: Option<&str>) -> WebcamResult<String> {
        if let Some(device) = override_device(explicit, self.settings.device.as_deref()) {
            tracing::debug!("Using device override {}", device);
            return Ok(device);
        }

        let listing = match V4l2Ctl::new(self.runner()).list_devices().await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!("Device listing failed: {}", e);
                String::new()
            }
        };

        let device = select_device(&parse_device_listing(&listing))
            .ok_or(WebcamError::NoDeviceFound)?;
        tracing::debug!("Auto-detected device {}", device);
        Ok(device)
    }

    /// Picks the resolution: `explicit` > `WEBCAM_RES` > largest discrete
    /// size > [`FALLBACK_RESOLUTION`]
    ///
    /// # Errors
    ///
    /// [`WebcamError::InvalidResolution`] if an override is not `WxH`.
    pub async fn resolve_resolution(
        &self,
        device: &str,
        explicit: Option<&str>,
    ) -> WebcamResult<Resolution> {
        let requested = [explicit, self.settings.resolution.as_deref()]
            .into_iter()
            .flatten()
            .find(|r| !r.trim().is_empty());
        if let Some(requested) = requested {
            return requested.parse();
        }

        match V4l2Ctl::new(self.runner()).list_formats(device).await {
            Ok(caps) => Ok(max_resolution(&caps).unwrap_or_else(|| {
                tracing::warn!(
                    "No discrete sizes reported by {}, using {}",
                    device,
                    FALLBACK_RESOLUTION
                );
                FALLBACK_RESOLUTION
            })),
            Err(e) => {
                tracing::warn!("Format query failed ({}), using {}", e, FALLBACK_RESOLUTION);
                Ok(FALLBACK_RESOLUTION)
            }
        }
    }

    /// Runs one capture end to end
    ///
    /// On success both the original and (if `oxipng` is installed) the
    /// optimised file exist. When `oxipng` is missing the report has no
    /// optimised size; that is not an error.
    pub async fn snap(&self, request: &SnapRequest) -> WebcamResult<SnapReport> {
        self.snap_with_progress(request, |_| {}).await
    }

    /// Like [`snap`](Self::snap), calling `on_stage` on every stage change
    pub async fn snap_with_progress<F>(
        &self,
        request: &SnapRequest,
        mut on_stage: F,
    ) -> WebcamResult<SnapReport>
    where
        F: FnMut(SnapStage) + Send,
    {
        let mut progress = Progress {
            stage:    SnapStage::Idle,
            on_stage: &mut on_stage,
        };
        let result = self.run_stages(request, &mut progress).await;
        if let Err(ref e) = result {
            tracing::debug!("Snap failed during {}: {}", progress.stage, e);
            progress.advance(SnapStage::Failed);
        }
        result
    }

    async fn run_stages(
        &self,
        request: &SnapRequest,
        progress: &mut Progress<'_>,
    ) -> WebcamResult<SnapReport> {
        progress.advance(SnapStage::ResolvingDevice);
        let device = self.resolve_device(request.device.as_deref()).await?;

        progress.advance(SnapStage::ResolvingResolution);
        let resolution = self
            .resolve_resolution(&device, request.resolution.as_deref())
            .await?;

        let label = label_or_timestamp(request.label.as_deref());
        let output = CaptureOutput::new(&request.output_dir, &label);
        tokio::fs::create_dir_all(&request.output_dir).await?;

        progress.advance(SnapStage::Capturing);
        let original_size = self
            .capture(&device, resolution, request, &output.original)
            .await?;

        let optimised_size = if self.runner.is_available(OXIPNG) {
            progress.advance(SnapStage::Optimizing);
            Some(self.optimise(&output.original, &output.optimised).await?)
        } else {
            // Reported to the user by the caller, which knows about quiet mode
            tracing::debug!("{}", WebcamError::OptimizerUnavailable);
            None
        };

        progress.advance(SnapStage::Done);
        Ok(SnapReport {
            device,
            resolution,
            output,
            original_size,
            optimised_size,
            stage: progress.stage,
        })
    }

    /// Runs fswebcam and returns the size of the written file
    async fn capture(
        &self,
        device: &str,
        resolution: Resolution,
        request: &SnapRequest,
        target: &Path,
    ) -> WebcamResult<u64> {
        let capture_failed = |reason: String| WebcamError::CaptureFailed {
            device: device.to_string(),
            reason,
        };

        let args = fswebcam_args(
            device,
            resolution,
            request.skip_frames,
            request.average_frames,
            target,
        );
        let output = self
            .runner
            .run(FSWEBCAM, &args)
            .await
            .map_err(|e| capture_failed(e.to_string()))?;
        if !output.is_success() {
            return Err(capture_failed(output.error_text()));
        }

        // fswebcam can exit 0 without writing anything
        match tokio::fs::metadata(target).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(capture_failed(format!(
                "{} wrote no file ({})",
                FSWEBCAM,
                output.error_text()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Copies `original` to `optimised`, optimizes the copy in place and
    /// returns its new size
    async fn optimise(&self, original: &Path, optimised: &Path) -> WebcamResult<u64> {
        tokio::fs::copy(original, optimised).await?;

        let optimization_failed = |reason: String| WebcamError::OptimizationFailed {
            path: optimised.to_path_buf(),
            reason,
        };

        let output = self
            .runner
            .run(OXIPNG, &oxipng_args(optimised))
            .await
            .map_err(|e| optimization_failed(e.to_string()))?;
        if !output.is_success() {
            return Err(optimization_failed(output.error_text()));
        }

        Ok(tokio::fs::metadata(optimised).await?.len())
    }
}

/// Current stage of a running snap plus its observer
struct Progress<'a> {
    stage:    SnapStage,
    on_stage: &'a mut (dyn FnMut(SnapStage) + Send),
}

impl Progress<'_> {
    fn advance(&mut self, next: SnapStage) {
        tracing::debug!("snap: {} -> {}", self.stage, next);
        self.stage = next;
        (self.on_stage)(next);
    }
}
