//! End-to-end snap sequencing through real processes
//!
//! These tests run [`SystemRunner`] against fake `v4l2-ctl`, `fswebcam` and
//! `oxipng` scripts from `webcam-test-utils`, with the toolbox directory as
//! the only `PATH` entry.

#![cfg(unix)]

use std::sync::Arc;

use webcam_core::capture::CaptureSequencer;
use webcam_core::config::Settings;
use webcam_core::deps::check_dependencies;
use webcam_core::error::WebcamError;
use webcam_core::model::{SnapRequest, SnapStage};
use webcam_core::process::SystemRunner;
use webcam_core::v4l2::V4l2Ctl;
use webcam_test_utils::fake_tools::FakeToolbox;
use webcam_test_utils::fixtures;

fn runner_for(toolbox: &FakeToolbox) -> Arc<SystemRunner> {
    Arc::new(SystemRunner::new().with_search_path(toolbox.bin_dir()))
}

fn request(toolbox: &FakeToolbox, label: &str) -> SnapRequest {
    SnapRequest {
        label: Some(label.to_string()),
        output_dir: toolbox.work_dir().join("notes-captures"),
        ..SnapRequest::default()
    }
}

#[tokio::test]
async fn test_full_snap_with_optimizer() {
    let toolbox = FakeToolbox::new().unwrap();
    toolbox
        .install_v4l2_ctl(fixtures::LAPTOP_WITH_USB, fixtures::USB_FORMATS, fixtures::USB_CONTROLS)
        .unwrap();
    toolbox.install_fswebcam(4096).unwrap();
    toolbox.install_oxipng(1024).unwrap();

    let runner = runner_for(&toolbox);
    let deps = check_dependencies(runner.as_ref()).unwrap();
    assert!(deps.has_oxipng);

    let sequencer = CaptureSequencer::new(runner, Settings::default());
    let report = sequencer.snap(&request(&toolbox, "desk")).await.unwrap();

    assert_eq!(report.device, "/dev/video2");
    assert_eq!(report.resolution.to_string(), "2592x1944");
    assert_eq!(report.original_size, 4096);
    assert_eq!(report.optimised_size, Some(1024));
    assert_eq!(report.stage, SnapStage::Done);

    let calls = toolbox.invocations().unwrap();
    let tools: Vec<&str> = calls
        .iter()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(tools, vec!["v4l2-ctl", "v4l2-ctl", "fswebcam", "oxipng"]);

    let capture = &toolbox.invocations_of("fswebcam").unwrap()[0];
    assert!(capture.contains("-d /dev/video2 -r 2592x1944 --png 0 --no-banner -S 30 -F 3"));
    assert!(capture.ends_with("desk_original.png"));

    let optimise = &toolbox.invocations_of("oxipng").unwrap()[0];
    assert!(optimise.contains("-o 4 --strip safe"));
    assert!(optimise.ends_with("desk_optimised.png"));
}

#[tokio::test]
async fn test_snap_without_oxipng_keeps_only_original() {
    let toolbox = FakeToolbox::new().unwrap();
    toolbox
        .install_v4l2_ctl(fixtures::INTEGRATED_ONLY, fixtures::STEPWISE_FORMATS, "")
        .unwrap();
    toolbox.install_fswebcam(100).unwrap();

    let runner = runner_for(&toolbox);
    assert!(!check_dependencies(runner.as_ref()).unwrap().has_oxipng);

    let sequencer = CaptureSequencer::new(runner, Settings::default());
    let report = sequencer.snap(&request(&toolbox, "memo")).await.unwrap();

    assert_eq!(report.device, "/dev/video0");
    assert_eq!(report.resolution.to_string(), "1920x1080");
    assert_eq!(report.optimised_size, None);
    assert!(report.output.original.exists());
    assert!(!report.output.optimised.exists());
}

#[tokio::test]
async fn test_failing_capture_never_optimises() {
    let toolbox = FakeToolbox::new().unwrap();
    toolbox
        .install_v4l2_ctl(fixtures::LAPTOP_WITH_USB, fixtures::USB_FORMATS, "")
        .unwrap();
    toolbox
        .install_failing_fswebcam("Error opening device: /dev/video2")
        .unwrap();
    toolbox.install_oxipng(10).unwrap();

    let sequencer = CaptureSequencer::new(runner_for(&toolbox), Settings::default());
    let err = sequencer.snap(&request(&toolbox, "fail")).await.unwrap_err();

    match &err {
        WebcamError::CaptureFailed { device, reason } => {
            assert_eq!(device, "/dev/video2");
            assert!(reason.contains("Error opening device"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(toolbox.invocations_of("oxipng").unwrap().is_empty());
}

#[tokio::test]
async fn test_environment_overrides_skip_queries() {
    let toolbox = FakeToolbox::new().unwrap();
    toolbox.install_failing_v4l2_ctl("should not be called").unwrap();
    toolbox.install_fswebcam(10).unwrap();

    let settings = Settings {
        device: Some("/dev/video5".to_string()),
        resolution: Some("1280x720".to_string()),
        ..Settings::default()
    };
    let sequencer = CaptureSequencer::new(runner_for(&toolbox), settings);
    let report = sequencer.snap(&request(&toolbox, "env")).await.unwrap();

    assert_eq!(report.device, "/dev/video5");
    assert_eq!(report.resolution.to_string(), "1280x720");
    assert!(toolbox.invocations_of("v4l2-ctl").unwrap().is_empty());
}

#[tokio::test]
async fn test_failing_listing_means_no_device() {
    let toolbox = FakeToolbox::new().unwrap();
    toolbox
        .install_failing_v4l2_ctl("Cannot open device /dev/video0")
        .unwrap();
    toolbox.install_fswebcam(10).unwrap();

    let sequencer = CaptureSequencer::new(runner_for(&toolbox), Settings::default());
    let err = sequencer.snap(&request(&toolbox, "none")).await.unwrap_err();

    assert!(matches!(err, WebcamError::NoDeviceFound));
    assert!(toolbox.invocations_of("fswebcam").unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_required_tools() {
    let toolbox = FakeToolbox::new().unwrap();
    toolbox.install_oxipng(10).unwrap();

    let runner = runner_for(&toolbox);
    match check_dependencies(runner.as_ref()).unwrap_err() {
        WebcamError::MissingDependency { packages } => {
            assert_eq!(packages, vec!["fswebcam", "v4l-utils"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_controls_report_passthrough() {
    let toolbox = FakeToolbox::new().unwrap();
    toolbox
        .install_v4l2_ctl(fixtures::LAPTOP_WITH_USB, fixtures::USB_FORMATS, fixtures::USB_CONTROLS)
        .unwrap();

    let runner = runner_for(&toolbox);
    let v4l2 = V4l2Ctl::new(runner.as_ref());

    let controls = v4l2.list_controls("/dev/video2").await.unwrap();
    let formats = v4l2.list_formats("/dev/video2").await.unwrap();

    assert_eq!(controls, fixtures::USB_CONTROLS);
    assert_eq!(formats, fixtures::USB_FORMATS);
    assert_eq!(
        toolbox.invocations_of("v4l2-ctl").unwrap(),
        vec![
            "v4l2-ctl -d /dev/video2 --list-ctrls",
            "v4l2-ctl -d /dev/video2 --list-formats-ext",
        ]
    );
}
