//! Test utilities for webcam-core integration tests
//!
//! This crate provides canned `v4l2-ctl` reports and, on Unix, a toolbox of
//! fake `v4l2-ctl` / `fswebcam` / `oxipng` shell scripts so the real process
//! runner can be exercised without a camera.
//!
//! # Usage
//!
//! Add to your crate's dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! webcam-test-utils = { path = "../webcam-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`fixtures`]: Sample device listings and format reports
//! - [`fake_tools`]: Fake external tools in a temporary `PATH` (Unix only)
//!
//! # Example
//!
//! ```ignore
//! use webcam_test_utils::{fake_tools::FakeToolbox, fixtures};
//! use webcam_core::process::SystemRunner;
//!
//! let toolbox = FakeToolbox::new().unwrap();
//! toolbox.install_v4l2_ctl(fixtures::LAPTOP_WITH_USB, fixtures::USB_FORMATS, "").unwrap();
//! let runner = SystemRunner::new().with_search_path(toolbox.bin_dir());
//! ```

pub mod fixtures;

#[cfg(unix)]
pub mod fake_tools;
