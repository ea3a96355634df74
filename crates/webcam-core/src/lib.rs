//! webcam-core: USB webcam discovery and still capture
//!
//! This library wraps the Video4Linux command-line tools. It picks a video
//! device from `v4l2-ctl --list-devices` (preferring external cameras), picks
//! the largest discrete resolution from `v4l2-ctl --list-formats-ext`, runs
//! `fswebcam` to capture a PNG, and optionally runs `oxipng` on a copy.

pub mod capture;
pub mod config;
pub mod deps;
pub mod device;
pub mod error;
pub mod model;
pub mod process;
pub mod resolution;
pub mod util;
pub mod v4l2;
