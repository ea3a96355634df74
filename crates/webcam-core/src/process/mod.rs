//! External process invocation
//!
//! Everything this crate does ends in running `v4l2-ctl`, `fswebcam` or
//! `oxipng`. The [`CommandRunner`] trait is the single seam for that:
//!
//! - [`SystemRunner`] spawns real processes with `tokio::process`
//! - [`MockRunner`] returns scripted output and records every call
//!
//! Calls are awaited one at a time; output is fully captured before the
//! caller continues.

pub mod mock;
pub mod system;
pub mod traits;

pub use mock::{MockRunner, RecordedCall};
pub use system::SystemRunner;
pub use traits::{CommandOutput, CommandRunner};
