//! Resolution selection from `v4l2-ctl --list-formats-ext` output
//!
//! The report lists every pixel format with its frame sizes:
//!
//! ```text
//! [0]: 'MJPG' (Motion-JPEG, compressed)
//!     Size: Discrete 1920x1080
//!         Interval: Discrete 0.033s (30.000 fps)
//!     Size: Discrete 640x480
//! ```
//!
//! Only discrete sizes are considered; stepwise/continuous ranges are
//! ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Resolution;

/// Used by `snap` when neither an override nor a discrete size is available
pub const FALLBACK_RESOLUTION: Resolution = Resolution {
    width:  1920,
    height: 1080,
};

static DISCRETE_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)size:\s*discrete\s+(\d+)\s*x\s*(\d+)").expect("discrete size pattern is valid")
});

/// All discrete sizes in the report, in order of appearance
///
/// Zero-sized or out-of-range entries are skipped.
pub fn parse_discrete_sizes(capabilities: &str) -> Vec<Resolution> {
    DISCRETE_SIZE
        .captures_iter(capabilities)
        .filter_map(|caps| {
            let width = caps[1].parse().ok()?;
            let height = caps[2].parse().ok()?;
            Resolution::new(width, height)
        })
        .collect()
}

/// The discrete size with the most pixels
///
/// Ties go to the entry that appears first in the report.
///
/// # Examples
///
/// ```
/// use webcam_core::resolution::max_resolution;
///
/// let caps = "Size: Discrete 640x480\nSize: Discrete 1920x1080\n";
/// assert_eq!(max_resolution(caps).unwrap().to_string(), "1920x1080");
/// assert!(max_resolution("no sizes here").is_none());
/// ```
pub fn max_resolution(capabilities: &str) -> Option<Resolution> {
    parse_discrete_sizes(capabilities)
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.pixels() > best.pixels() { candidate } else { best }
        })
}
