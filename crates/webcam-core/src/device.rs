//! Video device resolution
//!
//! `v4l2-ctl --list-devices` prints one group per physical camera:
//!
//! ```text
//! Integrated Camera: Integrated C (usb-0000:00:14.0-8):
//! 	/dev/video0
//! 	/dev/video1
//! 	/dev/media0
//!
//! USB Camera: USB Camera (usb-0000:00:14.0-2):
//! 	/dev/video2
//! 	/dev/video3
//! ```
//!
//! The resolver prefers external cameras: the first `/dev/video*` node of the
//! first group whose header does not mention "integrated" wins, falling back
//! to the first video node anywhere.

use crate::model::DeviceGroup;

/// Parses `v4l2-ctl --list-devices` output into groups
///
/// A line whose trimmed form starts with `/dev/` is a device node of the
/// current group, whatever its indentation. A non-indented line containing
/// `:` starts a new group. Nodes that appear before any header are collected
/// into a group with an empty name; anything else is ignored.
pub fn parse_device_listing(listing: &str) -> Vec<DeviceGroup> {
    let mut groups: Vec<DeviceGroup> = Vec::new();

    for line in listing.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with("/dev/") {
            let path = trimmed.to_string();
            match groups.last_mut() {
                Some(group) => group.paths.push(path),
                None => groups.push(DeviceGroup {
                    name:  String::new(),
                    paths: vec![path],
                }),
            }
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if !indented && trimmed.contains(':') {
            let name = trimmed.trim_end_matches(':').trim_end().to_string();
            groups.push(DeviceGroup { name, paths: Vec::new() });
        }
    }

    groups
}

/// Picks a video node from parsed groups
///
/// Returns the first video node of the first non-integrated group that has
/// one, else the first video node of any group.
pub fn select_device(groups: &[DeviceGroup]) -> Option<String> {
    groups
        .iter()
        .filter(|g| !g.is_integrated())
        .find_map(|g| g.video_paths().next())
        .or_else(|| groups.iter().find_map(|g| g.video_paths().next()))
        .map(str::to_string)
}

/// Applies device precedence: explicit > environment > listing
///
/// Empty strings count as absent. `listing` is only consulted when neither
/// override is present.
///
/// # Examples
///
/// ```
/// use webcam_core::device::resolve_device;
///
/// let listing = "Integrated Camera:\n\t/dev/video0\n";
/// assert_eq!(resolve_device(None, None, listing).as_deref(), Some("/dev/video0"));
/// assert_eq!(
///     resolve_device(Some("/dev/video7"), None, listing).as_deref(),
///     Some("/dev/video7")
/// );
/// ```
pub fn resolve_device(
    explicit: Option<&str>,
    env_override: Option<&str>,
    listing: &str,
) -> Option<String> {
    override_device(explicit, env_override)
        .or_else(|| select_device(&parse_device_listing(listing)))
}

/// The first non-empty of `explicit` and `env_override`
pub(crate) fn override_device(explicit: Option<&str>, env_override: Option<&str>) -> Option<String> {
    [explicit, env_override]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|d| !d.is_empty())
        .map(str::to_string)
}
