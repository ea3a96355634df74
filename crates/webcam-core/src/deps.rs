//! External tool availability
//!
//! `fswebcam` and `v4l2-ctl` are required for every command; `oxipng` is
//! optional and only enables the optimised copy.

use crate::error::{WebcamError, WebcamResult};
use crate::process::CommandRunner;

/// Capture utility
pub const FSWEBCAM: &str = "fswebcam";

/// V4L2 query utility
pub const V4L2_CTL: &str = "v4l2-ctl";

/// Optional PNG optimizer
pub const OXIPNG: &str = "oxipng";

/// Required programs and the packages that provide them
const REQUIRED: &[(&str, &str)] = &[(FSWEBCAM, "fswebcam"), (V4L2_CTL, "v4l-utils")];

/// Result of a successful dependency check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependencies {
    pub has_oxipng: bool,
}

/// Verifies the required tools are installed
///
/// # Errors
///
/// [`WebcamError::MissingDependency`] naming every missing package.
pub fn check_dependencies(runner: &dyn CommandRunner) -> WebcamResult<Dependencies> {
    let packages: Vec<String> = REQUIRED
        .iter()
        .filter(|(program, _)| !runner.is_available(program))
        .map(|(_, package)| package.to_string())
        .collect();

    if !packages.is_empty() {
        return Err(WebcamError::MissingDependency { packages });
    }

    let has_oxipng = runner.is_available(OXIPNG);
    tracing::debug!("Dependencies present (oxipng: {})", has_oxipng);

    Ok(Dependencies { has_oxipng })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockRunner;

    #[test]
    fn test_all_present() {
        let deps = check_dependencies(&MockRunner::new()).unwrap();
        assert!(deps.has_oxipng);
    }

    #[test]
    fn test_oxipng_is_optional() {
        let runner = MockRunner::new().with_missing(OXIPNG);
        let deps = check_dependencies(&runner).unwrap();
        assert!(!deps.has_oxipng);
    }

    #[test]
    fn test_missing_tools_reported_by_package() {
        let runner = MockRunner::new().with_missing(FSWEBCAM).with_missing(V4L2_CTL);

        match check_dependencies(&runner).unwrap_err() {
            WebcamError::MissingDependency { packages } => {
                assert_eq!(packages, vec!["fswebcam", "v4l-utils"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_single_missing_tool() {
        let runner = MockRunner::new().with_missing(V4L2_CTL);
        let err = check_dependencies(&runner).unwrap_err();
        assert_eq!(err.remediation_hint(), "sudo apt install v4l-utils");
    }
}
