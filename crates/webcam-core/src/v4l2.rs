//! `v4l2-ctl` queries

use crate::deps::V4L2_CTL;
use crate::device::parse_device_listing;
use crate::error::WebcamResult;
use crate::model::DeviceGroup;
use crate::process::CommandRunner;

/// Thin wrapper over the `v4l2-ctl` reports this crate reads
pub struct V4l2Ctl<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> V4l2Ctl<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    async fn query(&self, args: &[&str]) -> WebcamResult<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = self.runner.run(V4L2_CTL, &args).await?.check(V4L2_CTL)?;
        Ok(output.stdout)
    }

    /// `v4l2-ctl --list-devices`
    pub async fn list_devices(&self) -> WebcamResult<String> {
        self.query(&["--list-devices"]).await
    }

    /// `v4l2-ctl --list-devices`, parsed
    pub async fn device_groups(&self) -> WebcamResult<Vec<DeviceGroup>> {
        Ok(parse_device_listing(&self.list_devices().await?))
    }

    /// `v4l2-ctl -d <device> --list-formats-ext`
    pub async fn list_formats(&self, device: &str) -> WebcamResult<String> {
        self.query(&["-d", device, "--list-formats-ext"]).await
    }

    /// `v4l2-ctl -d <device> --list-ctrls`
    pub async fn list_controls(&self, device: &str) -> WebcamResult<String> {
        self.query(&["-d", device, "--list-ctrls"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebcamError;
    use crate::process::{CommandOutput, MockRunner};

    #[tokio::test]
    async fn test_list_formats_passes_device() {
        let runner = MockRunner::new().with_output_when(
            V4L2_CTL,
            "--list-formats-ext",
            CommandOutput::success("Size: Discrete 640x480\n"),
        );

        let text = V4l2Ctl::new(&runner).list_formats("/dev/video2").await.unwrap();

        assert!(text.contains("640x480"));
        let calls = runner.calls_to(V4L2_CTL);
        assert_eq!(calls[0].args, vec!["-d", "/dev/video2", "--list-formats-ext"]);
    }

    #[tokio::test]
    async fn test_device_groups_parses_listing() {
        let runner = MockRunner::new()
            .with_output(V4L2_CTL, CommandOutput::success("USB Camera:\n\t/dev/video2\n"));

        let groups = V4l2Ctl::new(&runner).device_groups().await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "USB Camera");
    }

    #[tokio::test]
    async fn test_failure_becomes_tool_failed() {
        let runner = MockRunner::new().with_output(
            V4L2_CTL,
            CommandOutput::failure(1, "Cannot open device /dev/video9"),
        );

        let err = V4l2Ctl::new(&runner).list_controls("/dev/video9").await.unwrap_err();

        assert!(matches!(err, WebcamError::ToolFailed { ref stderr, .. } if stderr.contains("video9")));
    }
}
