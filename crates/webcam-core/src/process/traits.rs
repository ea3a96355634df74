//! Process runner trait and captured output type

use async_trait::async_trait;

use crate::error::{WebcamError, WebcamResult};

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run printing `stdout`
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with exit code `code` printing `stderr`
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// Human-readable exit status
    pub fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }

    /// The most useful diagnostic text: stderr, else stdout, else the status
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        self.status_text()
    }

    /// Converts an unsuccessful run of `tool` into [`WebcamError::ToolFailed`]
    pub fn check(self, tool: &str) -> WebcamResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(WebcamError::ToolFailed {
                tool:   tool.to_string(),
                status: self.status_text(),
                stderr: self.error_text(),
            })
        }
    }
}

/// Capability: run external programs and locate them on PATH.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion, capturing both streams.
    ///
    /// A non-zero exit is *not* an error here; callers inspect
    /// [`CommandOutput::status`]. Only a failure to start the process is.
    async fn run(&self, program: &str, args: &[String]) -> WebcamResult<CommandOutput>;

    /// Whether `program` can be found and executed
    fn is_available(&self, program: &str) -> bool;
}
