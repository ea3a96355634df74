//! Mock process runner for testing
//!
//! [`MockRunner`] answers [`CommandRunner`] calls from a script instead of
//! spawning processes, and records every call so tests can assert on what
//! was (or was not) invoked.
//!
//! # Features
//!
//! - **Scripted output:** per program, optionally narrowed by an argument
//! - **File side effects:** write bytes to the last argument, the way
//!   `fswebcam` and `oxipng` treat their output path
//! - **Availability:** mark programs as missing to exercise dependency checks
//!
//! # Examples
//!
//! ```
//! use webcam_core::process::{CommandOutput, CommandRunner, MockRunner};
//!
//! # tokio_test_block(async {
//! let runner = MockRunner::new()
//!     .with_output("v4l2-ctl", CommandOutput::success("USB Camera:\n\t/dev/video2\n"));
//!
//! let out = runner.run("v4l2-ctl", &["--list-devices".to_string()]).await.unwrap();
//! assert!(out.stdout.contains("/dev/video2"));
//! assert_eq!(runner.calls_to("v4l2-ctl").len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::traits::{CommandOutput, CommandRunner};
use crate::error::{WebcamError, WebcamResult};

/// A call observed by [`MockRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args:    Vec<String>,
}

impl RecordedCall {
    /// Whether any argument equals `arg`
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

#[derive(Debug, Clone)]
struct Rule {
    program:     String,
    when_arg:    Option<String>,
    output:      CommandOutput,
    writes_file: Option<Vec<u8>>,
}

impl Rule {
    fn matches(&self, program: &str, args: &[String]) -> bool {
        self.program == program
            && self
                .when_arg
                .as_ref()
                .map(|wanted| args.iter().any(|a| a == wanted))
                .unwrap_or(true)
    }
}

/// Scripted [`CommandRunner`] implementation
///
/// Rules narrowed with an argument take precedence over plain per-program
/// rules. A program with no rule succeeds with empty output, unless it was
/// marked missing, in which case `run` fails with [`WebcamError::Spawn`].
#[derive(Debug, Default)]
pub struct MockRunner {
    rules:   Vec<Rule>,
    missing: HashSet<String>,
    calls:   Mutex<Vec<RecordedCall>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `output` for every call to `program`
    pub fn with_output(mut self, program: &str, output: CommandOutput) -> Self {
        self.rules.push(Rule {
            program:     program.to_string(),
            when_arg:    None,
            output,
            writes_file: None,
        });
        self
    }

    /// Returns `output` for calls to `program` that include `arg`
    pub fn with_output_when(mut self, program: &str, arg: &str, output: CommandOutput) -> Self {
        self.rules.push(Rule {
            program:     program.to_string(),
            when_arg:    Some(arg.to_string()),
            output,
            writes_file: None,
        });
        self
    }

    /// Succeeds for `program` and writes `contents` to its last argument
    pub fn with_file_output(mut self, program: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.rules.push(Rule {
            program:     program.to_string(),
            when_arg:    None,
            output:      CommandOutput::success(""),
            writes_file: Some(contents.into()),
        });
        self
    }

    /// Marks `program` as not installed
    pub fn with_missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Calls made to `program`, in order
    pub fn calls_to(&self, program: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }

    fn find_rule(&self, program: &str, args: &[String]) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.when_arg.is_some() && r.matches(program, args))
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.when_arg.is_none() && r.matches(program, args))
            })
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[String]) -> WebcamResult<CommandOutput> {
        self.calls.lock().push(RecordedCall {
            program: program.to_string(),
            args:    args.to_vec(),
        });

        if self.missing.contains(program) {
            return Err(WebcamError::Spawn {
                tool:   program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found on PATH"),
            });
        }

        let Some(rule) = self.find_rule(program, args) else {
            return Ok(CommandOutput::success(""));
        };

        if let (Some(contents), Some(target)) = (&rule.writes_file, args.last()) {
            tokio::fs::write(PathBuf::from(target), contents).await?;
        }

        Ok(rule.output.clone())
    }

    fn is_available(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unscripted_program_succeeds_empty() {
        let runner = MockRunner::new();
        let out = runner.run("anything", &[]).await.unwrap();
        assert!(out.is_success());
        assert!(out.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_argument_rule_wins_over_program_rule() {
        let runner = MockRunner::new()
            .with_output("v4l2-ctl", CommandOutput::success("generic"))
            .with_output_when("v4l2-ctl", "--list-ctrls", CommandOutput::success("controls"));

        let ctrls = runner.run("v4l2-ctl", &args(&["-d", "/dev/video0", "--list-ctrls"])).await;
        let other = runner.run("v4l2-ctl", &args(&["--list-devices"])).await;

        assert_eq!(ctrls.unwrap().stdout, "controls");
        assert_eq!(other.unwrap().stdout, "generic");
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let runner = MockRunner::new().with_missing("oxipng");

        assert!(!runner.is_available("oxipng"));
        assert!(runner.is_available("fswebcam"));
        let err = runner.run("oxipng", &[]).await.unwrap_err();
        assert!(matches!(err, WebcamError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_file_output_writes_last_argument() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shot.png");
        let runner = MockRunner::new().with_file_output("fswebcam", b"PNGDATA".to_vec());

        runner
            .run("fswebcam", &args(&["--png", "0", target.to_str().unwrap()]))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"PNGDATA");
    }

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let runner = MockRunner::new();
        runner.run("a", &args(&["1"])).await.unwrap();
        runner.run("b", &args(&["2"])).await.unwrap();
        runner.run("a", &args(&["3"])).await.unwrap();

        let programs: Vec<_> = runner.calls().into_iter().map(|c| c.program).collect();
        assert_eq!(programs, vec!["a", "b", "a"]);
        assert_eq!(runner.calls_to("a").len(), 2);
        assert!(runner.calls_to("a")[1].has_arg("3"));
    }
}
