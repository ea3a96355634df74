//! Process runner backed by `tokio::process`

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::traits::{CommandOutput, CommandRunner};
use crate::error::{WebcamError, WebcamResult};

/// Runs real programs found on `PATH`
///
/// A custom search path can be supplied with
/// [`SystemRunner::with_search_path`]; programs are then resolved against it
/// instead of the inherited `PATH`, and spawned children see it as their
/// `PATH` too.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    search_path: Option<OsString>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves programs against `path` (a `PATH`-style list) instead of the
    /// process environment
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    fn path_list(&self) -> Option<OsString> {
        self.search_path.clone().or_else(|| env::var_os("PATH"))
    }

    /// Finds the executable for `program`
    ///
    /// Names containing a path separator are checked as-is.
    pub fn locate(&self, program: &str) -> Option<PathBuf> {
        if program.contains(std::path::MAIN_SEPARATOR) {
            let candidate = PathBuf::from(program);
            return is_executable(&candidate).then_some(candidate);
        }

        let paths = self.path_list()?;
        env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> WebcamResult<CommandOutput> {
        let executable = self.locate(program).ok_or_else(|| WebcamError::Spawn {
            tool:   program.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found on PATH"),
        })?;

        tracing::debug!("Running {} {}", executable.display(), args.join(" "));

        let mut command = Command::new(&executable);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(path) = &self.search_path {
            command.env("PATH", path);
        }

        let output = command.output().await.map_err(|source| WebcamError::Spawn {
            tool: program.to_string(),
            source,
        })?;

        let output = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!("{} finished with {}", program, output.status_text());

        Ok(output)
    }

    fn is_available(&self, program: &str) -> bool {
        self.locate(program).is_some()
    }
}
