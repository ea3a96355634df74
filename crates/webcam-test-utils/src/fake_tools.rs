//! Fake external tools for process-level tests
//!
//! Each fake is a `/bin/sh` script installed into a temporary `bin`
//! directory. Scripts only use shell builtins, so the toolbox directory can
//! be the entire `PATH`. Every invocation is appended to a log file that
//! tests can read back with [`FakeToolbox::invocations`].

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory of fake tools
pub struct FakeToolbox {
    root: TempDir,
}

impl FakeToolbox {
    pub fn new() -> io::Result<Self> {
        let root = tempfile::tempdir()?;
        fs::create_dir(root.path().join("bin"))?;
        fs::write(root.path().join("calls.log"), "")?;
        Ok(Self { root })
    }

    /// Directory to use as `PATH`
    pub fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    /// Scratch directory for capture output
    pub fn work_dir(&self) -> PathBuf {
        self.root.path().join("work")
    }

    fn log_path(&self) -> PathBuf {
        self.root.path().join("calls.log")
    }

    /// Installs `name` running `body` after logging its arguments
    pub fn install(&self, name: &str, body: &str) -> io::Result<PathBuf> {
        let path = self.bin_dir().join(name);
        let script = format!(
            "#!/bin/sh\necho \"{name} $*\" >> {log}\n{body}\n",
            log = shell_quote(&self.log_path().display().to_string()),
        );
        write_executable(&path, &script)?;
        Ok(path)
    }

    /// `v4l2-ctl` answering the three report queries
    pub fn install_v4l2_ctl(&self, listing: &str, formats: &str, controls: &str) -> io::Result<()> {
        let body = format!(
            "case \"$*\" in\n\
             *--list-devices*) printf '%s' {listing} ;;\n\
             *--list-formats-ext*) printf '%s' {formats} ;;\n\
             *--list-ctrls*) printf '%s' {controls} ;;\n\
             *) echo \"unsupported arguments: $*\" >&2; exit 1 ;;\n\
             esac",
            listing = shell_quote(listing),
            formats = shell_quote(formats),
            controls = shell_quote(controls),
        );
        self.install("v4l2-ctl", &body).map(|_| ())
    }

    /// `v4l2-ctl` that fails every query with `stderr`
    pub fn install_failing_v4l2_ctl(&self, stderr: &str) -> io::Result<()> {
        self.install_failing("v4l2-ctl", stderr)
    }

    /// `fswebcam` writing `size` bytes to its last argument
    pub fn install_fswebcam(&self, size: usize) -> io::Result<()> {
        self.install("fswebcam", &write_last_arg(size)).map(|_| ())
    }

    /// `fswebcam` exiting 1 with `stderr`
    pub fn install_failing_fswebcam(&self, stderr: &str) -> io::Result<()> {
        self.install_failing("fswebcam", stderr)
    }

    /// `oxipng` rewriting its last argument to `size` bytes
    pub fn install_oxipng(&self, size: usize) -> io::Result<()> {
        self.install("oxipng", &write_last_arg(size)).map(|_| ())
    }

    fn install_failing(&self, name: &str, stderr: &str) -> io::Result<()> {
        let body = format!("printf '%s\\n' {} >&2\nexit 1", shell_quote(stderr));
        self.install(name, &body).map(|_| ())
    }

    /// Logged invocations, one `"<tool> <args>"` line each, in call order
    pub fn invocations(&self) -> io::Result<Vec<String>> {
        Ok(fs::read_to_string(self.log_path())?
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Logged invocations of `tool`
    pub fn invocations_of(&self, tool: &str) -> io::Result<Vec<String>> {
        let prefix = format!("{tool} ");
        Ok(self
            .invocations()?
            .into_iter()
            .filter(|line| line.starts_with(&prefix))
            .collect())
    }
}

fn write_last_arg(size: usize) -> String {
    format!("for last; do :; done\nprintf '%s' '{}' > \"$last\"", "P".repeat(size))
}

fn write_executable(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)?;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

/// Single-quotes `value` for `/bin/sh`
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
