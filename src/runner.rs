use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::{debug, warn};

use crate::report::TestReport;

/// What a test run left behind.
#[derive(Debug, Clone)]
pub enum HarnessRun {
    Report(TestReport),
    /// No report at the expected path, e.g. the build broke before tests ran.
    Missing,
    /// A report existed but could not be read or parsed.
    Unreadable(String),
}

/// Runs the test suite of the project under test. A failing run is a normal
/// result and is never reported as an error.
pub trait TestHarness {
    fn run_tests(&mut self) -> HarnessRun;
}

impl<F> TestHarness for F
where
    F: FnMut() -> HarnessRun,
{
    fn run_tests(&mut self) -> HarnessRun {
        self()
    }
}

/// Runs a shell command and reads the mochawesome report it writes.
#[derive(Debug, Clone)]
pub struct CommandHarness {
    pub test_cmd: String,
    pub working_dir: PathBuf,
    pub report_path: PathBuf,
}

impl CommandHarness {
    pub fn new(test_cmd: impl Into<String>, working_dir: impl Into<PathBuf>, report_path: impl Into<PathBuf>) -> Self {
        CommandHarness {
            test_cmd: test_cmd.into(),
            working_dir: working_dir.into(),
            report_path: report_path.into(),
        }
    }
}

impl TestHarness for CommandHarness {
    fn run_tests(&mut self) -> HarnessRun {
        // A report from an earlier run must never be read for this one.
        discard_report(&self.report_path);

        let start = Instant::now();
        let status = shell_command(&self.test_cmd)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match status {
            Ok(status) => debug!(code = ?status.code(), elapsed_ms, "test command finished"),
            Err(e) => warn!(cmd = %self.test_cmd, error = %e, "failed to run test command"),
        }

        let run = read_report(&self.report_path);
        discard_report(&self.report_path);
        run
    }
}

pub fn read_report(path: &Path) -> HarnessRun {
    if !path.exists() {
        return HarnessRun::Missing;
    }
    match TestReport::from_path(path) {
        Ok(report) => HarnessRun::Report(report),
        Err(e) => HarnessRun::Unreadable(e.to_string()),
    }
}

fn discard_report(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove test report");
        }
    }
}

#[cfg(unix)]
pub fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    command
}

#[cfg(windows)]
pub fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(cmd);
    command
}

pub fn generate_diff(original: &str, mutated: &str) -> String {
    use similar::TextDiff;
    let diff = TextDiff::from_lines(original, mutated);
    let mut output = String::new();
    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                output.push_str(&format!("- {}", change));
            }
            similar::ChangeTag::Insert => {
                output.push_str(&format!("+ {}", change));
            }
            _ => {}
        }
    }
    output
}
