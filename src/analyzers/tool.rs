//! Bounded external process execution
//!
//! Analyzer adapters wrap external tools (flake8, eslint, radon, git). This
//! module runs them with a hard deadline: a process that overruns its budget
//! is killed and reaped, never abandoned.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Captured outcome of one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, when the process ran to completion.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    /// Failure to run the tool at all (missing binary, spawn error).
    pub error: Option<String>,
}

impl ToolOutput {
    fn completed(stdout: String, stderr: String, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
            timed_out: false,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            timed_out: false,
            error: Some(error),
        }
    }

    fn deadline_exceeded(tool: &str, budget: Duration) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            timed_out: true,
            error: Some(format!("{} timed out after {}s", tool, budget.as_secs())),
        }
    }

    /// True when the process completed with exit code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        if self.stdout.trim().is_empty() {
            return None;
        }
        serde_json::from_str(self.stdout.trim()).ok()
    }
}

/// Drain a child stream on its own thread so a chatty tool cannot deadlock
/// against a full pipe while we poll for exit.
fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Run an external tool with a hard deadline.
///
/// # Arguments
/// * `cmd` - Program and arguments
/// * `tool` - Human-readable tool name for diagnostics
/// * `budget` - Wall-clock limit; the process is killed when exceeded
/// * `cwd` - Working directory for the tool
pub fn run_tool(cmd: &[String], tool: &str, budget: Duration, cwd: Option<&Path>) -> ToolOutput {
    let Some((program, args)) = cmd.split_first() else {
        return ToolOutput::failed("empty command".to_string());
    };

    debug!("Running {}: {} {:?}", tool, program, args);

    let mut command = Command::new(program);
    command.args(args);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return ToolOutput::failed(format!("{} not found on PATH", tool));
        }
        Err(e) => {
            return ToolOutput::failed(format!("failed to run {}: {}", tool, e));
        }
    };

    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = stdout_handle.join().unwrap_or_default();
                let stderr = stderr_handle.join().unwrap_or_default();
                return ToolOutput::completed(stdout, stderr, status.code());
            }
            Ok(None) => {
                if start.elapsed() > budget {
                    warn!("{} exceeded {}s budget, killing", tool, budget.as_secs());
                    let _ = child.kill();
                    let _ = child.wait(); // reap, do not orphan
                    let _ = stdout_handle.join();
                    let _ = stderr_handle.join();
                    return ToolOutput::deadline_exceeded(tool, budget);
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return ToolOutput::failed(format!("failed to wait for {}: {}", tool, e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_fails() {
        let out = run_tool(&[], "nothing", Duration::from_secs(1), None);
        assert!(out.error.is_some());
        assert!(!out.timed_out);
    }

    #[test]
    fn test_missing_binary_reports_not_found() {
        let cmd = vec!["repograde-no-such-binary".to_string()];
        let out = run_tool(&cmd, "ghost", Duration::from_secs(1), None);
        assert!(out.error.as_deref().unwrap_or("").contains("not found"));
        assert!(out.exit_code.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_and_exit_code() {
        let cmd = vec!["sh".to_string(), "-c".to_string(), "echo hello".to_string()];
        let out = run_tool(&cmd, "sh", Duration::from_secs(5), None);
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_kills_on_deadline() {
        let cmd = vec!["sleep".to_string(), "30".to_string()];
        let start = Instant::now();
        let out = run_tool(&cmd, "sleep", Duration::from_millis(200), None);
        assert!(out.timed_out);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_json_parsing() {
        let out = ToolOutput::completed(r#"{"issues": 3}"#.to_string(), String::new(), Some(0));
        assert_eq!(out.json().unwrap()["issues"], 3);
        let out = ToolOutput::completed("not json".to_string(), String::new(), Some(0));
        assert!(out.json().is_none());
    }
}
