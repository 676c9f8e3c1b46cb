//! Version-control signal probe.
//!
//! The activity analyzer reads two facts from a repository: how many commits
//! landed within a window, and whether the working tree is dirty. Both are
//! modeled as optional signals so callers can treat a missing tool, a
//! non-repository, or a failed query uniformly as "no signal".

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Narrow capability interface over a version-control tool. `None` means the
/// signal is unavailable, never an error.
pub trait VcsProbe {
    /// Number of commits within `window`.
    fn commits_since(&self, window: Duration) -> Option<u32>;
    /// Whether the working tree has uncommitted changes.
    fn has_uncommitted_changes(&self) -> Option<bool>;
}

/// True when `root` carries version-control metadata: a `.git` directory, or
/// the `.git` file a linked worktree leaves behind.
pub fn repository_marker(root: &Path) -> bool {
    root.join(".git").exists()
}

// ---------------------------------------------------------------------------
// GitCli
// ---------------------------------------------------------------------------

/// Probe backed by the external `git` binary, with a per-query timeout so a
/// huge or unresponsive repository cannot stall an analysis.
pub struct GitCli {
    root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }

    fn query(&self, args: &[&str]) -> Option<String> {
        which::which("git").ok()?;
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.root).args(args);
        run_with_timeout(cmd, self.timeout)
    }
}

impl VcsProbe for GitCli {
    fn commits_since(&self, window: Duration) -> Option<u32> {
        let since = format!("--since={}.days", window_days(window));
        let out = self.query(&["log", &since, "--oneline"])?;
        Some(count_log_lines(&out))
    }

    fn has_uncommitted_changes(&self) -> Option<bool> {
        let out = self.query(&["status", "--porcelain"])?;
        Some(!out.trim().is_empty())
    }
}

fn count_log_lines(out: &str) -> u32 {
    out.lines().filter(|line| !line.trim().is_empty()).count() as u32
}

/// Whole days covering `window`, rounded up, never zero. `git log --since`
/// only takes calendar units.
fn window_days(window: Duration) -> u64 {
    window.as_secs().div_ceil(86_400).max(1)
}

// ---------------------------------------------------------------------------
// Subprocess plumbing
// ---------------------------------------------------------------------------

/// Run `cmd`, returning its stdout on a clean exit within `timeout`.
/// Everything else (spawn failure, non-zero exit, deadline exceeded) yields
/// `None`. Stdout is drained on a separate thread so a chatty process
/// cannot deadlock against a full pipe.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Option<String> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::debug!(%err, "failed to spawn subprocess");
            return None;
        }
    };

    let mut stdout = child.stdout.take()?;
    let reader = std::thread::spawn(move || {
        let mut buf = String::new();
        stdout.read_to_string(&mut buf).ok();
        buf
    });

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let out = reader.join().unwrap_or_default();
                return if status.success() { Some(out) } else { None };
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    tracing::warn!("subprocess exceeded {:?} timeout, killing", timeout);
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn marker_absent_in_plain_directory() {
        let dir = TempDir::new().unwrap();
        assert!(!repository_marker(dir.path()));
    }

    #[test]
    fn marker_accepts_directory_and_worktree_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        assert!(repository_marker(dir.path()));

        let linked = TempDir::new().unwrap();
        std::fs::write(linked.path().join(".git"), "gitdir: ../repo/.git/worktrees/x").unwrap();
        assert!(repository_marker(linked.path()));
    }

    #[test]
    fn count_log_lines_ignores_blanks() {
        assert_eq!(count_log_lines(""), 0);
        assert_eq!(count_log_lines("\n\n"), 0);
        assert_eq!(count_log_lines("abc123 first\n"), 1);
        assert_eq!(count_log_lines("abc123 first\ndef456 second\n\n"), 2);
    }

    #[test]
    fn missing_binary_yields_no_signal() {
        let cmd = Command::new("definitely-not-a-real-binary-atlas");
        assert_eq!(run_with_timeout(cmd, Duration::from_secs(1)), None);
    }

    #[cfg(unix)]
    #[test]
    fn slow_subprocess_is_killed_at_deadline() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let started = Instant::now();
        assert_eq!(run_with_timeout(cmd, Duration::from_millis(100)), None);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn fast_subprocess_output_is_captured() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let out = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn commit_window_rounds_up_to_whole_days() {
        assert_eq!(window_days(Duration::from_secs(14 * 86_400)), 14);
        assert_eq!(window_days(Duration::from_secs(86_401)), 2);
        assert_eq!(window_days(Duration::from_secs(10)), 1);
        assert_eq!(window_days(Duration::ZERO), 1);
    }
}
