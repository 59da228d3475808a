//! Process-group supervised execution
//!
//! Every child is spawned as the leader of a fresh process group so that a
//! single signal reaches the compiler driver's helpers, the interpreter's
//! subprocesses and anything else the program forks. The group is killed on
//! deadline, swept again after a normal exit so that background
//! grandchildren cannot outlive the call or keep the output pipes open, and
//! killed when a run is abandoned mid-flight.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::sys::wait::{Id, WaitPidFlag, waitid};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// How long output readers get to hit EOF once the group is gone
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Result of a supervised process run
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The group leader exited before the deadline
    Exited {
        status: ExitStatus,
        stdout: String,
        stderr: String,
        elapsed: Duration,
    },
    /// The deadline elapsed; the whole group was killed and output discarded
    TimedOut { elapsed: Duration },
}

/// Spawn `command` in its own process group, feed it `stdin`, and wait at
/// most `limit` for it to exit.
///
/// Only spawn and wait failures are returned as `Err`; a non-zero exit is a
/// normal [`ProcessOutcome::Exited`]. If the returned future is dropped
/// before it completes, the whole group is killed.
pub async fn run_supervised(
    mut command: Command,
    stdin: &str,
    limit: Duration,
    output_limit: usize,
) -> io::Result<ProcessOutcome> {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = command.spawn()?;
    let pgid = child.id().map(|id| Pid::from_raw(id as i32));
    let mut guard = GroupGuard::new(pgid);

    let input = stdin.as_bytes().to_vec();
    let stdin_task = child.stdin.take().map(|mut pipe| {
        tokio::spawn(async move {
            // EPIPE is expected when the program exits without reading
            let _ = pipe.write_all(&input).await;
            let _ = pipe.shutdown().await;
        })
    });
    let stdout_task = capture(child.stdout.take(), output_limit);
    let stderr_task = capture(child.stderr.take(), output_limit);

    let exited = timeout(limit, leader_exited(pgid)).await;
    let elapsed = start.elapsed();

    if exited.is_err() {
        tracing::warn!(
            pgid = pgid.map(|p| p.as_raw()),
            limit_ms = limit.as_millis() as u64,
            "Deadline elapsed, killing process group"
        );
        kill_group(pgid);
        // Reap the leader so no zombie is left behind
        if let Err(e) = child.wait().await {
            tracing::warn!("Failed to reap killed process: {}", e);
        }
        guard.disarm();
        abort_all(stdin_task, stdout_task, stderr_task);

        return Ok(ProcessOutcome::TimedOut { elapsed });
    }

    // The unreaped leader still pins the group id, so the sweep cannot hit
    // a recycled group
    if kill_group(pgid) {
        tracing::debug!(
            pgid = pgid.map(|p| p.as_raw()),
            "Killed processes left behind by group leader"
        );
    }
    let waited = child.wait().await;
    guard.disarm();

    let status = match waited {
        Ok(status) => status,
        Err(e) => {
            abort_all(stdin_task, stdout_task, stderr_task);
            return Err(e);
        }
    };

    let stdout = drain(stdout_task).await;
    let stderr = drain(stderr_task).await;
    if let Some(task) = stdin_task {
        task.abort();
    }

    Ok(ProcessOutcome::Exited {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        elapsed,
    })
}

/// Kills the process group when dropped, unless disarmed first
struct GroupGuard {
    pgid: Option<Pid>,
}

impl GroupGuard {
    fn new(pgid: Option<Pid>) -> Self {
        Self { pgid }
    }

    /// Call only once the leader is reaped and the group has been swept
    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        if kill_group(self.pgid) {
            tracing::debug!(
                pgid = self.pgid.map(|p| p.as_raw()),
                "Killed process group of abandoned run"
            );
        }
    }
}

/// Resolve once the leader has exited, leaving it unreaped.
async fn leader_exited(pid: Option<Pid>) {
    let Some(pid) = pid else {
        return;
    };

    match tokio::task::spawn_blocking(move || wait_exited(pid)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(pid = pid.as_raw(), error = %e, "waitid failed"),
        Err(e) => tracing::warn!("Exit watcher failed: {}", e),
    }
}

/// Block until `pid` has exited. `WNOWAIT` leaves it a zombie for `Child::wait` to reap.
fn wait_exited(pid: Pid) -> nix::Result<()> {
    loop {
        match waitid(Id::Pid(pid), WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT) {
            Err(Errno::EINTR) => continue,
            other => return other.map(drop),
        }
    }
}

/// Send SIGKILL to every member of the group. Returns whether anything was signalled.
fn kill_group(pgid: Option<Pid>) -> bool {
    let Some(pgid) = pgid else {
        return false;
    };

    match killpg(pgid, Signal::SIGKILL) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(e) => {
            tracing::warn!(pgid = pgid.as_raw(), error = %e, "Failed to signal process group");
            false
        }
    }
}

/// Short description of how a process ended ("exit code 1", "killed by signal 11")
pub fn describe_exit(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        format!("exit code {}", code)
    } else if let Some(signal) = status.signal() {
        format!("killed by signal {}", signal)
    } else {
        "unknown exit status".to_string()
    }
}

fn capture<R>(pipe: Option<R>, limit: usize) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        let Some(mut pipe) = pipe else {
            return buf;
        };

        // Keep reading past the cap so the writer never blocks on a full pipe
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let room = limit.saturating_sub(buf.len());
                    buf.extend_from_slice(&chunk[..n.min(room)]);
                }
            }
        }
        buf
    })
}

async fn drain(task: JoinHandle<Vec<u8>>) -> Vec<u8> {
    let abort = task.abort_handle();
    match timeout(DRAIN_GRACE, task).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::warn!("Output reader failed: {}", e);
            Vec::new()
        }
        Err(_) => {
            // A process outside the group still holds the pipe
            tracing::warn!("Output pipe still open after process exit, dropping reader");
            abort.abort();
            Vec::new()
        }
    }
}

fn abort_all(
    stdin_task: Option<JoinHandle<()>>,
    stdout_task: JoinHandle<Vec<u8>>,
    stderr_task: JoinHandle<Vec<u8>>,
) {
    if let Some(task) = stdin_task {
        task.abort();
    }
    stdout_task.abort();
    stderr_task.abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    /// Linux: a process counts as gone once it is dead or a zombie
    fn is_running(pid: i32) -> bool {
        let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) else {
            return false;
        };
        let state = stat
            .rsplit(')')
            .next()
            .and_then(|rest| rest.trim_start().chars().next());
        !matches!(state, Some('Z') | Some('X') | None)
    }

    async fn wait_until_gone(pid: i32) -> bool {
        for _ in 0..60 {
            if !is_running(pid) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stdin() {
        let outcome = run_supervised(sh("cat"), "hello\nworld", Duration::from_secs(5), 1024)
            .await
            .unwrap();

        match outcome {
            ProcessOutcome::Exited { status, stdout, .. } => {
                assert!(status.success());
                assert_eq!(stdout, "hello\nworld");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_keeps_stderr() {
        let outcome = run_supervised(sh("echo oops >&2; exit 3"), "", Duration::from_secs(5), 1024)
            .await
            .unwrap();

        match outcome {
            ProcessOutcome::Exited { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(describe_exit(&status), "exit code 3");
                assert_eq!(stderr.trim(), "oops");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unread_stdin_is_not_an_error() {
        let input = "x".repeat(1024 * 1024);
        let outcome = run_supervised(sh("exit 0"), &input, Duration::from_secs(5), 1024)
            .await
            .unwrap();
        assert!(matches!(outcome, ProcessOutcome::Exited { status, .. } if status.success()));
    }

    #[tokio::test]
    async fn test_output_is_capped() {
        let outcome = run_supervised(
            sh("head -c 100000 /dev/zero"),
            "",
            Duration::from_secs(5),
            1000,
        )
        .await
        .unwrap();

        match outcome {
            ProcessOutcome::Exited { stdout, .. } => assert_eq!(stdout.len(), 1000),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_whole_group() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("background.pid");
        let script = format!("sleep 30 & echo $! > {}; wait", pid_file.display());

        let start = Instant::now();
        let outcome = run_supervised(sh(&script), "", Duration::from_millis(500), 1024)
            .await
            .unwrap();

        assert!(matches!(outcome, ProcessOutcome::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));

        let pid: i32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        assert!(wait_until_gone(pid).await, "background process {} survived", pid);
    }

    #[tokio::test]
    async fn test_abandoned_run_kills_whole_group() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("background.pid");
        let script = format!("sleep 30 & echo $! > {}; wait", pid_file.display());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(500),
            run_supervised(sh(&script), "", Duration::from_secs(10), 1024),
        )
        .await;
        assert!(abandoned.is_err());

        let pid: i32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        assert!(wait_until_gone(pid).await, "background process {} survived", pid);
    }

    #[tokio::test]
    async fn test_exit_status_survives_delayed_reap() {
        let outcome = run_supervised(sh("exit 7"), "", Duration::from_secs(5), 1024)
            .await
            .unwrap();
        assert!(matches!(outcome, ProcessOutcome::Exited { status, .. } if status.code() == Some(7)));
    }

    #[tokio::test]
    async fn test_background_children_are_swept_after_exit() {
        let start = Instant::now();
        let outcome = run_supervised(sh("sleep 30 & echo done"), "", Duration::from_secs(10), 1024)
            .await
            .unwrap();

        match outcome {
            ProcessOutcome::Exited { status, stdout, .. } => {
                assert!(status.success());
                assert_eq!(stdout.trim(), "done");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_an_error() {
        let result = run_supervised(
            Command::new("/nonexistent/toolchain"),
            "",
            Duration::from_secs(1),
            1024,
        )
        .await;
        assert!(result.is_err());
    }
}
