//! `Job`: spawns one command line, pumps its three pipes, reaps it, and
//! reports exactly one completion event. Grounded on
//! `original_source/src/udisksspawnedjob.c` (`udisks_spawned_job_constructed`,
//! `child_watch_cb`, `on_cancelled`, `write_child_stdin`,
//! `udisks_spawned_job_release_resources`), and on the process-supervision
//! idiom in `csa-process/src/lib.rs`
//! (`wait_and_capture_with_idle_timeout`'s `tokio::select!` pump loop) and
//! `csa-acp/src/connection_spawn.rs` (cancellation-aware spawn/teardown).

use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use std::sync::Arc;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use sj_core::JobError;

use crate::classify::{JobCompleted, JobResult, default_classify};

/// How many bytes each stdout/stderr read pulls in at a time. Not part of
/// the public contract: chosen to match udisks' `gchar buf[1024]` read
/// buffer exactly.
const READ_CHUNK: usize = 1024;

type Classifier = dyn Fn(&JobResult, &str) -> Option<JobCompleted> + Send + Sync;

/// The single structured outcome of a [`Job`]: the raw `{error, raw_status,
/// stdout, stderr}` tuple paired with the derived `{success, message}` the
/// default or overriding classifier produced (the `job_completed` event).
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub result: JobResult,
    pub completed: JobCompleted,
}

/// A spawned external command. Constructing one (via [`Job::spawn`]) begins
/// execution immediately; the caller observes its single completion event
/// by calling [`Job::wait`].
pub struct Job {
    command_line: String,
    outcome_rx: oneshot::Receiver<JobOutcome>,
}

impl Job {
    /// Spawns `command_line`, optionally feeding it `input_bytes` on stdin,
    /// honoring `token` for cancellation. Uses the default completion
    /// classifier.
    pub fn spawn(
        command_line: impl Into<String>,
        input_bytes: Option<Vec<u8>>,
        token: Option<CancellationToken>,
    ) -> Job {
        Self::spawn_with_classifier(command_line, input_bytes, token, |_, _| None)
    }

    /// Like [`Job::spawn`], but `classifier` gets first refusal on the raw
    /// result: returning `Some(..)` marks the completion "handled" and
    /// suppresses [`default_classify`]; returning `None` lets the default
    /// classification run.
    pub fn spawn_with_classifier<C>(
        command_line: impl Into<String>,
        input_bytes: Option<Vec<u8>>,
        token: Option<CancellationToken>,
        classifier: C,
    ) -> Job
    where
        C: Fn(&JobResult, &str) -> Option<JobCompleted> + Send + Sync + 'static,
    {
        let command_line = command_line.into();
        let token = token.unwrap_or_default();
        let input = input_bytes.map(Zeroizing::new);
        let classifier: Arc<Classifier> = Arc::new(classifier);
        let (tx, rx) = oneshot::channel();

        let task_command_line = command_line.clone();
        let fut = run(task_command_line, input, token, classifier, tx);

        match Handle::try_current() {
            Ok(handle) => {
                // Any background release task `run` hands back keeps
                // reaping the child on this same long-lived handle; dropping
                // the join handle here just lets it keep running detached.
                handle.spawn(fut);
            }
            Err(_) => {
                // No event loop on the calling thread: drive the whole
                // spawn-through-classification sequence to completion
                // synchronously on a throwaway runtime, rather than
                // panicking or dropping the event.
                debug!(
                    %command_line,
                    "no tokio runtime on calling thread; running job to completion synchronously"
                );
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed to build fallback runtime for loop-less construction");
                let pending_release = rt.block_on(fut);
                // The runtime is about to be dropped: any task spawned onto
                // it that is still running would be dropped mid-flight, so
                // a pending background reap must be driven to completion
                // here rather than left to finish on its own.
                if let Some(pending_release) = pending_release {
                    rt.block_on(pending_release);
                }
            }
        }

        Job {
            command_line,
            outcome_rx: rx,
        }
    }

    /// The command line this Job was constructed with.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Awaits the Job's single completion event. A oneshot channel can
    /// structurally only be sent once, so the single-completion guarantee
    /// is enforced at the type level rather than with a runtime latch.
    pub async fn wait(self) -> JobOutcome {
        self.outcome_rx
            .await
            .expect("job task dropped the outcome sender without completing")
    }
}

fn emit(
    tx: oneshot::Sender<JobOutcome>,
    command_line: &str,
    classifier: &Classifier,
    result: JobResult,
) {
    let completed =
        classifier(&result, command_line).unwrap_or_else(|| default_classify(&result, command_line));
    // A send error just means the caller already dropped the Job.
    let _ = tx.send(JobOutcome { result, completed });
}

/// Drives one job from argv-splitting through completion. Returns a handle
/// to a background reap task when cancellation leaves a child still running
/// after the completion event has already been sent; the caller is
/// responsible for either detaching it (ambient runtime) or awaiting it
/// before its runtime can be safely dropped (loop-less fallback).
async fn run(
    command_line: String,
    input: Option<Zeroizing<Vec<u8>>>,
    token: CancellationToken,
    classifier: Arc<Classifier>,
    tx: oneshot::Sender<JobOutcome>,
) -> Option<JoinHandle<()>> {
    if token.is_cancelled() {
        debug!(%command_line, "cancellation token already tripped at construction");
        emit(tx, &command_line, &classifier, JobResult::cancelled());
        return None;
    }

    let argv = match shell_words::split(&command_line) {
        Ok(argv) if !argv.is_empty() => argv,
        Ok(_) => {
            emit(
                tx,
                &command_line,
                &classifier,
                JobResult::failed(JobError::ParseFailed {
                    command_line: command_line.clone(),
                    reason: "empty command-line".to_string(),
                }),
            );
            return None;
        }
        Err(e) => {
            warn!(%command_line, error = %e, "failed to parse command-line");
            emit(
                tx,
                &command_line,
                &classifier,
                JobResult::failed(JobError::ParseFailed {
                    command_line: command_line.clone(),
                    reason: e.to_string(),
                }),
            );
            return None;
        }
    };

    let (program, args) = argv.split_first().expect("checked non-empty above");

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    if input.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }
    // Do not auto-reap: we reap explicitly via `child.wait()` below, either
    // on the natural-exit path or from `release_cancelled`.
    cmd.kill_on_drop(false);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(%command_line, error = %e, "failed to spawn child");
            emit(
                tx,
                &command_line,
                &classifier,
                JobResult::failed(JobError::SpawnFailed {
                    command_line: command_line.clone(),
                    reason: e.to_string(),
                }),
            );
            return None;
        }
    };

    let pid = child.id();
    debug!(pid, %command_line, "spawned job");

    if let Some(input) = input {
        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                // Closing stdin on drop delivers EOF to the child; no
                // sentinel byte is written.
                if let Err(e) = stdin.write_all(&input).await {
                    warn!(error = %e, "error writing to child stdin");
                }
            });
        }
    }

    let mut stdout = child.stdout.take().expect("stdout was requested piped");
    let mut stderr = child.stderr.take().expect("stderr was requested piped");

    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();
    let mut stdout_done = false;
    let mut stderr_done = false;
    let mut stdout_chunk = [0u8; READ_CHUNK];
    let mut stderr_chunk = [0u8; READ_CHUNK];

    let raw_status: i32 = loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => {
                debug!(pid, %command_line, "cancellation token tripped");
                emit(tx, &command_line, &classifier, JobResult::cancelled());
                // Surfacing the outcome does not wait for the child; it is
                // signaled and reaped in the background. The caller decides
                // whether to detach this handle or await it.
                return Some(tokio::spawn(release_cancelled(child)));
            }

            status = child.wait() => {
                match status {
                    Ok(status) => break status.into_raw(),
                    Err(e) => {
                        warn!(pid, error = %e, "failed to reap child");
                        emit(
                            tx,
                            &command_line,
                            &classifier,
                            JobResult::failed(JobError::SpawnFailed {
                                command_line: command_line.clone(),
                                reason: e.to_string(),
                            }),
                        );
                        return None;
                    }
                }
            }

            n = stdout.read(&mut stdout_chunk), if !stdout_done => {
                match n {
                    Ok(0) => stdout_done = true,
                    Ok(k) => {
                        trace!(pid, bytes = k, "read stdout chunk");
                        stdout_buf.extend_from_slice(&stdout_chunk[..k]);
                    }
                    Err(e) => {
                        warn!(pid, error = %e, "error reading child stdout");
                        stdout_done = true;
                    }
                }
            }

            n = stderr.read(&mut stderr_chunk), if !stderr_done => {
                match n {
                    Ok(0) => stderr_done = true,
                    Ok(k) => {
                        trace!(pid, bytes = k, "read stderr chunk");
                        stderr_buf.extend_from_slice(&stderr_chunk[..k]);
                    }
                    Err(e) => {
                        warn!(pid, error = %e, "error reading child stderr");
                        stderr_done = true;
                    }
                }
            }
        }
    };

    // Drain whatever the kernel still has buffered, now that the child has
    // exited and will write no more.
    let _ = stdout.read_to_end(&mut stdout_buf).await;
    let _ = stderr.read_to_end(&mut stderr_buf).await;

    debug!(pid, raw_status, "child exited");

    emit(
        tx,
        &command_line,
        &classifier,
        JobResult::exited(raw_status, stdout_buf, stderr_buf),
    );
    None
}

/// Signals a cancelled child and reaps it in the background, without
/// blocking the caller who already received their `Cancelled` completion.
/// Never blocks on `waitpid` from the critical path — the child may handle
/// SIGTERM and take seconds to exit.
async fn release_cancelled(mut child: tokio::process::Child) {
    if let Some(pid) = child.id() {
        debug!(pid, "sending SIGTERM to cancelled child");
        if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            warn!(pid, error = %e, "failed to signal cancelled child");
        }
    }

    match child.wait().await {
        Ok(status) => debug!(raw_status = status.into_raw(), "reaped cancelled child"),
        Err(e) => warn!(error = %e, "failed to reap cancelled child"),
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
