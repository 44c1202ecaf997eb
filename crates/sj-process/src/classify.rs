//! The default completion classifier: turns `{error, raw_status, stdout,
//! stderr}` into a single `{success, message}` outcome, grounded on
//! `original_source/src/udisksspawnedjob.c:udisks_spawned_job_spawned_job_completed_default`.

use sj_core::{JobError, signal_name};

/// The raw outcome of one [`crate::Job`]: either a [`JobError`] (argv
/// parsing, spawn, or cancellation failure) or a raw OS termination status
/// together with whatever bytes were captured from stdout/stderr.
///
/// `stdout`/`stderr` are `None` exactly when `error` is `Some` — the child
/// was never observed running, so nothing was captured.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct JobResult {
    pub error: Option<JobError>,
    pub raw_status: i32,
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
}

impl JobResult {
    pub(crate) fn cancelled() -> Self {
        JobResult {
            error: Some(JobError::Cancelled),
            raw_status: 0,
            stdout: None,
            stderr: None,
        }
    }

    pub(crate) fn failed(error: JobError) -> Self {
        JobResult {
            error: Some(error),
            raw_status: 0,
            stdout: None,
            stderr: None,
        }
    }

    pub(crate) fn exited(raw_status: i32, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        JobResult {
            error: None,
            raw_status,
            stdout: Some(stdout),
            stderr: Some(stderr),
        }
    }
}

/// The derived, user-visible outcome of a completed [`crate::Job`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct JobCompleted {
    pub success: bool,
    pub message: String,
}

/// The default completion classifier. A [`crate::Job`] constructed with an
/// overriding classifier (see [`crate::Job::spawn_with_classifier`]) can
/// veto this by returning `Some(..)` from its own closure; this function
/// only ever runs when that override declines to handle the result.
pub fn default_classify(result: &JobResult, command_line: &str) -> JobCompleted {
    if let Some(error) = &result.error {
        return JobCompleted {
            success: false,
            message: format!(
                "Failed to execute command-line '{command_line}': {error} ({}, {})",
                error.domain(),
                error.code()
            ),
        };
    }

    let status = result.raw_status;
    let stdout = String::from_utf8_lossy(result.stdout.as_deref().unwrap_or_default());
    let stderr = String::from_utf8_lossy(result.stderr.as_deref().unwrap_or_default());

    if libc::WIFEXITED(status) {
        let code = libc::WEXITSTATUS(status);
        if code == 0 {
            return JobCompleted {
                success: true,
                message: String::new(),
            };
        }
        return JobCompleted {
            success: false,
            message: format!(
                "Command-line '{command_line}' exited with non-zero exit status {code}.\nstdout: '{stdout}'\nstderr: '{stderr}'"
            ),
        };
    }

    if libc::WIFSIGNALED(status) {
        let sig = libc::WTERMSIG(status);
        return JobCompleted {
            success: false,
            message: format!(
                "Command-line '{command_line}' was signaled with signal {}({sig}).\nstdout: '{stdout}'\nstderr: '{stderr}'",
                signal_name(sig)
            ),
        };
    }

    JobCompleted {
        success: false,
        message: format!(
            "Command-line '{command_line}' terminated abnormally.\nstdout: '{stdout}'\nstderr: '{stderr}'"
        ),
    }
}
