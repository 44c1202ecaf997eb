use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn test_true_succeeds_with_empty_message() {
    let job = Job::spawn("/bin/true", None, None);
    let outcome = job.wait().await;
    assert!(outcome.result.error.is_none());
    assert!(outcome.completed.success);
    assert_eq!(outcome.completed.message, "");
    assert_eq!(outcome.result.stdout, Some(Vec::new()));
    assert_eq!(outcome.result.stderr, Some(Vec::new()));
}

#[tokio::test]
async fn test_false_fails_with_exit_status_message() {
    let job = Job::spawn("/bin/false", None, None);
    let outcome = job.wait().await;
    assert!(outcome.result.error.is_none());
    assert!(!outcome.completed.success);
    assert_eq!(
        outcome.completed.message,
        "Command-line '/bin/false' exited with non-zero exit status 1.\nstdout: ''\nstderr: ''"
    );
}

#[tokio::test]
async fn test_cat_echoes_stdin_to_stdout() {
    let job = Job::spawn("/bin/cat", Some(b"hello\n".to_vec()), None);
    let outcome = job.wait().await;
    assert!(outcome.result.error.is_none());
    assert!(outcome.completed.success);
    assert_eq!(outcome.result.stdout, Some(b"hello\n".to_vec()));
}

#[tokio::test]
async fn test_nonexistent_binary_yields_spawn_failed() {
    let job = Job::spawn("/no/such/binary", None, None);
    let outcome = job.wait().await;
    match &outcome.result.error {
        Some(JobError::SpawnFailed { command_line, .. }) => {
            assert_eq!(command_line, "/no/such/binary");
        }
        other => panic!("expected SpawnFailed, got {other:?}"),
    }
    assert!(!outcome.completed.success);
    assert!(
        outcome
            .completed
            .message
            .starts_with("Failed to execute command-line '/no/such/binary': ")
    );
}

#[tokio::test]
async fn test_unterminated_quote_yields_parse_failed() {
    let job = Job::spawn("'unterminated", None, None);
    let outcome = job.wait().await;
    assert!(matches!(
        outcome.result.error,
        Some(JobError::ParseFailed { .. })
    ));
    assert!(!outcome.completed.success);
    assert!(outcome.completed.message.contains("Error parsing command-line"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cancellation_surfaces_eagerly_and_reaps_child() {
    let token = CancellationToken::new();
    let job = Job::spawn("/bin/sleep 60", None, Some(token.clone()));

    let cancel_token = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel_token.cancel();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), job.wait())
        .await
        .expect("completion should arrive promptly after cancellation");

    assert!(matches!(outcome.result.error, Some(JobError::Cancelled)));
    assert!(!outcome.completed.success);

    // The child is reaped in the background; give the release task a grace
    // window and confirm the test doesn't hang waiting on it (best-effort —
    // we cannot directly observe the child's PID from here).
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_already_cancelled_token_short_circuits() {
    let token = CancellationToken::new();
    token.cancel();
    let job = Job::spawn("/bin/sleep 60", None, Some(token));
    let outcome = tokio::time::timeout(Duration::from_secs(1), job.wait())
        .await
        .expect("already-tripped token should complete immediately");
    assert!(matches!(outcome.result.error, Some(JobError::Cancelled)));
}

#[tokio::test]
async fn test_command_line_accessor() {
    let job = Job::spawn("/bin/true", None, None);
    assert_eq!(job.command_line(), "/bin/true");
    let _ = job.wait().await;
}

#[tokio::test]
async fn test_classifier_override_marks_handled() {
    let job = Job::spawn_with_classifier("/bin/false", None, None, |result, _cmd| {
        result.error.is_none().then(|| JobCompleted {
            success: true,
            message: "overridden".to_string(),
        })
    });
    let outcome = job.wait().await;
    assert!(outcome.completed.success);
    assert_eq!(outcome.completed.message, "overridden");
}

#[tokio::test]
async fn test_large_stdout_capture_exact_bytes() {
    // Exercise the 1024-byte chunked read loop across many chunks.
    let script = "i=0; while [ $i -lt 5000 ]; do printf a; i=$((i+1)); done";
    let job = Job::spawn(format!("/bin/sh -c '{script}'"), None, None);
    let outcome = job.wait().await;
    assert!(outcome.completed.success);
    let stdout = outcome.result.stdout.expect("stdout captured");
    assert_eq!(stdout.len(), 5000);
    assert!(stdout.iter().all(|&b| b == b'a'));
}

#[tokio::test]
async fn test_stderr_captured_separately_from_stdout() {
    let job = Job::spawn("/bin/sh -c 'echo out; echo err >&2'", None, None);
    let outcome = job.wait().await;
    assert_eq!(outcome.result.stdout, Some(b"out\n".to_vec()));
    assert_eq!(outcome.result.stderr, Some(b"err\n".to_vec()));
}

#[tokio::test]
async fn test_stdin_read_to_eof_matches_input_exactly() {
    // Without depending on /bin/cat being present: a throwaway script that
    // reads stdin to EOF and echoes it back out untouched.
    let dir = tempfile::tempdir().expect("tempdir");
    let script_path = dir.path().join("echo_stdin.sh");
    {
        let mut f = std::fs::File::create(&script_path).expect("create script");
        f.write_all(b"#!/bin/sh\ncat\n").expect("write script");
        let mut perms = f.metadata().expect("metadata").permissions();
        perms.set_mode(0o755);
        f.set_permissions(perms).expect("chmod script");
    }

    let input = b"the quick brown fox\nsecond line\n".to_vec();
    let job = Job::spawn(script_path.display().to_string(), Some(input.clone()), None);
    let outcome = job.wait().await;
    assert!(outcome.completed.success);
    assert_eq!(outcome.result.stdout, Some(input));
}

#[test]
fn test_loopless_construction_falls_back_to_synchronous_completion() {
    // No tokio runtime on this (plain, non-#[tokio::test]) thread: `spawn`
    // must fall back to driving the job to completion on a throwaway
    // runtime rather than panicking.
    let job = Job::spawn("/bin/true", None, None);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let outcome = rt.block_on(job.wait());
    assert!(outcome.completed.success);
}
