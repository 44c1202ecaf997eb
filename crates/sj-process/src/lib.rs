//! The spawned-job supervisor: launches an external command, streams bytes
//! to its stdin, captures stdout/stderr, observes its termination, honors
//! asynchronous cancellation, and reports a single structured completion to
//! its caller.
//!
//! [`Job`] is the whole surface. The "event loop" the design speaks of is
//! realized as the `tokio` runtime `Handle` captured at construction; the
//! "cancellation token" is a [`tokio_util::sync::CancellationToken`]; the
//! "exactly one completion event" guarantee is realized as a
//! `tokio::sync::oneshot` channel, which can structurally only be sent once.

mod classify;
mod job;

pub use classify::{JobCompleted, JobResult, default_classify};
pub use job::{Job, JobOutcome};
