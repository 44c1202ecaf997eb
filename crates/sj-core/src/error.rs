//! The error taxonomy surfaced by a [`crate::collaborators::error_domain::ErrorDomain`]-tagged
//! completion: the three kinds that can occupy the `completed` event's `error` field.

use crate::collaborators::error_domain::ErrorDomain;

/// Why a Job's `completed` event carries a non-`None` error.
///
/// Exactly three kinds reach the `error` field of a completion event:
/// argv parsing failed, spawning the child failed, or the cancellation
/// token tripped before the child exited naturally. A non-zero exit code
/// or a terminating signal is *not* a `JobError` — those are classified
/// directly into the derived `job_completed` message (see
/// `sj_process::classify`), because the process itself ran successfully
/// from the supervisor's point of view.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum JobError {
    /// Shell-word splitting of the command line failed.
    #[error("Error parsing command-line '{command_line}': {reason}")]
    ParseFailed {
        command_line: String,
        reason: String,
    },

    /// Fork/exec of the child could not be started.
    #[error("Error spawning command-line '{command_line}': {reason}")]
    SpawnFailed {
        command_line: String,
        reason: String,
    },

    /// The cancellation token tripped before the child exited naturally.
    #[error("cancelled")]
    Cancelled,
}

impl JobError {
    /// The error domain this kind is reported under, mirroring udisks'
    /// registered D-Bus error domain.
    pub fn domain(&self) -> ErrorDomain {
        match self {
            JobError::ParseFailed { .. } | JobError::SpawnFailed { .. } => ErrorDomain::Failed,
            JobError::Cancelled => ErrorDomain::Cancelled,
        }
    }

    /// The numeric code within [`JobError::domain`].
    pub fn code(&self) -> i32 {
        self.domain().code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_failed() {
        let err = JobError::ParseFailed {
            command_line: "'unterminated".to_string(),
            reason: "unterminated quote".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error parsing command-line ''unterminated': unterminated quote"
        );
    }

    #[test]
    fn test_display_spawn_failed() {
        let err = JobError::SpawnFailed {
            command_line: "/no/such/binary".to_string(),
            reason: "No such file or directory (os error 2)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error spawning command-line '/no/such/binary': No such file or directory (os error 2)"
        );
    }

    #[test]
    fn test_display_cancelled() {
        let err = JobError::Cancelled;
        assert_eq!(err.to_string(), "cancelled");
    }

    #[test]
    fn test_domain_and_code_mapping() {
        let parse = JobError::ParseFailed {
            command_line: String::new(),
            reason: String::new(),
        };
        assert_eq!(parse.domain(), ErrorDomain::Failed);
        assert_eq!(parse.code(), 0);

        let spawn = JobError::SpawnFailed {
            command_line: String::new(),
            reason: String::new(),
        };
        assert_eq!(spawn.domain(), ErrorDomain::Failed);

        let cancelled = JobError::Cancelled;
        assert_eq!(cancelled.domain(), ErrorDomain::Cancelled);
        assert_eq!(cancelled.code(), 1);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JobError>();
    }

    #[test]
    fn test_serializes_to_json_for_logging() {
        let err = JobError::SpawnFailed {
            command_line: "/no/such/binary".to_string(),
            reason: "No such file or directory (os error 2)".to_string(),
        };
        let value: serde_json::Value = serde_json::to_value(&err).expect("serializable");
        assert_eq!(value["SpawnFailed"]["command_line"], "/no/such/binary");
    }
}
