//! Error taxonomy, POSIX signal names, and the small external collaborators
//! the spawned-job supervisor in `sj-process` is built alongside: a
//! mount-record ordering, udev-string decoding, object-path sanitization,
//! and the fixed error-domain registry.
//!
//! This crate carries no async runtime dependency and no process-spawning
//! logic of its own — that's `sj-process`.

pub mod collaborators;
pub mod error;
pub mod signal;

pub use collaborators::error_domain::ErrorDomain;
pub use collaborators::mount_record::MountRecord;
pub use collaborators::object_path::sanitize_object_path_segment;
pub use collaborators::udev_string::decode_udev_string;
pub use error::JobError;
pub use signal::signal_name;
