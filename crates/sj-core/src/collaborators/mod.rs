//! The external collaborators: small, independently testable units that the
//! spawned-job supervisor's surrounding daemon relies on but that have
//! nothing to do with spawning or pumping a process.

pub mod error_domain;
pub mod mount_record;
pub mod object_path;
pub mod udev_string;
