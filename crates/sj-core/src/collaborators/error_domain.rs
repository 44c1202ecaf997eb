//! The fixed error-domain registry: three codes mapped to dotted D-Bus error
//! names, mirroring `g_dbus_error_register_error_domain` in
//! `original_source/udisks/udiskserror.c`.
//!
//! The table is closed by design — see DESIGN.md's Open Question resolution
//! on `ErrorDomain` extensibility.

use std::fmt;

/// One of the three registered error domains a [`crate::error::JobError`]
/// is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ErrorDomain {
    Failed,
    Cancelled,
    AlreadyCancelled,
}

impl ErrorDomain {
    /// The numeric code within this domain, matching `dbus_error_entries`'
    /// declaration order in udisks' registry.
    pub fn code(&self) -> i32 {
        match self {
            ErrorDomain::Failed => 0,
            ErrorDomain::Cancelled => 1,
            ErrorDomain::AlreadyCancelled => 2,
        }
    }

    /// The dotted D-Bus error name this domain is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorDomain::Failed => "org.freedesktop.UDisks.Error.Failed",
            ErrorDomain::Cancelled => "org.freedesktop.UDisks.Error.Cancelled",
            ErrorDomain::AlreadyCancelled => "org.freedesktop.UDisks.Error.AlreadyCancelled",
        }
    }
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
