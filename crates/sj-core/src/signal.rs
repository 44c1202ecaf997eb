//! Conventional POSIX signal names, used to render `ChildCrashed` messages.

/// Returns the conventional symbolic name for a POSIX signal number
/// (e.g. `15` → `"SIGTERM"`), or `"UNKNOWN_SIGNAL"` for anything not in
/// the fixed translation table.
///
/// Mirrors udisks' `get_signal_name()` `_HANDLE_SIG` macro table.
pub fn signal_name(signal_number: i32) -> &'static str {
    match signal_number {
        libc::SIGHUP => "SIGHUP",
        libc::SIGINT => "SIGINT",
        libc::SIGQUIT => "SIGQUIT",
        libc::SIGILL => "SIGILL",
        libc::SIGABRT => "SIGABRT",
        libc::SIGFPE => "SIGFPE",
        libc::SIGKILL => "SIGKILL",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGPIPE => "SIGPIPE",
        libc::SIGALRM => "SIGALRM",
        libc::SIGTERM => "SIGTERM",
        libc::SIGUSR1 => "SIGUSR1",
        libc::SIGUSR2 => "SIGUSR2",
        libc::SIGCHLD => "SIGCHLD",
        libc::SIGCONT => "SIGCONT",
        libc::SIGSTOP => "SIGSTOP",
        libc::SIGTSTP => "SIGTSTP",
        libc::SIGTTIN => "SIGTTIN",
        libc::SIGTTOU => "SIGTTOU",
        libc::SIGBUS => "SIGBUS",
        libc::SIGPOLL => "SIGPOLL",
        libc::SIGPROF => "SIGPROF",
        libc::SIGSYS => "SIGSYS",
        libc::SIGTRAP => "SIGTRAP",
        libc::SIGURG => "SIGURG",
        libc::SIGVTALRM => "SIGVTALRM",
        libc::SIGXCPU => "SIGXCPU",
        libc::SIGXFSZ => "SIGXFSZ",
        _ => "UNKNOWN_SIGNAL",
    }
}
