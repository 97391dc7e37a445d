//! Best-effort scheduling priority adjustment for flush workers.

use tracing::debug;

/// Ask the scheduler to deprioritize the calling context by `increment`
/// niceness steps. Returns whether the request was accepted.
///
/// On Linux the adjustment applies to the calling thread only, so a flush
/// thread can be niced without touching the rest of the process.
pub fn lower_priority(increment: i32) -> bool {
    if increment <= 0 {
        return true;
    }

    #[cfg(unix)]
    {
        clear_errno();
        // SAFETY: nice(2) has no memory-safety preconditions.
        let result = unsafe { libc::nice(increment) };
        let err = std::io::Error::last_os_error();
        if nice_failed(result, err.raw_os_error().unwrap_or(0)) {
            debug!(increment, error = %err, "could not lower flush priority");
            return false;
        }
        debug!(increment, niceness = result, "flush priority lowered");
        true
    }

    #[cfg(not(unix))]
    {
        debug!(increment, "priority adjustment unsupported on this platform");
        false
    }
}

/// `nice` returns the new niceness, which may itself be -1; only a set
/// errno marks failure.
#[cfg(unix)]
fn nice_failed(result: libc::c_int, errno: i32) -> bool {
    result == -1 && errno != 0
}

#[cfg(unix)]
fn clear_errno() {
    // SAFETY: the errno location is a valid thread-local int.
    #[cfg(target_os = "linux")]
    unsafe {
        *libc::__errno_location() = 0;
    }
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
    unsafe {
        *libc::__error() = 0;
    }
}
