//! Process signalling helpers.

use cairn_shared::errors::{CairnError, CairnResult};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Ask a process to shut down with SIGTERM.
///
/// A process that no longer exists is treated as already terminated.
pub fn terminate(pid: u32) -> CairnResult<()> {
    match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(CairnError::Engine(format!(
            "failed to send SIGTERM to pid {pid}: {e}"
        ))),
    }
}

/// Check if a process with the given PID exists.
///
/// Uses `libc::kill(pid, 0)` which sends a null signal to check existence.
/// An exited child that has not been reaped yet still counts as alive.
///
/// # Returns
/// * `true` - Process exists
/// * `false` - Process does not exist or permission denied
pub fn is_process_alive(pid: u32) -> bool {
    unsafe { libc::kill(pid as i32, 0) == 0 }
}
