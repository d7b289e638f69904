// ── Non-Windows fallbacks ─────────────────────────────────────────────────────
//
// Keeps the crash core buildable and testable off Windows.  There is no
// unhandled-exception filter to register and no minidump format, so
// installation is a no-op and snapshots are left empty.  `crash-test` feeds
// the reporter a synthetic access violation instead of a hardware fault.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::crash::{
    artifact::{self, ArtifactStamp, PathText, MAX_PATH},
    reporter::{FaultEnvironment, SnapshotWriter},
    FaultEvent,
};
use crate::error::{Result, RunnerError};

/// `EXCEPTION_ACCESS_VIOLATION`, reused so summaries read the same everywhere.
const ACCESS_VIOLATION: u32 = 0xC000_0005;

/// No process-wide fault filter exists on this target.
pub(crate) fn install_crash_reporter() {}

/// No OS error dialogs to suppress on this target.
pub(crate) fn suppress_error_dialogs() {}

/// Stand-in for the Windows access violation used by `crash-test`: report a
/// synthetic fault at this function's address, then abort.
pub(crate) fn trigger_access_violation() -> ! {
    let fault = FaultEvent {
        code: ACCESS_VIOLATION,
        address: trigger_access_violation as usize,
        context: std::ptr::null(),
    };
    let _ = super::report_fault(&fault);
    std::process::abort()
}

/// Temp path from std, local time from chrono.
pub(crate) struct PortableEnvironment;

impl FaultEnvironment for PortableEnvironment {
    fn temp_dir(&self, out: &mut PathText) -> Result<()> {
        copy_temp_dir(&std::env::temp_dir(), out)
    }

    fn local_time(&self) -> ArtifactStamp {
        ArtifactStamp::from_chrono(&chrono::Local::now())
    }

    /// Not exposed portably; `NoopSnapshotWriter` ignores it.
    fn current_thread_id(&self) -> u32 {
        0
    }
}

fn copy_temp_dir(dir: &Path, out: &mut PathText) -> Result<()> {
    let dir = dir.to_str().ok_or(RunnerError::TempDirUnavailable)?;
    if dir.is_empty() {
        return Err(RunnerError::TempDirUnavailable);
    }
    artifact::check_path_limit(dir.chars().count())?;
    out.set(dir)
        .map_err(|_| RunnerError::PathTooLong { limit: MAX_PATH })
}

/// Leaves the snapshot file empty.
pub(crate) struct NoopSnapshotWriter;

impl SnapshotWriter for NoopSnapshotWriter {
    fn write_process_snapshot(&self, _: &File, _: u32, _: &FaultEvent) -> io::Result<()> {
        Ok(())
    }
}
