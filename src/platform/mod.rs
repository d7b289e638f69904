// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface that the rest of the codebase uses to
// talk to the OS.  No `unsafe` lives here; all Win32 FFI is confined to the
// `win32` sub-module and never leaks outward.  Other targets get the
// `portable` fallbacks: std/chrono for time and paths, no minidump.

use std::path::PathBuf;

use crate::crash::artifact::PathText;
use crate::crash::reporter::{CrashReporter, FaultEnvironment};
use crate::crash::{FaultEvent, FilterOutcome};
use crate::error::Result;

#[cfg(windows)]
pub mod win32;

#[cfg(windows)]
pub(crate) use win32::{
    crash::{
        install_crash_reporter, trigger_access_violation, MiniDumpWriter as SystemSnapshotWriter,
        Win32Environment as SystemEnvironment,
    },
    error_mode::suppress_error_dialogs,
};

#[cfg(not(windows))]
mod portable;

#[cfg(not(windows))]
pub(crate) use portable::{
    install_crash_reporter, suppress_error_dialogs, trigger_access_violation,
    NoopSnapshotWriter as SystemSnapshotWriter, PortableEnvironment as SystemEnvironment,
};

/// Capture the artifact pair for `fault` with this target's environment and
/// snapshot writer.  Runs inside the fault path: no logging.
pub(crate) fn report_fault(fault: &FaultEvent) -> FilterOutcome {
    CrashReporter::new(SystemEnvironment, SystemSnapshotWriter).on_fault(fault)
}

/// The temp directory the crash reporter writes into, resolved the same way
/// the fault handler resolves it.
pub(crate) fn crash_dir() -> Result<PathBuf> {
    let mut out = PathText::new();
    SystemEnvironment.temp_dir(&mut out)?;
    Ok(out.as_path().to_path_buf())
}
