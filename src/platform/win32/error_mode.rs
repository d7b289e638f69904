#![allow(unsafe_code)]

use windows::Win32::System::Diagnostics::Debug::{
    SetErrorMode, SEM_FAILCRITICALERRORS, SEM_NOGPFAULTERRORBOX, SEM_NOOPENFILEERRORBOX,
};

/// Stop Windows from showing its own critical-error, GP-fault and
/// missing-media dialogs.  A fault then goes straight to our filter and the
/// default termination path instead of blocking on a message box.
///
/// Called once at startup, right before the crash reporter is installed.
pub(crate) fn suppress_error_dialogs() {
    // SAFETY: SetErrorMode only updates the process error-mode flags; it has
    // no pointer arguments.  The previous mode it returns is not needed.
    unsafe {
        let _ = SetErrorMode(SEM_FAILCRITICALERRORS | SEM_NOGPFAULTERRORBOX | SEM_NOOPENFILEERRORBOX);
    }
}
