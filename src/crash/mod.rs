// ── Native crash capture ──────────────────────────────────────────────────────
//
// Platform-neutral half of the last-resort crash reporter. The OS-facing
// pieces (filter registration, temp path, clock, minidump) live in
// `platform`; everything here is safe Rust and unit-testable on any host.

pub(crate) mod artifact;
pub(crate) mod fixed;
pub(crate) mod history;
pub(crate) mod reporter;
pub(crate) mod summary;

use std::ffi::c_void;

/// One unhandled fault, as delivered to the filter.
///
/// Borrowed from the OS for the duration of the filter call; never stored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FaultEvent {
    /// Exception code, e.g. `0xC0000005` (`EXCEPTION_ACCESS_VIOLATION`).
    pub(crate) code: u32,
    /// Address of the faulting instruction.
    pub(crate) address: usize,
    /// Opaque platform fault context. On Windows this is the
    /// `EXCEPTION_POINTERS` block handed to the filter; null when simulated.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) context: *const c_void,
}

impl FaultEvent {
    /// A fault with no platform context.
    #[cfg(test)]
    pub(crate) fn simulated(code: u32, address: usize) -> Self {
        Self {
            code,
            address,
            context: std::ptr::null(),
        }
    }
}

/// What the filter tells the OS after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterOutcome {
    /// Declined: let the OS keep looking for another handler.
    ContinueSearch,
    /// Handled: proceed to the default fault-termination path.
    ExecuteHandler,
}

impl FilterOutcome {
    /// The `LONG` value an unhandled-exception filter returns.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn as_filter_code(self) -> i32 {
        match self {
            // EXCEPTION_CONTINUE_SEARCH
            Self::ContinueSearch => 0,
            // EXCEPTION_EXECUTE_HANDLER
            Self::ExecuteHandler => 1,
        }
    }
}
