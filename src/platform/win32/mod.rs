// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only module in the codebase where `unsafe` code is permitted.  Every
// `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod crash; // unhandled-exception filter, minidump writer
pub(crate) mod error_mode; // SetErrorMode at startup

// ── Error helpers ─────────────────────────────────────────────────────────────

use windows::Win32::Foundation::GetLastError;

use crate::error::RunnerError;

/// Capture the current Win32 last-error code and wrap it in a `RunnerError`.
///
/// Call immediately after a Win32 function that signals failure: `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
pub(crate) fn last_error(function: &'static str) -> RunnerError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    RunnerError::Win32 {
        function,
        code: code.0,
    }
}
