// ── Unhandled-exception filter ────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the process-wide filter (`SetUnhandledExceptionFilter`).
//   • Translate `EXCEPTION_POINTERS` into a `FaultEvent`.
//   • Provide the Win32 `FaultEnvironment` (GetTempPathW, GetLocalTime,
//     GetCurrentThreadId) and the `MiniDumpWriteDump` snapshot writer.
//
// The filter runs on the faulting thread with the process in an unknown
// state: no logging, no locks.  Paths and the summary are formatted into stack
// buffers; opening the two artifact files still lets std allocate a UTF-16
// copy of each path.

#![allow(unsafe_code)]

use std::fs::File;
use std::io;
use std::os::windows::io::AsRawHandle;

use windows::Win32::{
    Foundation::{FALSE, HANDLE},
    Storage::FileSystem::GetTempPathW,
    System::{
        Diagnostics::Debug::{
            MiniDumpNormal, MiniDumpWriteDump, SetUnhandledExceptionFilter, EXCEPTION_POINTERS,
            MINIDUMP_EXCEPTION_INFORMATION,
        },
        SystemInformation::GetLocalTime,
        Threading::{GetCurrentProcess, GetCurrentProcessId, GetCurrentThreadId},
    },
};

use crate::crash::{
    artifact::{self, ArtifactStamp, PathText, MAX_PATH},
    reporter::{FaultEnvironment, SnapshotWriter},
    FaultEvent,
};
use crate::error::{Result, RunnerError};

use super::last_error;

// ── Registration ──────────────────────────────────────────────────────────────

/// Install the crash reporter as the process-wide unhandled-exception filter.
///
/// Call exactly once, at process start, before any window or framework is
/// created.  There is no matching uninstall: process death ends its life.
pub(crate) fn install_crash_reporter() {
    // SAFETY: `unhandled_exception_filter` matches the
    // LPTOP_LEVEL_EXCEPTION_FILTER signature and is a plain function with
    // 'static lifetime.  The previously installed filter is not chained.
    unsafe {
        let _previous = SetUnhandledExceptionFilter(Some(unhandled_exception_filter));
    }
}

// SAFETY: registered via SetUnhandledExceptionFilter.  Windows passes either
// null or a pointer to EXCEPTION_POINTERS that is valid for this call only;
// it must not be retained after returning.
unsafe extern "system" fn unhandled_exception_filter(info: *const EXCEPTION_POINTERS) -> i32 {
    let fault = fault_from_pointers(info);
    crate::platform::report_fault(&fault).as_filter_code()
}

/// Read the exception code and address out of `info`, tolerating null at
/// either level of indirection.
///
/// # Safety
///
/// `info` must be null or point to a valid `EXCEPTION_POINTERS` whose
/// `ExceptionRecord` is null or valid.
unsafe fn fault_from_pointers(info: *const EXCEPTION_POINTERS) -> FaultEvent {
    // SAFETY: guaranteed by the caller; `as_ref` handles the null cases.
    let record = unsafe { info.as_ref().and_then(|p| p.ExceptionRecord.as_ref()) };
    FaultEvent {
        // NTSTATUS is i32; reinterpret bits as u32 for display.
        code: record.map_or(0, |r| r.ExceptionCode.0 as u32),
        address: record.map_or(0, |r| r.ExceptionAddress as usize),
        context: info.cast(),
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

/// Temp path, clock and thread id straight from kernel32.
pub(crate) struct Win32Environment;

impl FaultEnvironment for Win32Environment {
    fn temp_dir(&self, out: &mut PathText) -> Result<()> {
        let mut wide = [0u16; MAX_PATH];

        // SAFETY: `wide` is a writable buffer whose length is passed along
        // with it; GetTempPathW never writes past that length.
        let len = unsafe { GetTempPathW(Some(&mut wide[..])) } as usize;

        // 0 means failure.  A path that does not fit together with its NUL
        // reports the size it would need, so a 260-character path returns
        // 261 and is declined here.
        if len == 0 {
            return Err(last_error("GetTempPathW"));
        }
        artifact::check_path_limit(len)?;

        out.clear();
        for c in char::decode_utf16(wide[..len].iter().copied()) {
            let c = c.map_err(|_| RunnerError::TempDirUnavailable)?;
            out.push(c)
                .map_err(|_| RunnerError::PathTooLong { limit: MAX_PATH })?;
        }
        Ok(())
    }

    fn local_time(&self) -> ArtifactStamp {
        // SAFETY: GetLocalTime has no preconditions and cannot fail.
        let st = unsafe { GetLocalTime() };
        ArtifactStamp {
            year: st.wYear,
            month: st.wMonth as u8,
            day: st.wDay as u8,
            hour: st.wHour as u8,
            minute: st.wMinute as u8,
            second: st.wSecond as u8,
        }
    }

    fn current_thread_id(&self) -> u32 {
        // SAFETY: GetCurrentThreadId has no preconditions and cannot fail.
        unsafe { GetCurrentThreadId() }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// `MiniDumpWriteDump` with `MiniDumpNormal`: threads, stacks and the module
/// list, but no heap.
pub(crate) struct MiniDumpWriter;

impl SnapshotWriter for MiniDumpWriter {
    fn write_process_snapshot(
        &self,
        file: &File,
        thread_id: u32,
        fault: &FaultEvent,
    ) -> io::Result<()> {
        let exception = MINIDUMP_EXCEPTION_INFORMATION {
            ThreadId: thread_id,
            ExceptionPointers: fault.context.cast_mut().cast(),
            // The pointers refer to our own address space.
            ClientPointers: FALSE,
        };
        let exception_param = (!fault.context.is_null())
            .then_some(&exception as *const MINIDUMP_EXCEPTION_INFORMATION);

        // SAFETY: the process pseudo-handle and id identify the current
        // process.  `file` is an open, writable handle kept alive by the
        // borrow for the whole call.  `exception` outlives the call and its
        // ExceptionPointers came from the OS for this fault (or the param is
        // omitted when there is no context).
        unsafe {
            MiniDumpWriteDump(
                GetCurrentProcess(),
                GetCurrentProcessId(),
                HANDLE(file.as_raw_handle()),
                MiniDumpNormal,
                exception_param,
                None,
                None,
            )
        }
        .map_err(|e| io::Error::from_raw_os_error(e.code().0))
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// Raise a genuine access violation (`0xC0000005`) so the installed filter
/// can be exercised end to end.
pub(crate) fn trigger_access_violation() -> ! {
    // The first 64 KiB of the address space is never mapped on Windows.
    // A non-null address keeps debug-build pointer checks out of the way so
    // the write reaches the MMU.
    let unmapped = 0x10 as *mut u8;

    // SAFETY: deliberately unsound.  The write faults immediately; this
    // exists only for the `crash-test` command.
    unsafe {
        unmapped.write_volatile(0x4D);
    }
    // Only reached if the write somehow did not fault.
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use windows::Win32::{Foundation::NTSTATUS, System::Diagnostics::Debug::EXCEPTION_RECORD};

    use super::*;

    #[test]
    fn temp_dir_ends_with_separator() {
        let mut out = PathText::new();
        Win32Environment.temp_dir(&mut out).expect("GetTempPathW");
        assert!(out.as_str().ends_with('\\'));
        assert!(out.as_path().is_dir());
    }

    #[test]
    fn local_time_is_in_range() {
        let s = Win32Environment.local_time();
        assert!(s.year >= 2000);
        assert!((1..=12).contains(&s.month));
        assert!(s.second < 60);
    }

    #[test]
    fn null_pointers_become_zeroed_fault() {
        // SAFETY: null is an accepted input.
        let fault = unsafe { fault_from_pointers(ptr::null()) };
        assert_eq!(fault.code, 0);
        assert_eq!(fault.address, 0);
        assert!(fault.context.is_null());
    }

    #[test]
    fn record_fields_are_copied() {
        let mut record = EXCEPTION_RECORD {
            ExceptionCode: NTSTATUS(0xC000_0005_u32 as i32),
            ExceptionAddress: 0x1234 as *mut _,
            ..Default::default()
        };
        let pointers = EXCEPTION_POINTERS {
            ExceptionRecord: &mut record,
            ContextRecord: ptr::null_mut(),
        };
        // SAFETY: both structures live on this stack frame for the call.
        let fault = unsafe { fault_from_pointers(&pointers) };
        assert_eq!(fault.code, 0xC000_0005);
        assert_eq!(fault.address, 0x1234);
        assert!(!fault.context.is_null());
    }

    #[test]
    fn minidump_without_context_writes_a_dump() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("snapshot.dmp");
        let file = File::create(&path).expect("create");
        let fault = FaultEvent::simulated(0xC000_0005, 0);

        MiniDumpWriter
            .write_process_snapshot(&file, Win32Environment.current_thread_id(), &fault)
            .expect("MiniDumpWriteDump");
        drop(file);

        let bytes = std::fs::read(&path).expect("read dump");
        assert_eq!(&bytes[..4], b"MDMP");
    }
}
