// ── Crash reporter ────────────────────────────────────────────────────────────
//
// The fixed sequence run by the unhandled-fault filter:
//
//   1. resolve the temp directory            (failure → ContinueSearch)
//   2. stamp the artifact name
//   3. create `<base>.dmp`                   (failure → ContinueSearch)
//   4. create `<base>.dmp.txt`               (best effort)
//   5. write the summary block and close it
//   6. write the process snapshot and close the `.dmp`
//   7. ExecuteHandler
//
// The code below runs on the faulting thread with the process in an unknown
// state. It must not log, lock or panic. All text is formatted into `FixedStr`
// stack buffers; the only heap use is std's own path conversion inside
// `OpenOptions::open` (UTF-16 on Windows, a C string elsewhere).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};

use super::artifact::{self, ArtifactStamp, PathText};
use super::summary::{self, SummaryText};
use super::{FaultEvent, FilterOutcome};
use crate::error::Result;

// ── Capabilities ──────────────────────────────────────────────────────────────

/// What the handler needs from the OS besides the file system.
pub(crate) trait FaultEnvironment {
    /// Write the system temp directory into `out`.
    ///
    /// Fails with `TempDirUnavailable` when the OS cannot supply one and with
    /// `PathTooLong` when it exceeds `MAX_PATH`.
    fn temp_dir(&self, out: &mut PathText) -> Result<()>;

    /// Current local wall-clock time.
    fn local_time(&self) -> ArtifactStamp;

    /// OS identifier of the calling thread.
    fn current_thread_id(&self) -> u32;
}

/// Produces the binary process snapshot.
pub(crate) trait SnapshotWriter {
    /// Write a normal-fidelity snapshot (threads, stacks, modules; not full
    /// memory) of the current process into `file`.
    fn write_process_snapshot(
        &self,
        file: &File,
        thread_id: u32,
        fault: &FaultEvent,
    ) -> io::Result<()>;
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Stateless pairing of an environment and a snapshot writer.
///
/// Built on the stack inside the filter callback; nothing about it is stored
/// globally.
pub(crate) struct CrashReporter<E, W> {
    env: E,
    writer: W,
}

impl<E: FaultEnvironment, W: SnapshotWriter> CrashReporter<E, W> {
    pub(crate) fn new(env: E, writer: W) -> Self {
        Self { env, writer }
    }

    /// Capture the artifact pair for `fault` and report the filter outcome.
    pub(crate) fn on_fault(&self, fault: &FaultEvent) -> FilterOutcome {
        let mut dir = PathText::new();
        if self.env.temp_dir(&mut dir).is_err() {
            return FilterOutcome::ContinueSearch;
        }

        let stamp = self.env.local_time();
        let mut dump_path = PathText::new();
        if artifact::write_snapshot_path(&mut dump_path, dir.as_str(), &stamp).is_err() {
            return FilterOutcome::ContinueSearch;
        }

        let Ok(dump) = create_artifact(&dump_path) else {
            return FilterOutcome::ContinueSearch;
        };

        // From here on the snapshot file exists and the outcome is fixed.
        write_summary(&dump_path, fault);

        let thread_id = self.env.current_thread_id();
        let _ = self.writer.write_process_snapshot(&dump, thread_id, fault);
        drop(dump);

        FilterOutcome::ExecuteHandler
    }
}

/// Best-effort creation of `<dump>.txt`. Every failure is swallowed.
fn write_summary(dump_path: &PathText, fault: &FaultEvent) {
    let mut txt_path = PathText::new();
    if artifact::write_summary_path(&mut txt_path, dump_path.as_str()).is_err() {
        return;
    }
    let Ok(mut txt) = create_artifact(&txt_path) else {
        return;
    };

    let mut block = SummaryText::new();
    if summary::write(&mut block, fault.code, fault.address, dump_path.as_str()).is_ok() {
        let _ = txt.write_all(block.as_bytes());
    }
    // `txt` closes on drop whether or not the write succeeded.
}

/// Create-or-truncate `path` for writing, unshared on Windows.
fn create_artifact(path: &PathText) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        options.share_mode(0);
    }
    options.open(path.as_path())
}
