// ── Startup bootstrap ─────────────────────────────────────────────────────────
//
// Runs first thing in `main`, before any window or framework exists:
//   1. suppress OS error dialogs,
//   2. install the crash reporter (once; never removed),
//   3. start logging,
//   4. mention the most recent crash left by an earlier run.

use std::path::Path;

use crate::crash::history::{self, CrashRecord};
use crate::{logging, platform};

pub(crate) fn prepare() {
    platform::suppress_error_dialogs();
    platform::install_crash_reporter();
    logging::init();
    log::debug!("crash reporter installed");

    match platform::crash_dir() {
        Ok(dir) => {
            report_latest(&dir);
        }
        Err(e) => log::debug!("crash directory unavailable: {e}"),
    }
}

/// Log the newest crash record in `dir`, if there is one.
fn report_latest(dir: &Path) -> Option<CrashRecord> {
    match history::latest(dir) {
        Ok(Some(record)) => {
            log::warn!("last native crash: {record}");
            Some(record)
        }
        Ok(None) => None,
        Err(e) => {
            log::debug!("could not scan {} for crash records: {e}", dir.display());
            None
        }
    }
}
