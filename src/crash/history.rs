// ── Crash history ─────────────────────────────────────────────────────────────
//
// Reads artifact pairs left behind by earlier runs. Ordinary startup code:
// unlike the handler it may allocate and log freely.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::artifact::{self, ArtifactStamp};
use super::summary::{self, SummaryRecord};
use crate::error::Result;

/// One crash recorded on disk.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CrashRecord {
    pub(crate) stamp: ArtifactStamp,
    #[serde(flatten)]
    pub(crate) summary: SummaryRecord,
    /// Path of the `.dmp.txt` file the record was read from.
    pub(crate) summary_path: PathBuf,
    /// Whether the referenced snapshot still exists.
    pub(crate) dump_present: bool,
}

impl fmt::Display for CrashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  code 0x{:08X} at 0x{:016X}  {}",
            self.stamp, self.summary.code, self.summary.address, self.summary.dump
        )?;
        if !self.dump_present {
            f.write_str(" (missing)")?;
        }
        Ok(())
    }
}

/// Every well-formed crash record in `dir`, oldest first.
///
/// Unrelated files are ignored; unreadable or malformed summaries are skipped.
pub(crate) fn scan(dir: &Path) -> Result<Vec<CrashRecord>> {
    let mut records = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(stamp) = name.to_str().and_then(artifact::stamp_from_summary_name) else {
            continue;
        };

        let path = entry.path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("skipping unreadable crash record {}: {e}", path.display());
                continue;
            }
        };
        let Some(summary) = summary::parse(&text) else {
            log::debug!("skipping malformed crash record {}", path.display());
            continue;
        };

        let dump_present = Path::new(&summary.dump).is_file();
        records.push(CrashRecord {
            stamp,
            summary,
            summary_path: path,
            dump_present,
        });
    }

    records.sort_by_key(|r| r.stamp);
    Ok(records)
}

/// The most recent crash record in `dir`, if any.
pub(crate) fn latest(dir: &Path) -> Result<Option<CrashRecord>> {
    Ok(scan(dir)?.pop())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crash::summary::SummaryText;

    fn write_pair(dir: &Path, name_stamp: &str, code: u32, with_dump: bool) -> PathBuf {
        let dump = dir.join(format!("Musicly_crash_{name_stamp}.dmp"));
        if with_dump {
            fs::write(&dump, b"MDMP").expect("write dump");
        }
        let mut block = SummaryText::new();
        summary::write(&mut block, code, 0x4000, dump.to_str().expect("utf-8 path"))
            .expect("format summary");
        let txt = dir.join(format!("Musicly_crash_{name_stamp}.dmp.txt"));
        fs::write(&txt, block.as_bytes()).expect("write summary");
        dump
    }

    #[test]
    fn scan_returns_records_oldest_first() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_pair(tmp.path(), "20261019_101502", 0xC000_0005, true);
        write_pair(tmp.path(), "20251231_235959", 0xC000_00FD, true);
        write_pair(tmp.path(), "20261019_101500", 0x8000_0003, false);

        let records = scan(tmp.path()).expect("scan");
        let stamps: Vec<String> = records.iter().map(|r| r.stamp.to_string()).collect();
        assert_eq!(stamps, ["20251231_235959", "20261019_101500", "20261019_101502"]);
        assert!(!records[1].dump_present);
        assert!(records[2].dump_present);
        assert_eq!(records[0].summary.code, 0xC000_00FD);
    }

    #[test]
    fn scan_ignores_unrelated_and_malformed_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_pair(tmp.path(), "20261019_101500", 0xC000_0005, true);
        fs::write(tmp.path().join("notes.txt"), "hello").expect("write");
        fs::write(tmp.path().join("Musicly_crash_20261019_101501.dmp.txt"), "garbage")
            .expect("write");
        fs::write(tmp.path().join("Musicly_crash_bogus.dmp.txt"), "garbage").expect("write");

        let records = scan(tmp.path()).expect("scan");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stamp.to_string(), "20261019_101500");
    }

    #[test]
    fn latest_picks_newest() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(latest(tmp.path()).expect("scan").is_none());

        write_pair(tmp.path(), "20261019_101500", 0x1, true);
        let newest = write_pair(tmp.path(), "20261020_000000", 0x2, true);

        let rec = latest(tmp.path()).expect("scan").expect("a record");
        assert_eq!(Path::new(&rec.summary.dump), newest);
        assert_eq!(rec.summary.code, 0x2);
    }

    #[test]
    fn scan_of_missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(scan(&tmp.path().join("nope")).is_err());
    }

    #[test]
    fn record_json_is_flat() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_pair(tmp.path(), "20261019_101500", 0xC000_0005, false);
        let rec = latest(tmp.path()).expect("scan").expect("a record");

        let json = serde_json::to_value(&rec).expect("serialize");
        assert_eq!(json["stamp"], "20261019_101500");
        assert_eq!(json["code"], "0xC0000005");
        assert_eq!(json["dump_present"], false);
        assert!(rec.to_string().ends_with("(missing)"));
    }
}
