// ── Artifact naming ───────────────────────────────────────────────────────────
//
// `<tempdir>/Musicly_crash_<YYYYMMDD>_<HHMMSS>.dmp` and its `.txt` sibling.
// Everything here formats into `FixedStr` so it can run inside the handler.

use std::fmt::{self, Write};

use serde::{Serialize, Serializer};

use super::fixed::FixedStr;
use crate::error::RunnerError;

/// Product-identifying prefix shared by every artifact file name.
pub(crate) const ARTIFACT_PREFIX: &str = "Musicly_crash";

/// Extension of the binary process snapshot.
pub(crate) const SNAPSHOT_EXT: &str = ".dmp";

/// Suffix appended to the snapshot path to name the summary record.
pub(crate) const SUMMARY_SUFFIX: &str = ".txt";

/// Platform path-length limit (`MAX_PATH`), in characters.
pub(crate) const MAX_PATH: usize = 260;

/// Byte capacity of a formatted path. A `MAX_PATH` directory of 3-byte UTF-8
/// characters plus the file name still fits.
pub(crate) const PATH_CAPACITY: usize = MAX_PATH * 3 + 64;

/// Stack buffer holding a path built inside the fault handler.
pub(crate) type PathText = FixedStr<PATH_CAPACITY>;

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// Local wall-clock time at second granularity.
///
/// Field order matches significance, so the derived `Ord` agrees with the
/// lexical order of the `YYYYMMDD_HHMMSS` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ArtifactStamp {
    pub(crate) year: u16,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
}

impl ArtifactStamp {
    /// Length of the rendered form, `YYYYMMDD_HHMMSS`.
    pub(crate) const RENDERED_LEN: usize = 15;

    pub(crate) fn from_chrono<T: chrono::Datelike + chrono::Timelike>(t: &T) -> Self {
        Self {
            // Years outside 0..=9999 cannot be rendered in four digits.
            year: t.year().clamp(0, 9999) as u16,
            month: t.month() as u8,
            day: t.day() as u8,
            hour: t.hour() as u8,
            minute: t.minute() as u8,
            second: t.second() as u8,
        }
    }

    /// Parse the `YYYYMMDD_HHMMSS` rendering back into a stamp.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() != Self::RENDERED_LEN || !b.is_ascii() || b[8] != b'_' {
            return None;
        }
        let num = |range: std::ops::Range<usize>| -> Option<u16> {
            let digits = &s[range];
            if !digits.bytes().all(|c| c.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()
        };
        let stamp = Self {
            year: num(0..4)?,
            month: num(4..6)? as u8,
            day: num(6..8)? as u8,
            hour: num(9..11)? as u8,
            minute: num(11..13)? as u8,
            second: num(13..15)? as u8,
        };
        let valid = (1..=12).contains(&stamp.month)
            && (1..=31).contains(&stamp.day)
            && stamp.hour < 24
            && stamp.minute < 60
            && stamp.second < 60;
        valid.then_some(stamp)
    }
}

impl fmt::Display for ArtifactStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}_{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl Serialize for ArtifactStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Reject a temp directory longer than `MAX_PATH` characters.
///
/// Every `FaultEnvironment` funnels its temp-dir length through here.
pub(crate) fn check_path_limit(chars: usize) -> crate::error::Result<()> {
    if chars > MAX_PATH {
        return Err(RunnerError::PathTooLong { limit: MAX_PATH });
    }
    Ok(())
}

/// Write `<dir>/<prefix>_<stamp>.dmp` into `out`.
///
/// `dir` may or may not end with a separator (`GetTempPathW` always appends
/// one, `std::env::temp_dir` does not).
pub(crate) fn write_snapshot_path(
    out: &mut PathText,
    dir: &str,
    stamp: &ArtifactStamp,
) -> fmt::Result {
    out.clear();
    out.push_str(dir)?;
    if !dir.is_empty() && !dir.ends_with(is_separator) {
        out.push(std::path::MAIN_SEPARATOR)?;
    }
    write!(out, "{ARTIFACT_PREFIX}_{stamp}{SNAPSHOT_EXT}")
}

/// Write `<snapshot path>.txt` into `out`.
pub(crate) fn write_summary_path(out: &mut PathText, snapshot_path: &str) -> fmt::Result {
    out.set(snapshot_path)?;
    out.push_str(SUMMARY_SUFFIX)
}

/// Extract the stamp from a summary record file name
/// (`Musicly_crash_<stamp>.dmp.txt`).
pub(crate) fn stamp_from_summary_name(name: &str) -> Option<ArtifactStamp> {
    let rest = name.strip_prefix(ARTIFACT_PREFIX)?.strip_prefix('_')?;
    let stamp = rest
        .strip_suffix(SUMMARY_SUFFIX)?
        .strip_suffix(SNAPSHOT_EXT)?;
    ArtifactStamp::parse(stamp)
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(day: u8, second: u8) -> ArtifactStamp {
        ArtifactStamp { year: 2026, month: 3, day, hour: 7, minute: 5, second }
    }

    #[test]
    fn stamp_renders_fixed_width() {
        assert_eq!(stamp(9, 4).to_string(), "20260309_070504");
        assert_eq!(stamp(9, 4).to_string().len(), ArtifactStamp::RENDERED_LEN);
    }

    #[test]
    fn stamp_order_matches_lexical_order() {
        let a = stamp(9, 4);
        let b = stamp(10, 0);
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn stamp_parse_inverts_display() {
        let s = stamp(28, 59);
        assert_eq!(ArtifactStamp::parse(&s.to_string()), Some(s));
    }

    #[test]
    fn stamp_parse_rejects_garbage() {
        assert_eq!(ArtifactStamp::parse("20260309-070504"), None);
        assert_eq!(ArtifactStamp::parse("2026030_0705040"), None);
        assert_eq!(ArtifactStamp::parse("20261309_070504"), None);
        assert_eq!(ArtifactStamp::parse("2026+309_070504"), None);
        assert_eq!(ArtifactStamp::parse(""), None);
        assert_eq!(ArtifactStamp::parse("2026\u{00e9}09_070504"), None);
    }

    #[test]
    fn stamp_from_chrono_drops_subseconds() {
        let t = chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 1_500))
            .expect("valid leap-second time");
        let s = ArtifactStamp::from_chrono(&t);
        assert_eq!(s.to_string(), "20261019_235959");
    }

    #[test]
    fn snapshot_path_adds_separator_once() {
        let sep = std::path::MAIN_SEPARATOR;
        let mut out = PathText::new();

        write_snapshot_path(&mut out, "tmp", &stamp(9, 4)).unwrap();
        assert_eq!(out.as_str(), format!("tmp{sep}Musicly_crash_20260309_070504.dmp"));

        let with_sep = format!("tmp{sep}");
        write_snapshot_path(&mut out, &with_sep, &stamp(9, 4)).unwrap();
        assert_eq!(out.as_str(), format!("tmp{sep}Musicly_crash_20260309_070504.dmp"));
    }

    #[test]
    fn summary_path_appends_txt() {
        let mut out = PathText::new();
        write_summary_path(&mut out, "C:\\Temp\\Musicly_crash_20260309_070504.dmp").unwrap();
        assert_eq!(out.as_str(), "C:\\Temp\\Musicly_crash_20260309_070504.dmp.txt");
    }

    #[test]
    fn oversized_directory_fails_to_format() {
        let mut out = PathText::new();
        let dir = "d".repeat(PATH_CAPACITY);
        assert!(write_snapshot_path(&mut out, &dir, &stamp(1, 1)).is_err());
    }

    #[test]
    fn path_limit_accepts_max_path() {
        assert!(check_path_limit(0).is_ok());
        assert!(check_path_limit(MAX_PATH).is_ok());
    }

    #[test]
    fn path_limit_rejects_one_past_max_path() {
        match check_path_limit(MAX_PATH + 1) {
            Err(RunnerError::PathTooLong { limit }) => assert_eq!(limit, 260),
            other => panic!("expected PathTooLong, got {other:?}"),
        }
    }

    #[test]
    fn summary_name_yields_stamp() {
        assert_eq!(
            stamp_from_summary_name("Musicly_crash_20260309_070504.dmp.txt"),
            Some(stamp(9, 4))
        );
        assert_eq!(stamp_from_summary_name("Musicly_crash_20260309_070504.dmp"), None);
        assert_eq!(stamp_from_summary_name("Other_crash_20260309_070504.dmp.txt"), None);
        assert_eq!(stamp_from_summary_name("Musicly_crash_latest.dmp.txt"), None);
    }
}
