// ── Summary record ────────────────────────────────────────────────────────────
//
// The human-readable sibling of the snapshot:
//
//     Musicly native crash
//     exception_code: 0xC0000005
//     exception_address: 0x00007FF6A1B2C3D4
//     dump: C:\Users\me\AppData\Local\Temp\Musicly_crash_20261019_101500.dmp
//
// `write` runs inside the fault handler; `parse` runs on the next launch.

use std::fmt::{self, Write};

use serde::Serialize;

use super::{artifact::PATH_CAPACITY, fixed::FixedStr};

/// First line of every summary record.
pub(crate) const BANNER: &str = "Musicly native crash";

const CODE_KEY: &str = "exception_code";
const ADDRESS_KEY: &str = "exception_address";
const DUMP_KEY: &str = "dump";

/// Hex digits in a rendered pointer (`%p` width).
const POINTER_DIGITS: usize = 2 * std::mem::size_of::<usize>();

/// Byte capacity of a formatted summary: the dump path plus the fixed lines.
pub(crate) const SUMMARY_CAPACITY: usize = PATH_CAPACITY + 128;

pub(crate) type SummaryText = FixedStr<SUMMARY_CAPACITY>;

/// Format the diagnostic block for one fault into `out`.
pub(crate) fn write(
    out: &mut SummaryText,
    code: u32,
    address: usize,
    dump_path: &str,
) -> fmt::Result {
    out.clear();
    write!(out, "{BANNER}\r\n")?;
    write!(out, "{CODE_KEY}: 0x{code:08X}\r\n")?;
    write!(
        out,
        "{ADDRESS_KEY}: 0x{address:0width$X}\r\n",
        width = POINTER_DIGITS
    )?;
    write!(out, "{DUMP_KEY}: {dump_path}\r\n")
}

/// A summary record read back from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SummaryRecord {
    /// Exception code, e.g. `0xC0000005` for an access violation.
    #[serde(serialize_with = "hex_code")]
    pub(crate) code: u32,
    /// Faulting instruction address. Stored as `u64` so that records written
    /// by a 64-bit build still parse in a 32-bit one.
    #[serde(serialize_with = "hex_address")]
    pub(crate) address: u64,
    /// Path of the snapshot the record refers to.
    pub(crate) dump: String,
}

/// Parse a summary record. Returns `None` unless the banner and all three
/// fields are present and well-formed.
pub(crate) fn parse(text: &str) -> Option<SummaryRecord> {
    let mut lines = text.lines();
    if lines.next()? != BANNER {
        return None;
    }

    let (mut code, mut address, mut dump) = (None, None, None);
    for line in lines {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        match key {
            CODE_KEY => code = parse_hex(value).and_then(|v| u32::try_from(v).ok()),
            ADDRESS_KEY => address = parse_hex(value),
            DUMP_KEY if !value.is_empty() => dump = Some(value.to_owned()),
            _ => {}
        }
    }

    Some(SummaryRecord {
        code: code?,
        address: address?,
        dump: dump?,
    })
}

fn parse_hex(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

fn hex_code<S: serde::Serializer>(code: &u32, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&format_args!("0x{code:08X}"))
}

fn hex_address<S: serde::Serializer>(address: &u64, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&format_args!("0x{address:016X}"))
}
