// ── Fixed-capacity text buffer ────────────────────────────────────────────────
//
// The fault handler must not grow heap allocations, so every string it builds
// (paths, the summary block) is formatted into one of these stack buffers.

use std::fmt;
use std::path::Path;

/// A UTF-8 string stored inline in a `[u8; N]` array.
///
/// Writes that would exceed `N` bytes fail with `fmt::Error` and leave the
/// buffer holding the text written so far; they never truncate in the middle
/// of a character.
pub(crate) struct FixedStr<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> FixedStr<N> {
    pub(crate) const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    pub(crate) fn as_str(&self) -> &str {
        // Always valid: `push_str` only ever copies whole `&str` values in.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub(crate) fn as_path(&self) -> &Path {
        Path::new(self.as_str())
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Append `s`, or fail without modifying the buffer if it does not fit.
    pub(crate) fn push_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len.checked_add(s.len()).ok_or(fmt::Error)?;
        if end > N {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }

    pub(crate) fn push(&mut self, c: char) -> fmt::Result {
        let mut tmp = [0u8; 4];
        self.push_str(c.encode_utf8(&mut tmp))
    }

    /// Copy `other` into `self`, replacing the current contents.
    pub(crate) fn set(&mut self, other: &str) -> fmt::Result {
        self.clear();
        self.push_str(other)
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for FixedStr<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s)
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}
