// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations outside the fault handler return `error::Result<T>`.
// The handler itself never surfaces errors: it maps every failure onto a
// `FilterOutcome` (see `crash::reporter`).

/// Every error that the runner can produce.
#[derive(Debug)]
pub enum RunnerError {
    /// A Win32 API call returned a failure code.
    #[cfg_attr(not(windows), allow(dead_code))]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value).
        code: u32,
    },

    /// The system temp directory could not be resolved.
    TempDirUnavailable,

    /// A path did not fit the platform limit or a fixed-capacity buffer.
    PathTooLong {
        /// The limit that was exceeded, in characters.
        limit: usize,
    },

    /// A standard I/O error (directory scan, file read, stdout, …).
    Io(std::io::Error),

    /// JSON serialisation of crash records failed.
    Json(serde_json::Error),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::TempDirUnavailable => f.write_str("temp directory unavailable"),
            Self::PathTooLong { limit } => {
                write!(f, "path exceeds the {limit}-character limit")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Win32 { .. } | Self::TempDirUnavailable | Self::PathTooLong { .. } => None,
        }
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for RunnerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RunnerError>;
