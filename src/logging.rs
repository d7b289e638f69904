// ── Logging ───────────────────────────────────────────────────────────────────
//
// `log` facade backed by env_logger.  Level defaults to `info` and can be
// overridden with `RUST_LOG`.  Never call into this from the fault handler:
// the logger takes locks that the faulting thread may already hold.

use env_logger::{Builder, Env};

/// Install the global logger.  A second call is a no-op.
pub(crate) fn init() {
    let _ = builder().try_init();
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_secs().format_target(false);
    builder
}
