// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

mod cli;
mod crash;
mod error;
mod logging;
mod platform;
mod startup;

use std::io::{self, Write};
use std::path::PathBuf;

use cli::Command;
use crash::history;
use error::{Result, RunnerError};

fn main() {
    // Crash capture goes in before anything else runs.
    startup::prepare();

    let args = cli::parse_args();
    if let Err(e) = run(args.selected_command()) {
        // Straight to stderr: RUST_LOG may have silenced the logger.
        eprintln!("{}", failure_message(&e));
        std::process::exit(1);
    }
}

fn failure_message(e: &RunnerError) -> String {
    format!("{}: {e}", env!("CARGO_PKG_NAME"))
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::List { json, dir } => list(json, dir),
        Command::CrashTest => {
            log::warn!("raising a deliberate access violation");
            platform::trigger_access_violation()
        }
    }
}

fn list(json: bool, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => platform::crash_dir()?,
    };
    let records = history::scan(&dir)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &records)?;
        writeln!(out)?;
    } else if records.is_empty() {
        writeln!(out, "no crash records in {}", dir.display())?;
    } else {
        for record in &records {
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_names_the_binary_and_error() {
        let e = RunnerError::PathTooLong { limit: 260 };
        let msg = failure_message(&e);
        assert!(msg.starts_with("musicly-runner: "), "{msg}");
        assert!(msg.ends_with(&e.to_string()), "{msg}");
    }

    #[test]
    fn list_of_missing_dir_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let missing = tmp.path().join("missing");
        assert!(run(Command::List { json: false, dir: Some(missing) }).is_err());
    }
}
