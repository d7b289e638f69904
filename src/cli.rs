use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "musicly-runner",
    version,
    about = "Musicly native bootstrap: crash capture and crash-record inspection"
)]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// List native crash records left in the temp directory
    List {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,

        /// Directory to scan instead of the system temp directory
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Raise a deliberate access violation to exercise the crash reporter
    CrashTest,
}

impl Args {
    /// The command to run; no subcommand means `list`.
    pub(crate) fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::List {
            json: false,
            dir: None,
        })
    }
}

pub(crate) fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        <Args as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_list() {
        let args = Args::try_parse_from(["musicly-runner"]).expect("parse");
        assert_eq!(args.selected_command(), Command::List { json: false, dir: None });
    }

    #[test]
    fn list_accepts_json_and_dir() {
        let args = Args::try_parse_from(["musicly-runner", "list", "--json", "--dir", "crashes"])
            .expect("parse");
        assert_eq!(
            args.selected_command(),
            Command::List {
                json: true,
                dir: Some(PathBuf::from("crashes")),
            }
        );
    }

    #[test]
    fn crash_test_parses() {
        let args = Args::try_parse_from(["musicly-runner", "crash-test"]).expect("parse");
        assert_eq!(args.selected_command(), Command::CrashTest);
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["musicly-runner", "explode"]).is_err());
    }
}
