use crate::domain::errors::ValidationError;
use crate::services::policy::parse_date;
use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sunset",
    version,
    about = "Command-API CLI with deprecation lifecycle",
    after_help = "Commands from the command tree are run as: sunset <group> <command> [args]"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "SUNSET_TODAY",
        value_parser = parse_today,
        help = "Evaluate deprecations as of this date (YYYY-MM-DD)"
    )]
    pub today: Option<NaiveDate>,
    #[arg(long, global = true, help = "Disable colored banners")]
    pub no_color: bool,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List commands with their deprecation tags
    List { group: Option<String> },
    /// Show the computed deprecation lifecycle of one command
    Lifecycle { command: String, subcommand: String },
    /// Cache the command metadata from a login response
    Login {
        #[arg(long, help = "Login response JSON as returned by the API")]
        meta: PathBuf,
    },
    /// Remove cached metadata and configuration
    Cleanup,
    #[command(external_subcommand)]
    Tree(Vec<String>),
}

fn parse_today(s: &str) -> Result<NaiveDate, ValidationError> {
    parse_date("--today", s)
}

impl Cli {
    /// Global flags written after a tree command reach us as raw arguments.
    /// Moves them back onto `Cli`; everything after `--` is left alone.
    pub fn lift_tree_globals(mut self) -> Result<Self, clap::Error> {
        let args = match &mut self.command {
            Some(Commands::Tree(args)) => std::mem::take(args),
            _ => return Ok(self),
        };
        let mut kept = Vec::with_capacity(args.len());
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--" => {
                    kept.push(arg);
                    kept.extend(iter.by_ref());
                }
                "--json" => self.json = true,
                "--no-color" => self.no_color = true,
                "-v" | "--verbose" => self.verbose = self.verbose.saturating_add(1),
                "-vv" => self.verbose = self.verbose.saturating_add(2),
                "--today" => {
                    let value = iter.next().ok_or_else(|| {
                        Cli::command().error(
                            ErrorKind::InvalidValue,
                            "a value is required for '--today <TODAY>'",
                        )
                    })?;
                    self.today = Some(today_arg(&value)?);
                }
                _ => match arg.strip_prefix("--today=") {
                    Some(value) => self.today = Some(today_arg(value)?),
                    None => kept.push(arg),
                },
            }
        }
        self.command = Some(Commands::Tree(kept));
        Ok(self)
    }
}

fn today_arg(value: &str) -> Result<NaiveDate, clap::Error> {
    parse_today(value).map_err(|e| {
        Cli::command().error(
            ErrorKind::ValueValidation,
            format!("invalid value '{value}' for '--today <TODAY>': {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_commands_pass_through_raw() {
        let cli = Cli::parse_from(["sunset", "meta", "export", "--output", "x", "--help"]);
        match cli.command {
            Some(Commands::Tree(args)) => {
                assert_eq!(args, vec!["meta", "export", "--output", "x", "--help"]);
            }
            other => panic!("expected tree command, got {other:?}"),
        }
    }

    #[test]
    fn today_is_strict() {
        let cli = Cli::parse_from(["sunset", "--today", "2025-05-01", "list"]);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert!(Cli::try_parse_from(["sunset", "--today", "2025-5-1", "list"]).is_err());
    }

    fn tree_args(cli: Cli) -> Vec<String> {
        match cli.command {
            Some(Commands::Tree(args)) => args,
            other => panic!("expected tree command, got {other:?}"),
        }
    }

    #[test]
    fn globals_after_tree_command_are_lifted() {
        let cli = Cli::parse_from([
            "sunset", "meta", "show", "--json", "--today", "2025-05-01", "-v", "--no-color",
        ])
        .lift_tree_globals()
        .unwrap();
        assert!(cli.json);
        assert!(cli.no_color);
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(tree_args(cli), vec!["meta", "show"]);

        let cli = Cli::parse_from(["sunset", "meta", "path", "--today=2025-01-01"])
            .lift_tree_globals()
            .unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2025, 1, 1));
    }

    #[test]
    fn lifting_stops_at_terminator() {
        let cli = Cli::parse_from(["sunset", "meta", "export", "--", "--json"])
            .lift_tree_globals()
            .unwrap();
        assert!(!cli.json);
        assert_eq!(tree_args(cli), vec!["meta", "export", "--", "--json"]);
    }

    #[test]
    fn lifted_today_is_strict() {
        let err = Cli::parse_from(["sunset", "meta", "path", "--today", "2025-5-1"])
            .lift_tree_globals()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(Cli::parse_from(["sunset", "meta", "path", "--today"])
            .lift_tree_globals()
            .is_err());
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::parse_from(["sunset"]);
        assert!(cli.command.is_none());
    }
}
