//! Command-line argument parsing for LeadPilot
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::errors::{LeadError, Result};
use crate::leads::LeadStore;
use crate::types::{Lead, NewLead};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LeadPilot - Manage sales leads and ask an AI assistant how to follow up
#[derive(Parser, Debug)]
#[command(name = "leadpilot")]
#[command(version)]
#[command(about = "Manage sales leads and get streamed AI follow-up advice", long_about = None)]
pub struct Args {
    /// Model to use (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start with an empty lead list instead of the sample leads
    #[arg(long)]
    pub no_samples: bool,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive REPL mode (default)
    Start,

    /// Ask one question about a lead and stream the answer
    Ask(AskArgs),

    /// Display current configuration
    Config {
        /// Write a default config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}

/// Arguments of the one-shot `ask` command
///
/// The lead is either described inline (`--name`, `--email`, `--phone`) or
/// picked from the sample leads by id; the first sample lead is the default.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct AskArgs {
    /// Question for the assistant
    pub question: String,

    /// Sample lead id or unique id prefix
    #[arg(long, conflicts_with = "name")]
    pub lead: Option<String>,

    /// Lead name, for a lead described on the command line
    #[arg(long, requires = "email")]
    pub name: Option<String>,

    /// Lead email
    #[arg(long, requires = "name")]
    pub email: Option<String>,

    /// Lead phone number
    #[arg(long, requires = "name")]
    pub phone: Option<String>,
}

impl AskArgs {
    /// The lead the question is about
    pub fn target_lead(&self) -> Result<Lead> {
        if let Some(name) = &self.name {
            let mut store = LeadStore::new();
            let candidate = NewLead::manual(
                name.as_str(),
                self.email.clone().unwrap_or_default(),
                self.phone.clone(),
            );
            return store.add(candidate).cloned();
        }

        let store = LeadStore::with_sample_leads();
        match &self.lead {
            Some(id) => store.resolve(id).cloned(),
            None => store
                .all()
                .first()
                .cloned()
                .ok_or_else(|| LeadError::LeadNotFound("no sample lead".to_string())),
        }
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run, REPL when none given
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Start)
    }
}

impl Verbosity {
    /// Default log filter for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "leadpilot=info,warn",
            Verbosity::VeryVerbose => "leadpilot=debug,info",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["leadpilot", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["leadpilot"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["leadpilot", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["leadpilot", "-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_default_command_is_start() {
        let args = parse(&["leadpilot"]);
        assert_eq!(args.command(), &Commands::Start);
    }

    fn ask_args(argv: &[&str]) -> AskArgs {
        match parse(argv).command() {
            Commands::Ask(ask) => ask.clone(),
            other => panic!("expected ask, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_command() {
        let args = parse(&["leadpilot", "--model", "x/y", "ask", "How to follow up?"]);
        assert_eq!(args.model.as_deref(), Some("x/y"));

        let ask = ask_args(&["leadpilot", "ask", "How to follow up?"]);
        assert_eq!(ask.question, "How to follow up?");
        assert_eq!(ask.target_lead().unwrap().name, "Sarah Johnson");
    }

    #[test]
    fn test_ask_about_sample_lead_by_id() {
        let ask = ask_args(&["leadpilot", "ask", "--lead", "2", "Next step?"]);
        assert_eq!(ask.target_lead().unwrap().name, "Michael Chen");

        let missing = ask_args(&["leadpilot", "ask", "--lead", "nope", "Next step?"]);
        assert!(matches!(
            missing.target_lead().unwrap_err(),
            LeadError::LeadNotFound(_)
        ));
    }

    #[test]
    fn test_ask_about_inline_lead() {
        let ask = ask_args(&[
            "leadpilot",
            "ask",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--phone",
            "+44 20 7946 0000",
            "Best opener?",
        ]);
        let lead = ask.target_lead().unwrap();

        assert_eq!(lead.name, "Ada Lovelace");
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(lead.phone.as_deref(), Some("+44 20 7946 0000"));
    }

    #[test]
    fn test_ask_inline_lead_needs_email() {
        assert!(Args::try_parse_from(["leadpilot", "ask", "--name", "Ada", "q"]).is_err());
        let conflicting = Args::try_parse_from([
            "leadpilot",
            "ask",
            "--lead",
            "1",
            "--name",
            "Ada",
            "--email",
            "a@b.c",
            "q",
        ]);
        assert!(conflicting.is_err());
    }

    #[test]
    fn test_config_init_flag() {
        assert_eq!(
            parse(&["leadpilot", "config"]).command(),
            &Commands::Config { init: false }
        );
        assert_eq!(
            parse(&["leadpilot", "config", "--init"]).command(),
            &Commands::Config { init: true }
        );
    }

    #[test]
    fn test_no_samples_flag() {
        assert!(parse(&["leadpilot", "--no-samples"]).no_samples);
    }

    #[test]
    fn test_verbosity_methods() {
        assert!(!Verbosity::Quiet.show_progress());
        assert!(Verbosity::Normal.show_progress());
        assert_eq!(Verbosity::Quiet.log_filter(), "error");
        assert_eq!(Verbosity::VeryVerbose.log_filter(), "leadpilot=debug,info");
    }
}
