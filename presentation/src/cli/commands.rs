//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the session result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Live transcript followed by a readable report
    Text,
    /// Machine-readable outcome (and summary) as JSON
    Json,
}

/// CLI arguments for focus-panel
#[derive(Parser, Debug)]
#[command(name = "focus-panel")]
#[command(author, version, about = "Virtual focus group - a moderator interviews simulated personas")]
#[command(long_about = r#"
focus-panel runs a moderated focus group between LLM-backed personas.

The moderator opens with the topic, then hands the floor to the participant
who has spoken least. The session ends when someone says the termination
marker, the round limit is reached, or every participant used its turns.
A research summary of the participants' answers is generated at the end.

Configuration files are loaded from (in priority order):
1. PANEL_* environment variables (e.g. PANEL_GATEWAY__MODEL=gpt-4o-mini)
2. --config <path>     Explicit config file
3. ./panel.toml        Project-level config
4. ~/.config/focus-panel/config.toml   Global config

Example:
  focus-panel "What do you think of pants made from recycled bottles?" --personas personas.json
  focus-panel --config study.toml --max-rounds 10 -o json
"#)]
pub struct Cli {
    /// Opening topic for the panel (overrides session.topic)
    pub topic: Option<String>,

    /// Persona JSON file providing the participants
    #[arg(short, long, value_name = "PATH")]
    pub personas: Option<PathBuf>,

    /// Maximum number of moderator/participant rounds
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Turn quota for participants without their own max_turns
    #[arg(long, value_name = "N")]
    pub max_turns: Option<u32>,

    /// Transcript file (JSONL, appended)
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Do not write a transcript file
    #[arg(long, conflicts_with = "transcript")]
    pub no_transcript: bool,

    /// Timeout in seconds for each model call
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Skip the research summary
    #[arg(long)]
    pub no_summary: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "focus-panel",
            "Recycled pants?",
            "--personas",
            "p.json",
            "--max-rounds",
            "8",
            "--no-summary",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.topic.as_deref(), Some("Recycled pants?"));
        assert_eq!(cli.personas, Some(PathBuf::from("p.json")));
        assert_eq!(cli.max_rounds, Some(8));
        assert!(cli.no_summary);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_transcript_flags_conflict() {
        let result = Cli::try_parse_from([
            "focus-panel",
            "--transcript",
            "t.jsonl",
            "--no-transcript",
        ]);
        assert!(result.is_err());
    }
}
