//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for script runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored when the terminal allows it
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// CLI arguments for plenary
#[derive(Parser, Debug)]
#[command(name = "plenary")]
#[command(author, version, about = "Live plenary session: documents, votes and observers")]
#[command(long_about = r#"
Plenary runs one live session: delegates submit resolutions and amendments,
the chair opens a vote on one of them, delegates cast a single ballot each,
and the vote closes on the chair's command or when the auto-close timer fires.

Actions are read as JSON lines from a script file (or stdin):
  {"caller": "FRANCE", "action": "submit_document", "kind": "resolution", "title": "Ocean", "body": "..."}
  {"caller": "ADMIN", "action": "start_vote", "target": "Ocean"}
  {"caller": "INDIA", "action": "cast_ballot", "choice": "yay"}
  {"caller": "INDIA", "query": "vote_status"}
  {"wait_secs": 5}

Configuration files are loaded from (in priority order):
1. PLENARY_* environment variables
2. --config <path>     Explicit config file
3. ./plenary.toml      Project-level config
4. ~/.config/plenary/config.toml   Global config

Example:
  plenary session.jsonl
  plenary --auto-close-secs 10 --settle -o json session.jsonl
  cat session.jsonl | plenary --roster delegates.json
"#)]
pub struct Cli {
    /// Action script (JSON lines); reads stdin when omitted or `-`
    pub script: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print the full board on every snapshot update
    #[arg(long)]
    pub full_snapshots: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// After the script ends, wait for an open vote to auto-close
    #[arg(long)]
    pub settle: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Override the auto-close timer
    #[arg(long, value_name = "SECONDS")]
    pub auto_close_secs: Option<u64>,

    /// Roster file (`{"Delegates": {...}}`), overrides `[roster]`
    #[arg(long, value_name = "PATH")]
    pub roster: Option<PathBuf>,

    /// Session transcript (JSONL), overrides `[logging].transcript`
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

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
