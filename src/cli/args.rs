//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: List hardcoded text without changing anything
//! - `transform`: Generate keys, update the source resource and rewrite sources
//! - `revert`: Restore sources from the latest snapshot
//! - `update`: Add keys for new text to the locale resources only
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::keygen::KeyStyle;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Transform(cmd)) => cmd.common.verbose,
            Some(Command::Revert(cmd)) => cmd.common.verbose,
            Some(Command::Update(cmd)) => cmd.common.verbose,
            Some(Command::Init(_)) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Source directory to scan (overrides config file)
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Locale resource directory (overrides config file)
    #[arg(long)]
    pub locale_dir: Option<PathBuf>,

    /// Source language tag, e.g. zh-CN (overrides config file)
    #[arg(long)]
    pub source_lang: Option<String>,

    /// Style of generated keys (overrides config file)
    #[arg(long, value_enum)]
    pub key_style: Option<KeyStyle>,

    /// Snapshot directory (overrides config file)
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// API key for AI-assisted key naming
    #[arg(long, env = "TRNOW_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct TransformCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct RevertCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Show what would be added without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Write `.trnow.yml` instead of `.trnowrc.json`
    #[arg(long)]
    pub yaml: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List hardcoded Chinese text in the source directory
    Scan(ScanCommand),
    /// Replace hardcoded text with i18n calls and update the source locale file
    Transform(TransformCommand),
    /// Restore source files from the latest snapshot
    Revert(RevertCommand),
    /// Add keys for new text to the locale files without touching sources
    Update(UpdateCommand),
    /// Initialize a trnow configuration file
    Init(InitCommand),
}
