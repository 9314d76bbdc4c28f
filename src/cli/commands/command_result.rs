use std::path::PathBuf;

use crate::core::snapshot::RestoreOutcome;
use crate::core::{TransformReport, UpdateReport};
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Scan(ScanSummary),
    Transform(TransformReport),
    Revert(RevertSummary),
    Update(UpdateReport),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ScanSummary {
    pub occurrence_count: usize,
    pub text_count: usize,
}

#[derive(Debug)]
pub enum RevertSummary {
    Restored(RestoreOutcome),
    NothingToRevert { backup_dir: PathBuf },
}

#[derive(Debug, Default)]
pub struct InitSummary {
    pub config_file: String,
    pub created_dirs: Vec<PathBuf>,
    pub gitignore_updated: bool,
    /// Set when init refused to run, e.g. the config file already exists.
    pub error: Option<String>,
}

/// Result of running trnow commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    /// Issues to print in cargo style.
    pub issues: Vec<Issue>,
    /// Number of files that could not be read or parsed.
    pub parse_error_count: usize,
    pub files_scanned: usize,
}
