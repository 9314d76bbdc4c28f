use super::{CommandResult, CommandSummary, RevertSummary};
use crate::issues::{Issue, Severity};

pub fn finish(summary: CommandSummary, issues: Vec<Issue>, files_scanned: usize) -> CommandResult {
    let parse_error_count = issues
        .iter()
        .filter(|i| matches!(i, Issue::ParseError(_)))
        .count();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();

    match summary {
        CommandSummary::Init(ref summary) if summary.error.is_some() => error_count += 1,
        CommandSummary::Revert(RevertSummary::NothingToRevert { .. }) => error_count += 1,
        _ => {}
    }

    CommandResult {
        summary,
        error_count,
        issues,
        parse_error_count,
        files_scanned,
    }
}
