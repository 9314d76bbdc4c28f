use anyhow::{Ok, Result};

use super::super::args::TransformCommand;
use super::{CommandResult, CommandSummary, helper::finish};
use crate::{
    core::{Pipeline, Progress, ProgressListener},
    issues::Issue,
};

/// Progress lines on stderr, shown in verbose mode.
pub fn progress_printer(verbose: bool) -> Option<impl ProgressListener> {
    verbose.then_some(|p: &Progress| {
        eprintln!("[{}/{}] {}", p.current, p.total, p.text);
    })
}

pub fn transform(cmd: TransformCommand) -> Result<CommandResult> {
    let pipeline = Pipeline::new(&cmd.common)?;
    let printer = progress_printer(cmd.common.verbose);
    let mut report = pipeline.transform(
        cmd.dry_run,
        printer.as_ref().map(|p| p as &dyn ProgressListener),
    )?;

    let mut issues: Vec<Issue> = std::mem::take(&mut report.parse_errors)
        .into_iter()
        .map(Issue::ParseError)
        .collect();
    issues.extend(
        std::mem::take(&mut report.write_errors)
            .into_iter()
            .map(Issue::WriteError),
    );

    let files_scanned = report.files_scanned;
    Ok(finish(
        CommandSummary::Transform(report),
        issues,
        files_scanned,
    ))
}
