use anyhow::{Ok, Result};

use super::super::args::UpdateCommand;
use super::{CommandResult, CommandSummary, helper::finish, transform::progress_printer};
use crate::{
    core::{Pipeline, ProgressListener},
    issues::Issue,
};

pub fn update(cmd: UpdateCommand) -> Result<CommandResult> {
    let pipeline = Pipeline::new(&cmd.common)?;
    let printer = progress_printer(cmd.common.verbose);
    let mut report = pipeline.update(
        cmd.dry_run,
        printer.as_ref().map(|p| p as &dyn ProgressListener),
    )?;

    let issues: Vec<Issue> = std::mem::take(&mut report.parse_errors)
        .into_iter()
        .map(Issue::ParseError)
        .collect();

    let files_scanned = report.files_scanned;
    Ok(finish(CommandSummary::Update(report), issues, files_scanned))
}
