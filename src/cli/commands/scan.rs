use anyhow::{Ok, Result};

use super::super::args::ScanCommand;
use super::{CommandResult, CommandSummary, ScanSummary, helper::finish};
use crate::{core::Pipeline, issues::Issue};

pub fn scan(cmd: ScanCommand) -> Result<CommandResult> {
    let pipeline = Pipeline::new(&cmd.common)?;
    let report = pipeline.scan(None);

    let summary = ScanSummary {
        occurrence_count: report.hardcoded.len(),
        text_count: report.texts.len(),
    };

    let mut issues: Vec<Issue> = report
        .hardcoded
        .into_iter()
        .map(Issue::HardcodedText)
        .collect();
    issues.extend(report.parse_errors.into_iter().map(Issue::ParseError));

    Ok(finish(
        CommandSummary::Scan(summary),
        issues,
        report.files_scanned,
    ))
}
