//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format; each command then prints a
//! short summary of what it did. Kept separate from the core so the pipeline
//! can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary, RevertSummary, ScanSummary};
use crate::core::{PipelineError, ResourceEntry, TransformReport, UpdateReport};
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of added keys listed before the rest are summarized.
const MAX_ENTRIES_DISPLAY: usize = 20;

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by(compare_issues);

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", SUCCESS_MARK.green(), message.green());
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed and were skipped (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print an error that stopped a command.
pub fn print_fatal(err: &anyhow::Error) {
    print_fatal_to(err, &mut io::stderr().lock());
}

pub fn print_fatal_to<W: Write>(err: &anyhow::Error, writer: &mut W) {
    let _ = writeln!(writer, "{} {:#}", "error:".bold().red(), err);
    if let Some(pipeline_error) = err.downcast_ref::<PipelineError>() {
        let note = match pipeline_error {
            PipelineError::ResourceWrite { .. } => "no source file was modified",
            PipelineError::Backup(_) => {
                "the resource file was updated, but no source file was modified"
            }
        };
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "note:".bold(), note);
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // col is 1-based and counts characters
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_problem_summary(issues: &[Issue]) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    if !issues.is_empty() {
        println!(
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            issues.len(),
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path(),
            ctx.line(),
            ctx.col(),
            Some(&ctx.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    let a_loc = a.location();
    let b_loc = b.location();
    let (a_path, a_line, a_col, _) = extract_location_info(&a_loc);
    let (b_path, b_line, b_col, _) = extract_location_info(&b_loc);

    a_path
        .cmp(b_path)
        .then_with(|| a_line.cmp(&b_line))
        .then_with(|| a_col.cmp(&b_col))
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Scan(summary) => print_scan(summary, result),
        CommandSummary::Transform(summary) => print_transform(summary, result),
        CommandSummary::Revert(summary) => print_revert(summary),
        CommandSummary::Update(summary) => print_update(summary, result),
        CommandSummary::Init(summary) => print_init(summary),
    }

    print_parse_warning(result.parse_error_count, verbose);
}

fn print_scan(summary: &ScanSummary, result: &CommandResult) {
    report(&result.issues);

    if summary.occurrence_count == 0 {
        print_success(&format!(
            "Scanned {} - no hardcoded text found",
            plural(result.files_scanned, "file")
        ));
        return;
    }

    println!(
        "{} Found {} ({} distinct) in {}",
        FAILURE_MARK.yellow(),
        plural(summary.occurrence_count, "hardcoded text"),
        summary.text_count,
        plural(result.files_scanned, "scanned file")
    );
    println!("Run {} to replace them.", "trnow transform".cyan());
}

fn print_entries(entries: &[ResourceEntry]) {
    for entry in entries.iter().take(MAX_ENTRIES_DISPLAY) {
        println!("  {} {}: {}", "+".green(), entry.key, entry.text);
    }
    if entries.len() > MAX_ENTRIES_DISPLAY {
        println!("  ... and {} more", entries.len() - MAX_ENTRIES_DISPLAY);
    }
}

fn print_transform(summary: &TransformReport, result: &CommandResult) {
    report(&result.issues);

    if summary.added.is_empty() && summary.changed_files.is_empty() {
        print_success(&format!(
            "Scanned {} - nothing to transform",
            plural(summary.files_scanned, "file")
        ));
        print_problem_summary(&result.issues);
        return;
    }

    let (add_verb, rewrite_verb) = if summary.dry_run {
        ("Would add".yellow().bold(), "Would rewrite".yellow().bold())
    } else {
        ("Added".green().bold(), "Rewrote".green().bold())
    };

    if !summary.added.is_empty() {
        println!(
            "{} {} to {}:",
            add_verb,
            plural(summary.added.len(), "key"),
            summary.resource_path.display()
        );
        print_entries(&summary.added);
    }
    if summary.reused_count > 0 {
        println!(
            "Reused {} already in the resource.",
            plural(summary.reused_count, "key")
        );
    }

    if !summary.changed_files.is_empty() {
        let written = summary.changed_files.len() - summary.write_errors.len();
        let count = if summary.dry_run {
            summary.changed_files.len()
        } else {
            written
        };
        println!("{} {}:", rewrite_verb, plural(count, "file"));
        for file in &summary.changed_files {
            if summary.write_errors.iter().any(|e| &e.file_path == file) {
                continue;
            }
            println!("  {}", file);
        }
    }

    if summary.dry_run {
        println!("Run without {} to apply these changes.", "--dry-run".cyan());
    } else if let Some(snapshot) = &summary.snapshot {
        println!(
            "Snapshot saved to {} (run {} to undo).",
            snapshot.dir.display(),
            "trnow revert".cyan()
        );
    }

    print_problem_summary(&result.issues);
}

fn print_revert(summary: &RevertSummary) {
    match summary {
        RevertSummary::Restored(outcome) => {
            print_success(&format!(
                "Restored {} from snapshot {}",
                plural(outcome.restored.len(), "file"),
                outcome.label
            ));
            for file in &outcome.restored {
                println!("  {}", file.display());
            }
            if outcome.pruned > 0 {
                println!("Removed {}.", plural(outcome.pruned, "old snapshot"));
            }
        }
        RevertSummary::NothingToRevert { backup_dir } => {
            println!(
                "{} No snapshot found in {}",
                FAILURE_MARK.red(),
                backup_dir.display()
            );
        }
    }
}

fn print_update(summary: &UpdateReport, result: &CommandResult) {
    report(&result.issues);

    if summary.added.is_empty() {
        print_success(&format!(
            "Scanned {} - locale files are up to date",
            plural(summary.files_scanned, "file")
        ));
        return;
    }

    let verb = if summary.dry_run {
        "Would add".yellow().bold()
    } else {
        "Added".green().bold()
    };
    println!(
        "{} {} to {}:",
        verb,
        plural(summary.added.len(), "key"),
        summary.resource_path.display()
    );
    print_entries(&summary.added);

    for (path, count) in &summary.placeholders {
        if *count > 0 {
            println!(
                "{} {} to {}",
                verb,
                plural(*count, "placeholder"),
                path.display()
            );
        }
    }

    if summary.dry_run {
        println!("Run without {} to write these keys.", "--dry-run".cyan());
    }
}

fn print_init(summary: &InitSummary) {
    if let Some(error) = &summary.error {
        eprintln!("{} {}", "error:".bold().red(), error);
        return;
    }

    print_success(&format!("Created {}", summary.config_file));
    for dir in &summary.created_dirs {
        println!("  created {}", dir.display());
    }
    if summary.gitignore_updated {
        println!("  added the backup directory to .gitignore");
    }
}

// ============================================================
// Tests
// ============================================================
