//! Issue types reported by the pipeline.
//!
//! Each issue is self-contained with everything the CLI reporter needs to
//! display it.

use enum_dispatch::enum_dispatch;

use crate::core::{ContextKind, SourceContext};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    HardcodedText,
    ParseError,
    WriteError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::HardcodedText => write!(f, "hardcoded"),
            Rule::ParseError => write!(f, "parse-error"),
            Rule::WriteError => write!(f, "write-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Natural-language text hard-coded in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardcodedTextIssue {
    pub context: SourceContext,
    pub text: String,
    pub kind: ContextKind,
}

impl HardcodedTextIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::HardcodedText
    }
}

/// Source file could not be read or parsed; it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

/// Rewritten content could not be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl WriteErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::WriteError
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    HardcodedText(HardcodedTextIssue),
    ParseError(ParseErrorIssue),
    WriteError(WriteErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::HardcodedText(_) => HardcodedTextIssue::severity(),
            Issue::ParseError(_) => ParseErrorIssue::severity(),
            Issue::WriteError(_) => WriteErrorIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::HardcodedText(_) => HardcodedTextIssue::rule(),
            Issue::ParseError(_) => ParseErrorIssue::rule(),
            Issue::WriteError(_) => WriteErrorIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only, no line context.
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

impl Report for HardcodedTextIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.text.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("found in {}", self.kind))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("file was skipped".to_string())
    }
}

impl Report for WriteErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("restore it with `trnow revert`".to_string())
    }
}
