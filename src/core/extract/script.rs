//! Lexical sieve for script code.
//!
//! Comments are blanked first (byte offsets preserved), then every quoted
//! literal is checked against [`EXCLUSION_RULES`]. A literal is dropped when a
//! single rule match covers it entirely, or when it already contains a `$t(`
//! call. Survivors holding target-script text become candidates.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::Positioner;
use crate::core::{Candidate, ContextKind};
use crate::utils::contains_target_script;

/// A named construct whose literals are never UI copy.
pub struct ExclusionRule {
    pub name: &'static str,
    pub pattern: Regex,
}

fn rule(name: &'static str, pattern: &str) -> ExclusionRule {
    ExclusionRule {
        name,
        pattern: Regex::new(pattern).unwrap(),
    }
}

/// Exclusion rules, checked in order.
pub static EXCLUSION_RULES: LazyLock<Vec<ExclusionRule>> = LazyLock::new(|| {
    vec![
        rule("console", r"console\.(?:log|info|warn|error|debug)\(.*\)"),
        rule("control-flow", r"\b(?:if|for|while|switch)\s*\(.*?\)"),
        rule("pattern-method", r"\.(?:test|match|replace|Format)\(.*?\)"),
        rule(
            "endpoint-key",
            r#"(?i)\b(?:url|path|api|endpoint)\s*:\s*(?:'[^'\n]*'|"[^"\n]*")"#,
        ),
        rule(
            "object-key",
            r#"(?m)(?:^|[{,])\s*(?:'[^'\n]*'|"[^"\n]*")\s*:"#,
        ),
        rule("localized", r#"(?:\$t|\bt)\(\s*(?:'[^'\n]*'|"[^"\n]*")"#),
        rule("builtin", r"\b(?:RegExp|Math|Date|String|Number)\s*\([^)]*\)"),
        rule("function-call", r"\b\w+\s*\([^)]*\)"),
        rule(
            "numeric-unit",
            r#"'\d+(?:\.\d+)?[A-Za-z%]*'|"\d+(?:\.\d+)?[A-Za-z%]*""#,
        ),
    ]
});

/// Strings (group 1) or comments; only comments get blanked.
static STRING_OR_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"("(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`)|//[^\n]*|/\*[\s\S]*?\*/"#,
    )
    .unwrap()
});

/// Quoted literals. Template literals are matched only to be skipped.
static LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'((?:[^'\\\n]|\\.)*)'|"((?:[^"\\\n]|\\.)*)"|`(?:[^`\\]|\\.)*`"#).unwrap()
});

/// Replace every comment with spaces, keeping newlines and byte offsets.
pub fn blank_comments(source: &str) -> String {
    STRING_OR_COMMENT
        .replace_all(source, |caps: &Captures| {
            let matched = &caps[0];
            if caps.get(1).is_some() {
                return matched.to_string();
            }
            matched
                .chars()
                .map(|c| {
                    if c == '\n' {
                        "\n".to_string()
                    } else {
                        " ".repeat(c.len_utf8())
                    }
                })
                .collect()
        })
        .into_owned()
}

/// Name of the first rule with a match covering `span` of `code`.
pub fn exclusion_reason(code: &str, span: Range<usize>) -> Option<&'static str> {
    EXCLUSION_RULES
        .iter()
        .find(|rule| {
            rule.pattern
                .find_iter(code)
                .any(|m| m.start() <= span.start && span.end <= m.end())
        })
        .map(|rule| rule.name)
}

/// Extract string-literal candidates from script code starting `base` bytes
/// into the unit.
pub fn extract_script<'u>(
    positioner: &Positioner<'u>,
    source: &str,
    base: usize,
) -> Vec<Candidate<'u>> {
    let code = blank_comments(source);

    let mut candidates = Vec::new();
    for caps in LITERAL.captures_iter(&code) {
        let Some(value) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let text = value.as_str();
        if !contains_target_script(text) || text.contains("$t(") {
            continue;
        }

        let whole = caps.get(0).map(|m| m.range()).unwrap_or(value.range());
        if exclusion_reason(&code, whole.clone()).is_some() {
            continue;
        }

        candidates.push(positioner.candidate(
            text,
            ContextKind::StringLiteral,
            base + whole.start,
        ));
    }
    candidates
}
