//! Classification of candidate text as natural-language UI copy.
//!
//! A candidate is rejected if it matches any entry of [`REJECT_RULES`], then
//! accepted only when it carries at least [`MIN_TARGET_CHARS`] target-script
//! characters that make up more than half of the text.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::count_target_chars;

/// Minimum number of target-script characters in accepted text.
pub const MIN_TARGET_CHARS: usize = 2;

/// A named rejection pattern.
pub struct RejectRule {
    pub name: &'static str,
    pub pattern: Regex,
}

fn rule(name: &'static str, pattern: &str) -> RejectRule {
    RejectRule {
        name,
        pattern: Regex::new(pattern).unwrap(),
    }
}

/// Shapes that are never UI copy, checked in order.
pub static REJECT_RULES: LazyLock<Vec<RejectRule>> = LazyLock::new(|| {
    vec![
        rule("blank", r"^\s*$"),
        rule("numeric", r"^[0-9.]+$"),
        rule("ascii-identifier", r"^[A-Za-z0-9_]+$"),
        rule("brackets", r"^[{}\[\]()]+$"),
        rule("operators", r"^[<>=!&|+-]+$"),
        rule("console", r"console\."),
        rule("function", r"function"),
        rule("file-extension", r"\.(js|vue|ts|jsx|tsx)$"),
        rule("object-key", r"^[A-Za-z0-9_]+:$"),
        rule("camel-case", r"^[a-z]+[A-Z][A-Za-z0-9_]*$"),
        rule("pascal-case", r"^[A-Z][a-z]+[A-Za-z0-9_]*$"),
        rule("instance-property", r"^\$[A-Za-z0-9_]+$"),
        rule("directive", r"^v-[A-Za-z0-9_-]+$"),
        rule("event", r"^@[A-Za-z0-9_]+$"),
        rule("binding", r"^:[A-Za-z0-9_]+$"),
        rule(
            "keyword-prefix",
            r"^(get|set|async|await|import|export)([^A-Za-z0-9_]|$)",
        ),
        rule(
            "component-option",
            r"(?i)^(components?|props?|data|methods|computed|watch|filters?|directives?)$",
        ),
        rule("numeric-unit", r"^[0-9]+(\.[0-9]+)?[A-Za-z%]*$"),
    ]
});

/// Name of the first rejection rule matching the text, if any.
pub fn rejection_reason(text: &str) -> Option<&'static str> {
    REJECT_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.name)
}

/// Check if text is natural-language content worth localizing.
///
/// # Examples
///
/// ```
/// use trnow::core::is_natural_language;
///
/// assert!(is_natural_language("用户管理"));
/// assert!(is_natural_language("导入CSV文件"));
/// assert!(!is_natural_language("v-if"));
/// assert!(!is_natural_language("12px"));
/// assert!(!is_natural_language("用"));
/// ```
pub fn is_natural_language(text: &str) -> bool {
    if rejection_reason(text).is_some() {
        return false;
    }

    let target = count_target_chars(text);
    if target < MIN_TARGET_CHARS {
        return false;
    }

    let total = text.chars().count();
    target * 2 > total
}
