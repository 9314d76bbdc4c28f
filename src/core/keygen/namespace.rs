//! Namespace inference from the text's wording.

/// Namespace for text that matches no rule.
pub const DEFAULT_NAMESPACE: &str = "common";

/// Namespaces in priority order, with the markers that select them.
const NAMESPACE_RULES: &[(&str, &[&str])] = &[
    ("error", &["错误", "失败", "异常", "无效", "error", "fail"]),
    ("success", &["成功", "完成", "success"]),
    ("message", &["提示", "警告", "注意", "确认", "消息", "通知"]),
];

/// Pick the namespace for a text. The first rule with a matching marker wins.
///
/// # Examples
///
/// ```
/// use trnow::core::keygen::infer_namespace;
///
/// assert_eq!(infer_namespace("保存失败"), "error");
/// assert_eq!(infer_namespace("用户管理"), "common");
/// ```
pub fn infer_namespace(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    NAMESPACE_RULES
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
        .map(|(namespace, _)| *namespace)
        .unwrap_or(DEFAULT_NAMESPACE)
}
