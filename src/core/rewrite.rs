//! Rewrite engine: replaces literal text with lookup calls.
//!
//! A unit is only rewritten where its own accepted occurrences ([`Site`]s)
//! were found. Each rule handles one [`ContextKind`] and matches the exact
//! text (regex-escaped) inside its delimiters. Line-scoped rules only touch
//! the lines their sites sit on; block-scoped rules cover the whole block,
//! since a text node may span lines.

use std::collections::BTreeSet;

use regex::{Captures, Regex};

use crate::core::extract::template::TEXT_ATTRIBUTES;
use crate::core::extract::{BlockKind, locate_blocks};
use crate::core::{ContextKind, Dialect, KeyMap, SourceUnit};

type Substitution = fn(&str, &str, &str) -> String;

/// An accepted occurrence in one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub text: String,
    pub kind: ContextKind,
    /// 1-based line the occurrence starts on.
    pub line: usize,
}

impl Site {
    pub fn new(text: impl Into<String>, kind: ContextKind, line: usize) -> Self {
        Self {
            text: text.into(),
            kind,
            line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Line,
    Block,
}

/// One named substitution, applied as `(content, text, key) -> content`.
pub struct RewriteRule {
    pub name: &'static str,
    pub kind: ContextKind,
    scope: Scope,
    substitute: Substitution,
}

impl RewriteRule {
    pub fn apply(&self, content: &str, text: &str, key: &str) -> String {
        (self.substitute)(content, text, key)
    }
}

/// Rules for plain scripts and JSX/TSX components.
pub const MARKUP_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "attribute-value",
        kind: ContextKind::AttributeValue,
        scope: Scope::Line,
        substitute: jsx_attribute_value,
    },
    RewriteRule {
        name: "text-node",
        kind: ContextKind::TextNode,
        scope: Scope::Block,
        substitute: jsx_text_node,
    },
    RewriteRule {
        name: "single-quoted",
        kind: ContextKind::StringLiteral,
        scope: Scope::Line,
        substitute: single_quoted_literal,
    },
    RewriteRule {
        name: "double-quoted",
        kind: ContextKind::StringLiteral,
        scope: Scope::Line,
        substitute: double_quoted_literal,
    },
];

/// Rules for the `<template>` block of a single-file component.
pub const TEMPLATE_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "bound-literal",
        kind: ContextKind::DirectiveValue,
        scope: Scope::Line,
        substitute: template_bound_literal,
    },
    RewriteRule {
        name: "plain-attribute",
        kind: ContextKind::AttributeValue,
        scope: Scope::Line,
        substitute: template_plain_attribute,
    },
    RewriteRule {
        name: "interpolated-text",
        kind: ContextKind::TextNode,
        scope: Scope::Block,
        substitute: template_text_node,
    },
];

/// Rules for `<script>` blocks of a single-file component.
pub const SCRIPT_BLOCK_RULES: &[RewriteRule] = &[RewriteRule {
    name: "instance-property",
    kind: ContextKind::StringLiteral,
    scope: Scope::Line,
    substitute: instance_property,
}];

/// New content for a unit, or `None` when nothing changes.
///
/// `sites` are the unit's own accepted occurrences; `keys` maps their text to
/// the assigned key. Text without a site is never touched.
pub fn apply(unit: &SourceUnit, sites: &[Site], keys: &KeyMap) -> Option<String> {
    if sites.is_empty() {
        return None;
    }
    let rewritten = match unit.dialect {
        Dialect::Script | Dialect::ComponentMarkup => {
            apply_rules(&unit.content, 1, MARKUP_RULES, sites, keys)
        }
        Dialect::TemplateMarkup => rewrite_component_blocks(&unit.content, sites, keys),
    };
    (rewritten != unit.content).then_some(rewritten)
}

fn apply_rules(
    content: &str,
    first_line: usize,
    rules: &[RewriteRule],
    sites: &[Site],
    keys: &KeyMap,
) -> String {
    let mut current = content.to_string();
    for rule in rules {
        for (text, lines) in targets(sites, rule.kind) {
            let Some(key) = keys.get(text) else {
                continue;
            };
            current = match rule.scope {
                Scope::Block => rule.apply(&current, text, key),
                Scope::Line => edit_lines(&current, first_line, &lines, |line| {
                    rule.apply(line, text, key)
                }),
            };
        }
    }
    current
}

/// Distinct texts of `kind`, first-seen order, with the lines they sit on.
fn targets(sites: &[Site], kind: ContextKind) -> Vec<(&str, BTreeSet<usize>)> {
    let mut targets: Vec<(&str, BTreeSet<usize>)> = Vec::new();
    for site in sites.iter().filter(|site| site.kind == kind) {
        match targets.iter_mut().find(|(text, _)| *text == site.text) {
            Some((_, lines)) => {
                lines.insert(site.line);
            }
            None => targets.push((site.text.as_str(), BTreeSet::from([site.line]))),
        }
    }
    targets
}

/// Apply `edit` to the listed lines of `content`, whose first line is `first_line`.
fn edit_lines(
    content: &str,
    first_line: usize,
    lines: &BTreeSet<usize>,
    edit: impl Fn(&str) -> String,
) -> String {
    content
        .split_inclusive('\n')
        .enumerate()
        .map(|(i, line)| {
            if lines.contains(&(first_line + i)) {
                edit(line)
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Rewrite template and script blocks in place, leaving everything else untouched.
fn rewrite_component_blocks(content: &str, sites: &[Site], keys: &KeyMap) -> String {
    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;

    for block in locate_blocks(content) {
        if block.offset < cursor {
            continue;
        }
        output.push_str(&content[cursor..block.offset]);
        let rules = match block.kind {
            BlockKind::Template => TEMPLATE_RULES,
            BlockKind::Script => SCRIPT_BLOCK_RULES,
        };
        let first_line = content[..block.offset].matches('\n').count() + 1;
        output.push_str(&apply_rules(block.content, first_line, rules, sites, keys));
        cursor = block.offset + block.content.len();
    }

    output.push_str(&content[cursor..]);
    output
}

fn replace_all(content: &str, pattern: &str, replacement: impl Fn(&Captures) -> String) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(content, |caps: &Captures| replacement(caps)).into_owned(),
        Err(_) => content.to_string(),
    }
}

/// `="text"` -> `={t('key')}`
fn jsx_attribute_value(content: &str, text: &str, key: &str) -> String {
    content.replace(&format!("=\"{text}\""), &format!("={{t('{key}')}}"))
}

/// `>text<` -> `>{t('key')}<`, surrounding whitespace kept.
fn jsx_text_node(content: &str, text: &str, key: &str) -> String {
    let pattern = format!(r">(\s*){}(\s*)<", regex::escape(text));
    replace_all(content, &pattern, |caps| {
        format!(">{}{{t('{key}')}}{}<", &caps[1], &caps[2])
    })
}

/// `'text'` -> `t('key')`
fn single_quoted_literal(content: &str, text: &str, key: &str) -> String {
    content.replace(&format!("'{text}'"), &format!("t('{key}')"))
}

/// `"text"` -> `t('key')`
fn double_quoted_literal(content: &str, text: &str, key: &str) -> String {
    content.replace(&format!("\"{text}\""), &format!("t('{key}')"))
}

/// `v-text="'text'"` / `:title="'text'"` -> same directive holding `$t('key')`.
fn template_bound_literal(content: &str, text: &str, key: &str) -> String {
    let pattern = format!(r#"((?:v-[\w-]+|:[\w-]+)=)"'?{}'?""#, regex::escape(text));
    replace_all(content, &pattern, |caps| {
        format!("{}\"$t('{key}')\"", &caps[1])
    })
}

/// `title="text"` -> `:title="$t('key')"`, for text-carrying attributes only.
fn template_plain_attribute(content: &str, text: &str, key: &str) -> String {
    let pattern = format!(
        r#"(\s)({})="{}""#,
        TEXT_ATTRIBUTES.join("|"),
        regex::escape(text)
    );
    replace_all(content, &pattern, |caps| {
        format!("{}:{}=\"$t('{key}')\"", &caps[1], &caps[2])
    })
}

/// `>text<` -> `>{{ $t('key') }}<`, surrounding whitespace kept.
fn template_text_node(content: &str, text: &str, key: &str) -> String {
    let pattern = format!(r">(\s*){}(\s*)<", regex::escape(text));
    replace_all(content, &pattern, |caps| {
        format!(">{}{{{{ $t('{key}') }}}}{}<", &caps[1], &caps[2])
    })
}

/// `name: 'text'` -> `name: this.$t('key')`
fn instance_property(content: &str, text: &str, key: &str) -> String {
    let escaped = regex::escape(text);
    let pattern = format!(r#"(\w+)\s*:\s*(?:'{escaped}'|"{escaped}")"#);
    replace_all(content, &pattern, |caps| {
        format!("{}: this.$t('{key}')", &caps[1])
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::extract::extract_unit;
    use crate::core::is_natural_language;

    fn rule(rules: &'static [RewriteRule], name: &str) -> &'static RewriteRule {
        rules
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    fn keys(pairs: &[(&str, &str)]) -> KeyMap {
        pairs.iter().copied().collect()
    }

    /// Sites the pipeline would hand over for this unit.
    fn accepted_sites(unit: &SourceUnit) -> Vec<Site> {
        extract_unit(unit)
            .unwrap()
            .into_iter()
            .filter(|c| is_natural_language(&c.text))
            .map(|c| Site::new(c.text, c.kind, c.line))
            .collect()
    }

    fn rewrite(unit: &SourceUnit, keys: &KeyMap) -> Option<String> {
        apply(unit, &accepted_sites(unit), keys)
    }

    #[test]
    fn test_markup_rules() {
        let attr = rule(MARKUP_RULES, "attribute-value");
        assert_eq!(
            attr.apply(r#"<input placeholder="请输入" />"#, "请输入", "common.qingShuru"),
            r#"<input placeholder={t('common.qingShuru')} />"#
        );

        let text = rule(MARKUP_RULES, "text-node");
        assert_eq!(
            text.apply("<h1>\n  用户管理\n</h1>", "用户管理", "common.yonghuGuanli"),
            "<h1>\n  {t('common.yonghuGuanli')}\n</h1>"
        );

        let single = rule(MARKUP_RULES, "single-quoted");
        assert_eq!(
            single.apply("title: '用户列表',", "用户列表", "common.yonghuLiebiao"),
            "title: t('common.yonghuLiebiao'),"
        );

        let double = rule(MARKUP_RULES, "double-quoted");
        assert_eq!(
            double.apply(r#"alert("操作成功")"#, "操作成功", "success.caozuoChenggong"),
            "alert(t('success.caozuoChenggong'))"
        );
    }

    #[test]
    fn test_template_rules() {
        let bound = rule(TEMPLATE_RULES, "bound-literal");
        assert_eq!(
            bound.apply(r#"<span v-text="'删除确认'" />"#, "删除确认", "message.shanchuQueren"),
            r#"<span v-text="$t('message.shanchuQueren')" />"#
        );
        assert_eq!(
            bound.apply(r#"<b :title="'标题'" />"#, "标题", "common.biaoti"),
            r#"<b :title="$t('common.biaoti')" />"#
        );

        let plain = rule(TEMPLATE_RULES, "plain-attribute");
        assert_eq!(
            plain.apply(r#"<div title="提示信息">"#, "提示信息", "message.tishiXinxi"),
            r#"<div :title="$t('message.tishiXinxi')">"#
        );
        assert_eq!(
            plain.apply(r#"<p v-html="说明文字">"#, "说明文字", "common.shuoming"),
            r#"<p v-html="说明文字">"#
        );
        assert_eq!(
            plain.apply(r#"<el-radio value="男性">"#, "男性", "common.nanxing"),
            r#"<el-radio value="男性">"#
        );

        let text = rule(TEMPLATE_RULES, "interpolated-text");
        assert_eq!(
            text.apply("<h1>用户管理</h1>", "用户管理", "common.yonghuGuanli"),
            "<h1>{{ $t('common.yonghuGuanli') }}</h1>"
        );
    }

    #[test]
    fn test_instance_property_rule() {
        let prop = rule(SCRIPT_BLOCK_RULES, "instance-property");
        assert_eq!(
            prop.apply("messageText: '操作成功',", "操作成功", "success.caozuoChenggong"),
            "messageText: this.$t('success.caozuoChenggong'),"
        );
        assert_eq!(
            prop.apply(r#"placeholder : "请输入关键词""#, "请输入关键词", "common.k"),
            "placeholder: this.$t('common.k')"
        );
    }

    #[test]
    fn test_rule_replaces_every_occurrence() {
        let single = rule(MARKUP_RULES, "single-quoted");
        assert_eq!(
            single.apply("['删除', '删除']", "删除", "common.shanchu"),
            "[t('common.shanchu'), t('common.shanchu')]"
        );
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let text = rule(TEMPLATE_RULES, "interpolated-text");
        assert_eq!(
            text.apply("<p>用户(VIP)管理</p><p>用户VIP管理</p>", "用户(VIP)管理", "common.vip"),
            "<p>{{ $t('common.vip') }}</p><p>用户VIP管理</p>"
        );
    }

    #[test]
    fn test_apply_vue_unit() {
        let content = r#"<template>
  <div title="提示信息">
    <h1>用户管理</h1>
  </div>
</template>

<script>
export default {
  data() {
    return { messageText: '操作成功' }
  }
}
</script>
<style>.a { content: "用户管理"; }</style>
"#;
        let unit = SourceUnit::new("Test.vue", Dialect::TemplateMarkup, content);
        let keys = keys(&[
            ("提示信息", "message.tishiXinxi"),
            ("用户管理", "common.yonghuGuanli"),
            ("操作成功", "success.caozuoChenggong"),
        ]);

        let rewritten = rewrite(&unit, &keys).unwrap();
        assert!(rewritten.contains(r#"<div :title="$t('message.tishiXinxi')">"#));
        assert!(rewritten.contains("<h1>{{ $t('common.yonghuGuanli') }}</h1>"));
        assert!(rewritten.contains("messageText: this.$t('success.caozuoChenggong')"));
        assert!(rewritten.contains(r#"<style>.a { content: "用户管理"; }</style>"#));
    }

    #[test]
    fn test_apply_jsx_unit() {
        let content = r#"const A = () => <input placeholder="请输入" title={'标题'} />;"#;
        let unit = SourceUnit::new("A.jsx", Dialect::ComponentMarkup, content);
        let keys = keys(&[("请输入", "common.qingShuru"), ("标题", "common.biaoti")]);

        assert_eq!(
            rewrite(&unit, &keys).unwrap(),
            "const A = () => <input placeholder={t('common.qingShuru')} title={t('common.biaoti')} />;"
        );
    }

    #[test]
    fn test_excluded_literals_stay_untouched() {
        let content = "const ROLE = '管理员';\nif (role === '管理员') {\n  console.log('管理员');\n}\n";
        let unit = SourceUnit::new("auth.js", Dialect::Script, content);
        let keys = keys(&[("管理员", "common.guanliyuan")]);

        assert_eq!(
            rewrite(&unit, &keys).unwrap(),
            "const ROLE = t('common.guanliyuan');\nif (role === '管理员') {\n  console.log('管理员');\n}\n"
        );
    }

    #[test]
    fn test_text_known_from_other_units_is_ignored() {
        let content = "if (role === '管理员') {\n  console.log('加载完成');\n}\n";
        let unit = SourceUnit::new("auth.js", Dialect::Script, content);
        let keys = keys(&[
            ("管理员", "common.guanliyuan"),
            ("加载完成", "success.jiazaiWancheng"),
        ]);

        assert!(accepted_sites(&unit).is_empty());
        assert_eq!(rewrite(&unit, &keys), None);
    }

    #[test]
    fn test_only_text_attributes_become_bindings() {
        let content = "<template>\n  <el-radio title=\"男性\" value=\"男性\">男性</el-radio>\n</template>\n";
        let unit = SourceUnit::new("Gender.vue", Dialect::TemplateMarkup, content);
        let keys = keys(&[("男性", "common.nanxing")]);

        assert_eq!(
            rewrite(&unit, &keys).unwrap(),
            "<template>\n  <el-radio :title=\"$t('common.nanxing')\" value=\"男性\">{{ $t('common.nanxing') }}</el-radio>\n</template>\n"
        );
    }

    #[test]
    fn test_line_scope_in_script_block() {
        let content = "<template>\n  <p>提交</p>\n</template>\n<script>\nexport default {\n  data() {\n    return { label: '提交' }\n  },\n  methods: {\n    check(v) { return v === '提交' }\n  }\n}\n</script>\n";
        let unit = SourceUnit::new("Form.vue", Dialect::TemplateMarkup, content);
        let sites = vec![
            Site::new("提交", ContextKind::TextNode, 2),
            Site::new("提交", ContextKind::StringLiteral, 7),
        ];
        let keys = keys(&[("提交", "common.tijiao")]);

        let rewritten = apply(&unit, &sites, &keys).unwrap();
        assert!(rewritten.contains("<p>{{ $t('common.tijiao') }}</p>"));
        assert!(rewritten.contains("return { label: this.$t('common.tijiao') }"));
        assert!(rewritten.contains("check(v) { return v === '提交' }"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let content = "<template>\n  <h1>用户管理</h1>\n</template>\n";
        let unit = SourceUnit::new("A.vue", Dialect::TemplateMarkup, content);
        let keys = keys(&[("用户管理", "common.yonghuGuanli")]);

        let once = rewrite(&unit, &keys).unwrap();
        let again = SourceUnit::new("A.vue", Dialect::TemplateMarkup, once);
        assert_eq!(rewrite(&again, &keys), None);
    }

    #[test]
    fn test_unit_without_sites_is_none() {
        let unit = SourceUnit::new("a.js", Dialect::Script, "const a = '用户管理';");
        let keys = keys(&[("用户管理", "common.yonghuGuanli")]);
        assert_eq!(apply(&unit, &[], &keys), None);
    }
}
