//! Block locator for single-file components.

use std::sync::LazyLock;

use regex::Regex;

/// Outermost template: from the first opening tag to the last closing tag.
static TEMPLATE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<template(?:\s[^>]*)?>(.*)</template>").unwrap());

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script(?:\s[^>]*)?>(.*?)</script>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Template,
    Script,
}

/// Inner content of one block, with its byte offset in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub kind: BlockKind,
    pub content: &'a str,
    pub offset: usize,
}

/// Locate the template block and every script block, in file order.
pub fn locate_blocks(content: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();

    if let Some(inner) = TEMPLATE_BLOCK.captures(content).and_then(|caps| caps.get(1)) {
        blocks.push(Block {
            kind: BlockKind::Template,
            content: inner.as_str(),
            offset: inner.start(),
        });
    }

    for inner in SCRIPT_BLOCK
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
    {
        blocks.push(Block {
            kind: BlockKind::Script,
            content: inner.as_str(),
            offset: inner.start(),
        });
    }

    blocks.sort_by_key(|block| block.offset);
    blocks
}
