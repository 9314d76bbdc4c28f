//! Common utility functions shared across the codebase.

/// Checks if a character belongs to the target script (CJK Unified Ideographs,
/// U+4E00..=U+9FA5).
pub fn is_target_char(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Checks if the text contains at least one target-script character.
///
/// # Examples
///
/// ```
/// use trnow::utils::contains_target_script;
///
/// assert!(contains_target_script("你好"));
/// assert!(contains_target_script("导入CSV文件"));
/// assert!(!contains_target_script("Hello"));
/// assert!(!contains_target_script(""));
/// ```
pub fn contains_target_script(text: &str) -> bool {
    text.chars().any(is_target_char)
}

/// Counts target-script characters in the text.
pub fn count_target_chars(text: &str) -> usize {
    text.chars().filter(|&c| is_target_char(c)).count()
}

/// Build an index of line start byte offsets.
///
/// Line 1 starts at offset 0, line 2 starts after the first '\n', etc.
pub fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Convert a byte offset to a 1-based (line, column) pair.
///
/// The column counts characters, not bytes, so it lines up with what editors show.
pub fn offset_to_line_col(content: &str, line_index: &[usize], offset: usize) -> (usize, usize) {
    let line = match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    };
    let line_start = line_index[line - 1];
    let col = content[line_start..offset].chars().count() + 1;
    (line, col)
}

/// Get the content of a 1-based line, without the trailing newline.
pub fn line_at(content: &str, line: usize) -> &str {
    content.lines().nth(line.saturating_sub(1)).unwrap_or_default()
}
