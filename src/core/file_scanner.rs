use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

use crate::core::Dialect;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Source files in sorted path order.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Collect every file under `source_dir` with a known dialect.
///
/// `excluded_dirs` (the backup and locale directories) are never entered.
pub fn scan_files(
    source_dir: &Path,
    ignore_patterns: &[String],
    excluded_dirs: &[PathBuf],
    verbose: bool,
) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = excluded_dirs.to_vec();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(source_dir.join(p));
        }
    }

    let walker = WalkDir::new(source_dir).into_iter().filter_entry(|entry| {
        !literal_ignore_paths
            .iter()
            .any(|ignore_path| entry.path().starts_with(ignore_path))
    });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        let path = entry.path();
        let path_str = path.to_string_lossy();

        if glob_patterns.iter().any(|p| p.matches(&path_str)) {
            continue;
        }

        if entry.file_type().is_file() && Dialect::from_path(path).is_some() {
            files.push(path_str.into_owned());
        }
    }

    files.sort();
    ScanResult {
        files,
        skipped_count,
    }
}
