use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::super::args::InitCommand;
use super::{CommandResult, CommandSummary, InitSummary, helper::finish};
use crate::config::{
    CONFIG_FILE_NAME, CONFIG_FILE_NAMES, Config, YAML_CONFIG_FILE_NAME, default_config_json,
    default_config_yaml,
};

const GITIGNORE: &str = ".gitignore";

pub fn init(cmd: InitCommand) -> Result<CommandResult> {
    let summary = init_in(Path::new("."), cmd.yaml)?;
    Ok(finish(CommandSummary::Init(summary), Vec::new(), 0))
}

/// Write the default config into `root`, create the locale and backup
/// directories and ignore the backup directory in git.
pub fn init_in(root: &Path, yaml: bool) -> Result<InitSummary> {
    if let Some(existing) = CONFIG_FILE_NAMES
        .iter()
        .find(|name| root.join(name).exists())
    {
        return Ok(InitSummary {
            config_file: existing.to_string(),
            error: Some(format!("{} already exists", existing)),
            ..Default::default()
        });
    }

    let (config_file, content) = if yaml {
        (YAML_CONFIG_FILE_NAME, default_config_yaml()?)
    } else {
        (CONFIG_FILE_NAME, default_config_json()?)
    };
    let config_path = root.join(config_file);
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write file: {}", config_path.display()))?;

    let config = Config::default();
    let mut created_dirs = Vec::new();
    for dir in [&config.locale_dir, &config.backup.dir] {
        let path = root.join(dir);
        if !path.exists() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            created_dirs.push(PathBuf::from(dir));
        }
    }

    let gitignore_updated = ignore_backup_dir(root, &config.backup.dir)?;

    Ok(InitSummary {
        config_file: config_file.to_string(),
        created_dirs,
        gitignore_updated,
        error: None,
    })
}

/// Append the backup directory to `.gitignore` unless it is already listed.
fn ignore_backup_dir(root: &Path, backup_dir: &str) -> Result<bool> {
    let entry = backup_dir.trim_start_matches("./");
    let path = root.join(GITIGNORE);
    let existing = if path.exists() {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?
    } else {
        String::new()
    };

    let listed = existing
        .lines()
        .map(|line| line.trim().trim_start_matches('/').trim_end_matches('/'))
        .any(|line| line == entry);
    if listed {
        return Ok(false);
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(entry);
    content.push('\n');
    fs::write(&path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(true)
}
