//! Timestamped, restorable copies of files about to be rewritten.
//!
//! Layout: `<backup-dir>/<YYYY-MM-DD-HH-mm-ss>[-N]/<path relative to root>`.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Length of a label without its collision suffix.
const LABEL_TIME_LEN: usize = "2024-01-01-00-00-00".len();

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("no snapshot found in {}", .0.display())]
    NoSnapshot(PathBuf),

    #[error("failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is outside the project root {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl SnapshotError {
    fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| SnapshotError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A snapshot that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub label: String,
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Result of restoring the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub label: String,
    pub restored: Vec<PathBuf>,
    pub pruned: usize,
}

pub struct SnapshotManager {
    root: PathBuf,
    backup_dir: PathBuf,
    keep: usize,
}

impl SnapshotManager {
    /// `backup_dir` is resolved against `root` when relative.
    pub fn new(root: impl Into<PathBuf>, backup_dir: impl AsRef<Path>, keep: usize) -> Self {
        let root = root.into();
        let backup_dir = backup_dir.as_ref();
        let is_cur_dir = root.components().all(|c| matches!(c, Component::CurDir));
        let backup_dir = if backup_dir.is_absolute() || is_cur_dir {
            backup_dir.to_path_buf()
        } else {
            root.join(backup_dir.strip_prefix(".").unwrap_or(backup_dir))
        };
        Self {
            root,
            backup_dir,
            keep: keep.max(1),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy `files` into a new snapshot labelled with the local time, then prune.
    pub fn backup<P: AsRef<Path>>(&self, files: &[P]) -> Result<Snapshot, SnapshotError> {
        let label = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();
        self.backup_with_label(&label, files)
    }

    /// Copy `files` into a snapshot named `label` (suffixed `-2`, `-3`, ... if
    /// taken), then prune.
    pub fn backup_with_label<P: AsRef<Path>>(
        &self,
        label: &str,
        files: &[P],
    ) -> Result<Snapshot, SnapshotError> {
        let root = self
            .root
            .canonicalize()
            .map_err(SnapshotError::io("resolve", &self.root))?;

        let mut mirrored = Vec::new();
        for file in files {
            let file = file.as_ref();
            if !file.exists() {
                continue;
            }
            mirrored.push((file, mirror_path(&root, file)?));
        }

        let label = self.free_label(label);
        let dir = self.backup_dir.join(&label);
        fs::create_dir_all(&dir).map_err(SnapshotError::io("create", &dir))?;

        let mut copied = Vec::new();
        for (file, relative) in mirrored {
            let target = dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(SnapshotError::io("create", parent))?;
            }
            fs::copy(file, &target).map_err(SnapshotError::io("copy", file))?;
            copied.push(file.to_path_buf());
        }

        self.prune()?;

        Ok(Snapshot {
            label,
            dir,
            files: copied,
        })
    }

    /// Snapshot labels, oldest first. Empty when the backup dir is missing.
    pub fn list(&self) -> Result<Vec<String>, SnapshotError> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&self.backup_dir).map_err(SnapshotError::io("read", &self.backup_dir))?;
        let mut labels: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        labels.sort_by_key(|label| label_order(label));
        Ok(labels)
    }

    /// Copy every file of the newest snapshot back to its original path, then prune.
    pub fn restore_latest(&self) -> Result<RestoreOutcome, SnapshotError> {
        let Some(label) = self.list()?.pop() else {
            return Err(SnapshotError::NoSnapshot(self.backup_dir.clone()));
        };
        let dir = self.backup_dir.join(&label);

        let mut restored = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|e| SnapshotError::Io {
                action: "read",
                path: dir.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let target = self.root.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(SnapshotError::io("create", parent))?;
            }
            fs::copy(entry.path(), &target).map_err(SnapshotError::io("restore", &target))?;
            restored.push(target);
        }

        let pruned = self.prune()?;
        Ok(RestoreOutcome {
            label,
            restored,
            pruned,
        })
    }

    /// Delete the oldest snapshots beyond the retention count.
    pub fn prune(&self) -> Result<usize, SnapshotError> {
        let labels = self.list()?;
        let excess = labels.len().saturating_sub(self.keep);
        for label in &labels[..excess] {
            let dir = self.backup_dir.join(label);
            fs::remove_dir_all(&dir).map_err(SnapshotError::io("remove", &dir))?;
        }
        Ok(excess)
    }

    fn free_label(&self, label: &str) -> String {
        if !self.backup_dir.join(label).exists() {
            return label.to_string();
        }
        (2..)
            .map(|n| format!("{label}-{n}"))
            .find(|candidate| !self.backup_dir.join(candidate).exists())
            .unwrap_or_else(|| label.to_string())
    }
}

/// Path of `file` relative to the canonical `root`.
fn mirror_path(root: &Path, file: &Path) -> Result<PathBuf, SnapshotError> {
    let absolute = file
        .canonicalize()
        .map_err(SnapshotError::io("resolve", file))?;
    absolute
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| SnapshotError::OutsideRoot {
            path: file.to_path_buf(),
            root: root.to_path_buf(),
        })
}

/// Orders `label` and `label-N` by time, then by collision suffix.
fn label_order(label: &str) -> (String, u32) {
    let (time, suffix) = if label.len() > LABEL_TIME_LEN && label.is_char_boundary(LABEL_TIME_LEN)
    {
        label.split_at(LABEL_TIME_LEN)
    } else {
        (label, "")
    };
    let n = suffix
        .strip_prefix('-')
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    (time.to_string(), n)
}
