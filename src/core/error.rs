use std::path::PathBuf;

use thiserror::Error;

use crate::core::snapshot::SnapshotError;

/// Failures that stop a run before any source file is touched.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to write resource file {}", .path.display())]
    ResourceWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to create snapshot")]
    Backup(#[from] SnapshotError),
}

impl PipelineError {
    pub fn resource_write(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PipelineError::ResourceWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}
