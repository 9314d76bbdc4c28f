use anyhow::Result;

use super::super::args::RevertCommand;
use super::{CommandResult, CommandSummary, RevertSummary, helper::finish};
use crate::core::{merged_config, snapshot::SnapshotError, snapshot::SnapshotManager};

pub fn revert(cmd: RevertCommand) -> Result<CommandResult> {
    let config = merged_config(&cmd.common)?;
    let manager = SnapshotManager::new(".", &config.backup.dir, config.backup.keep);

    let summary = match manager.restore_latest() {
        Ok(outcome) => RevertSummary::Restored(outcome),
        Err(SnapshotError::NoSnapshot(backup_dir)) => {
            RevertSummary::NothingToRevert { backup_dir }
        }
        Err(e) => return Err(e.into()),
    };

    Ok(finish(CommandSummary::Revert(summary), Vec::new(), 0))
}
