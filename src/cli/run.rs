use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::CommandResult,
    commands::{init::init, revert::revert, scan::scan, transform::transform, update::update},
};

/// Dispatch to the command handler.
///
/// `Err` means the command could not complete: bad configuration, a resource
/// that could not be read or written, or a snapshot that could not be taken.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Scan(cmd)) => scan(cmd),
        Some(Command::Transform(cmd)) => transform(cmd),
        Some(Command::Revert(cmd)) => revert(cmd),
        Some(Command::Update(cmd)) => update(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
