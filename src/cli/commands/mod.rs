mod command_result;
pub mod helper;
pub mod init;
pub mod revert;
pub mod scan;
pub mod transform;
pub mod update;

pub use command_result::*;
