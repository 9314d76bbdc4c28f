use std::process::ExitCode;

use clap::Parser;
use trnow::cli::{Arguments, ExitStatus, report::print_fatal};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match trnow::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            print_fatal(&err);
            ExitStatus::Error.into()
        }
    }
}
