//! `studysrs` command line entry point.

mod args;
mod commands;

use args::StudyArgs;
use clap::Parser;
use std::process;

fn main() {
    let args = StudyArgs::parse();

    if let Err(err) = commands::execute_command(args) {
        log::error!("event=cli_exit module=cli status=error error={err}");
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
