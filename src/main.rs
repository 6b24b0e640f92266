mod cli;
mod config;
mod convert;
mod detect_cmd;
mod input;
mod logging;
mod threshold_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Threshold(args) => threshold_cmd::run(args),
        Command::Detect(args) => detect_cmd::run(args),
    }
}
