//! Command-line entry point for tfcat.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use tfcat::cli::{TfcatArgs, execute_command};

/// Verbosity picks the default level; `TFCAT_LOG` can still override it per module.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(level)
        .parse_env("TFCAT_LOG")
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn main() -> ExitCode {
    let args = TfcatArgs::parse();
    init_logging(args.verbosity());

    match execute_command(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
