use clap::Parser;
use polyloc_cli::args::Args;
use polyloc_cli::{execute, logger, presentation};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.log_level());

    let report = match execute(&args) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match presentation::render(&report, args.format, args.dups) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
