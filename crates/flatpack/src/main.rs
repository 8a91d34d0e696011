use std::process::ExitCode;

use clap::Parser;
use console::style;
use flatpack::cli::{self, Cli};

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging(args.verbose);

    match cli::run(&args) {
        Ok(report) if report.has_failures() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("FLATPACK ERROR:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
