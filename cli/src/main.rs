use std::process::ExitCode;
use std::sync::Arc;

use brainbash_cli::cli::Cli;
use brainbash_cli::{VERSION, commands, logging, signal};
use clap::{CommandFactory, Parser};

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Cli::command(), "brainbash", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }
    if args.version {
        println!("brainbash {VERSION}");
        return ExitCode::SUCCESS;
    }

    logging::init_subscriber(args.global.verbose, args.global.theme, "install");
    let log = Arc::new(logging::Logger::new("install"));

    if let Err(e) = signal::install_handler() {
        log.warn(&format!("cannot install interrupt handler: {e}"));
    }

    match commands::install::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
