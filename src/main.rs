use clap::Parser;
use ldval::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{detect, validate},
    utils::{handle_error_and_exit, Result},
};
use std::time;

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        FULL_VERSION,
        cli.command.name()
    );

    let start_timer = time::Instant::now();
    match cli.command {
        Command::Detect(args) => {
            log::trace!("Detect arguments: {:#?}", args);
            detect::detect(args)?
        }
        Command::Validate(args) => {
            log::trace!("Validate arguments: {:#?}", args);
            validate::validate(args)?
        }
    }

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
