use clap::Parser;
use order_probe::Cli;
use std::io;
use std::process::ExitCode;

/// Exit status for anything that stops the probe before a request is attempted.
const SETUP_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = configuration::init_tracing() {
        eprintln!("{e}");
    }

    let cli = Cli::parse();
    let mut stdout = io::stdout();

    match order_probe::run(&cli, &mut stdout).await {
        Ok(outcome) => ExitCode::from(outcome.exit_status()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(SETUP_FAILURE)
        }
    }
}
