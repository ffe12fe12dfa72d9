use clap::Parser;
use event_analyzer::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();

    cli::setup_logging(&args);

    match cli::run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            tracing::debug!("Analysis failed: {:#}", error);
            eprintln!("Error: {}", cli::user_message(&error));
            process::exit(1);
        }
    }
}
