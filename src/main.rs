mod app;
mod cli;
mod color;
mod config;
mod data;
mod error;
mod paths;
mod plot;
mod stats;
mod ui;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use app::App;
use cli::Cli;
use config::Config;
use error::PromptError;
use ui::prompt::Prompt;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    #[cfg(unix)]
    if let Err(err) = exit_on_interrupt() {
        log::warn!("{err:#}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_interrupt(&err) => {
            println!("\nInterrupted.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let config = Config::resolve(cli, &cwd)?;
    log::debug!("{config:?}");

    let stdin = io::stdin();
    let prompt = Prompt::new(stdin.lock(), io::stdout());
    App::new(config, prompt).run()?;
    Ok(())
}

/// Ctrl-C (or SIGTERM) while blocked at a prompt ends the session the same
/// way a closed stdin does.
#[cfg(unix)]
fn exit_on_interrupt() -> anyhow::Result<()> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("installing signal handler")?;
    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            log::debug!("received signal {signal}");
            println!("\nInterrupted.");
            std::process::exit(0);
        }
    });
    Ok(())
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|e| matches!(e.downcast_ref::<PromptError>(), Some(PromptError::Interrupted)))
}
