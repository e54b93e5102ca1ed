use std::process;

use clap::Parser;
use taskdesk::cli::Cli;
use taskdesk::config::Config;
use taskdesk::{commands, logging, tui};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(mut cli: Cli) -> taskdesk::Result<()> {
    let config = Config::from_cli(&cli)?;
    match cli.command.take() {
        Some(command) => {
            logging::init(config.log_file.as_deref())?;
            commands::dispatch(command, &config)
        }
        None => {
            logging::init(Some(config.tui_log_file().as_path()))?;
            log::info!("dashboard starting against {}", config.tasks_url);
            tui::run(&config)
        }
    }
}
