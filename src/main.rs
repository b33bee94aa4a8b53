use clap::Parser;

mod cli;
mod commands;
mod common;
mod scenarios;

use cli::args::Cli;
use cli::handler::CommandHandler;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let handler = CommandHandler::new();

    if let Err(e) = handler.handle_command(cli.command).await {
        if e.is_fatal() {
            log::error!("Aborting before any scenario ran");
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
