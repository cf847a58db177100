mod cli;
mod command;
mod config;
mod error;

use error::WrapErr;

use clap::CommandFactory;
use clap::Parser;
use tracing::Level;

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;
    let command_line = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(command_line.verbose))
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = command_line.command else {
        cli::Cli::command().print_help()?;
        return Ok(());
    };

    let cfg = config::Config::load().context("Load configuration error")?;

    let cmd: Box<dyn command::Command> = match command {
        cli::Commands::Search {
            query,
            limit,
            offset,
            json,
            explain,
            filters,
        } => Box::new(command::SearchCommand::new(
            cfg, query, filters, limit, offset, json, explain,
        )),
        cli::Commands::Rebuild { snapshot } => Box::new(command::RebuildCommand::new(cfg, snapshot)),
        cli::Commands::Index { record } => Box::new(command::IndexCommand::new(cfg, record)),
        cli::Commands::Remove { content_type, id } => {
            Box::new(command::RemoveCommand::new(cfg, content_type, id))
        }
        cli::Commands::Stats => Box::new(command::StatsCommand::new(cfg)),
    };
    cmd.execute().await?;

    Ok(())
}
