use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};

use hbnb::cli::Cli;
use hbnb::command::CommandEngine;
use hbnb::config::Config;
use hbnb::logging;
use hbnb::storage::FileStorage;

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_level);

    let storage = FileStorage::open(&config.file_path)
        .with_context(|| format!("failed to load {}", config.file_path.display()))?;
    let engine = CommandEngine::new(storage, config.attribute_policy());

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut cli = Cli::new(engine, stdin.lock(), io::stdout().lock(), interactive);
    cli.run()
}
