//! inkystock CLI entry point.

use clap::Parser;

use inkystock::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config(command) => inkystock::cli::commands::config::execute(command, &cli.global),
    };

    if let Err(err) = result {
        inkystock::cli::handle_error(err, cli.global.json);
    }
}
