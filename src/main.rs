mod cli;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Dates {
            interval,
            begin,
            end,
        } => {
            if let Err(e) = command::dates(*interval, *begin, *end) {
                eprintln!("Error: {}", e);
            }
        }
        Commands::Plan { target } => match command::plan(target).await {
            Ok(0) => println!("Nothing to download"),
            Ok(pending) => println!("{} file(s) pending", pending),
            Err(e) => eprintln!("Error: {:#}", e),
        },
        Commands::Sync { target } => match command::sync(target).await {
            Ok(dir) => println!("Files saved to `{}`", dir),
            Err(e) => eprintln!("Error: {:#}", e),
        },
    }

    Ok(())
}
