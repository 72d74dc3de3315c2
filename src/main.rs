mod cli;
mod commands;
mod interactive;
mod mapping;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::io;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            interactive::Session::new(io::stdin().lock(), io::stdout()).run()?;
        }
        Commands::Extract {
            path,
            pages,
            output,
            mapping,
            json,
        } => {
            commands::extract::run(&path, &pages, output, &mapping, json)?;
        }
        Commands::Split {
            path,
            pages,
            output_dir,
            mapping,
            json,
        } => {
            commands::split::run(&path, pages.as_deref(), output_dir, &mapping, json)?;
        }
        Commands::Labels { path } => {
            commands::labels::run(&path)?;
        }
    }

    Ok(())
}
