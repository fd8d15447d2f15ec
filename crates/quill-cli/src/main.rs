mod commands;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use commands::Commands;

#[derive(Parser)]
#[command(name = "quill", about = "A Git-compatible file store")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Run as if started in <path>
    #[arg(short = 'C', global = true, value_name = "path")]
    directory: Option<PathBuf>,

    /// Print the raw result envelope as JSON
    #[arg(long, global = true)]
    json: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("fatal: cannot change to '{}': {}", dir.display(), e);
            process::exit(128);
        }
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("fatal: {e}");
            process::exit(128);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    commands::run(cli)
}
