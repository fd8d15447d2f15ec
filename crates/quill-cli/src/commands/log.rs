use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct LogArgs {
    /// Branch to walk (HEAD by default)
    branch: Option<String>,

    /// Limit the number of commits shown
    #[arg(short = 'n', long)]
    max_count: Option<usize>,
}

pub fn run(args: &LogArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    let env = vault.history(args.branch.as_deref(), args.max_count);
    finish(cli, env, |data| {
        for entry in &data.entries {
            println!("commit {}", entry.id);
            println!("Author: {}", entry.author);
            println!();
            for line in entry.message.lines() {
                println!("    {line}");
            }
            println!();
        }
    })
}
