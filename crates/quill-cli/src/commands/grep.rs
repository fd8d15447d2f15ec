use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct GrepArgs {
    /// Regex pattern
    pattern: String,

    /// Branch to search; the working tree when omitted
    #[arg(short, long)]
    branch: Option<String>,
}

pub fn run(args: &GrepArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    let env = vault.grep(&args.pattern, args.branch.as_deref());
    finish(cli, env, |data| {
        for hit in &data.matches {
            println!("{}:{}:{}", hit.path, hit.line, hit.text);
        }
    })
}
