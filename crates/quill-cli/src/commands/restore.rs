use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct RestoreArgs {
    /// Path to restore into the working tree
    path: String,

    /// Branch to take the content from (HEAD by default)
    #[arg(short, long)]
    branch: Option<String>,
}

pub fn run(args: &RestoreArgs, cli: &Cli) -> Result<i32> {
    let mut vault = open_vault()?;
    let env = vault.restore(&args.path, args.branch.as_deref());
    finish(cli, env, |data| {
        println!("restored {} from {}", data.path, &data.commit[..7]);
    })
}
