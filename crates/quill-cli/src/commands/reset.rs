use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct ResetArgs {
    /// Branch name or full commit id to reset the current branch to
    revision: String,

    /// Also reconcile the working tree and index with the target commit
    #[arg(long)]
    hard: bool,
}

pub fn run(args: &ResetArgs, cli: &Cli) -> Result<i32> {
    let mut vault = open_vault()?;
    let env = vault.reset(&args.revision, args.hard);
    finish(cli, env, |data| {
        println!("{} is now at {}", data.branch, &data.commit[..7]);
    })
}
