use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct RmArgs {
    /// Path to delete
    path: String,

    /// Target branch
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Commit message
    #[arg(short, long, default_value = "delete")]
    message: String,

    /// Delete the branch if the removal leaves it with no tracked files
    #[arg(long)]
    kill_empty_branch: bool,
}

pub fn run(args: &RmArgs, cli: &Cli) -> Result<i32> {
    let mut vault = open_vault()?;
    let env = vault.delete(&args.path, &args.branch, &args.message, args.kill_empty_branch);
    finish(cli, env, |data| {
        println!("deleted {}", data.path);
        if data.branch_deleted {
            println!("deleted branch '{}'", args.branch);
        }
    })
}
