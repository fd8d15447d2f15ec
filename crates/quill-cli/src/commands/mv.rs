use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct MvArgs {
    /// Current path
    from: String,

    /// New path
    to: String,

    /// Target branch
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Commit message
    #[arg(short, long, default_value = "rename")]
    message: String,
}

pub fn run(args: &MvArgs, cli: &Cli) -> Result<i32> {
    let mut vault = open_vault()?;
    let env = vault.rename(&args.from, &args.to, &args.branch, &args.message);
    finish(cli, env, |data| {
        println!("renamed {} -> {}", data.from, data.to);
    })
}
