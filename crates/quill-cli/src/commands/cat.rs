use std::io::Write;

use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct CatArgs {
    /// Path inside the repository
    path: String,

    /// Branch to read from
    #[arg(short, long, default_value = "main")]
    branch: String,
}

pub fn run(args: &CatArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    let env = vault.read(&args.path, &args.branch);
    finish(cli, env, |data| {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(&data.content);
    })
}
