use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct ShowArgs {
    /// Branch name or full commit id (HEAD by default)
    revision: Option<String>,
}

pub fn run(args: &ShowArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    let env = vault.show(args.revision.as_deref());
    finish(cli, env, |data| {
        println!("commit {}", data.id);
        println!("Author: {}", data.author);
        println!();
        for line in data.message.lines() {
            println!("    {line}");
        }
        println!();
        print!("{}", data.patch);
    })
}
