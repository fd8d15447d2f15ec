use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct StatusArgs {}

pub fn run(_args: &StatusArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    let env = vault.status();
    finish(cli, env, |data| {
        if data.modified.is_empty() && data.untracked.is_empty() && data.deleted.is_empty() {
            println!("nothing to commit, working tree clean");
            return;
        }
        for path in &data.modified {
            println!("modified:  {path}");
        }
        for path in &data.deleted {
            println!("deleted:   {path}");
        }
        for path in &data.untracked {
            println!("untracked: {path}");
        }
    })
}
