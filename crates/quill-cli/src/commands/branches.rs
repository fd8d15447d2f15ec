use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct BranchesArgs {}

pub fn run(_args: &BranchesArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    let current = vault.repo().current_branch()?.unwrap_or_default();
    let env = vault.branches();
    finish(cli, env, |data| {
        for branch in &data.branches {
            let marker = if *branch == current { "*" } else { " " };
            println!("{marker} {branch}");
        }
    })
}
