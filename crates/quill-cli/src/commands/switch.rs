use anyhow::Result;
use clap::Args;

use quill_repo::{checkout, Repository};

use crate::Cli;

#[derive(Args)]
pub struct SwitchArgs {
    /// Branch to switch to
    branch: String,
}

pub fn run(args: &SwitchArgs, _cli: &Cli) -> Result<i32> {
    let mut repo = Repository::open(std::env::current_dir()?)?;
    checkout::checkout_branch(&mut repo, &args.branch)?;
    eprintln!("Switched to branch '{}'", args.branch);
    Ok(0)
}
