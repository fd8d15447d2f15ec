use anyhow::Result;
use clap::Args;

use quill_vault::{Vault, VaultOptions};

use crate::Cli;

#[derive(Args)]
pub struct InitArgs {
    /// Name of the default branch
    #[arg(long, default_value = "main")]
    branch: String,
}

pub fn run(args: &InitArgs, _cli: &Cli) -> Result<i32> {
    let opts = VaultOptions {
        default_branch: args.branch.clone(),
        ..VaultOptions::default()
    };
    let vault = Vault::open_opts(std::env::current_dir()?, opts)?;
    println!(
        "Initialized repository on branch '{}'",
        vault.default_branch()
    );
    Ok(0)
}
