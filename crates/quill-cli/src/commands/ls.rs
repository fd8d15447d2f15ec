use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct LsArgs {
    /// Directory to list (repository root by default)
    #[arg(default_value = "")]
    path: String,

    /// Branch to list from
    #[arg(short, long, default_value = "main")]
    branch: String,
}

pub fn run(args: &LsArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    let env = vault.ls(&args.path, &args.branch);
    finish(cli, env, |data| {
        for entry in &data.entries {
            let name = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            match (&entry.last_commit, &entry.last_message) {
                (Some(commit), Some(message)) => {
                    println!("{:<30} {} {}", name, &commit[..7], message)
                }
                _ => println!("{name}"),
            }
        }
    })
}
