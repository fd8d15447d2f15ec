use std::io::Read;

use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct WriteArgs {
    /// Destination path inside the repository
    path: String,

    /// Content to write; read from stdin when omitted
    content: Option<String>,

    /// Target branch
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Commit message
    #[arg(short, long, default_value = "update")]
    message: String,
}

pub fn run(args: &WriteArgs, cli: &Cli) -> Result<i32> {
    let content = match &args.content {
        Some(text) => text.clone().into_bytes(),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let mut vault = open_vault()?;
    let env = vault.write(&args.path, &content, &args.branch, &args.message);
    finish(cli, env, |data| match &data.commit {
        Some(commit) => println!("[{}] {} {}", args.branch, &commit[..7], data.path),
        None => println!("no changes to {}", data.path),
    })
}
