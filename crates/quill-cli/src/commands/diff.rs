use anyhow::Result;
use clap::Args;

use crate::Cli;

use super::{finish, open_vault};

#[derive(Args)]
pub struct DiffArgs {
    /// Old side (branch name); the working tree when omitted
    from: Option<String>,

    /// New side (branch name); the working tree when omitted
    to: Option<String>,
}

pub fn run(args: &DiffArgs, cli: &Cli) -> Result<i32> {
    let vault = open_vault()?;
    // With a single argument, compare that branch against the working tree.
    let (from, to) = match (&args.from, &args.to) {
        (Some(a), None) => (Some(a.as_str()), None),
        (Some(a), Some(b)) => (Some(a.as_str()), Some(b.as_str())),
        _ => (None, None),
    };

    let env = vault.diff(from, to);
    finish(cli, env, |data| {
        print!("{}", data.patch);
    })
}
