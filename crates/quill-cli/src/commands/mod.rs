pub mod branches;
pub mod cat;
pub mod diff;
pub mod grep;
pub mod init;
pub mod log;
pub mod ls;
pub mod mv;
pub mod reset;
pub mod restore;
pub mod rm;
pub mod show;
pub mod status;
pub mod switch;
pub mod write;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use quill_vault::{Envelope, Vault};

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create (or bootstrap) a repository in the current directory
    Init(init::InitArgs),
    /// Write a file on a branch, committing the change
    Write(write::WriteArgs),
    /// Print a file from a branch
    Cat(cat::CatArgs),
    /// List names under a directory of a branch
    Ls(ls::LsArgs),
    /// Delete a file on a branch
    Rm(rm::RmArgs),
    /// Rename a file on a branch
    Mv(mv::MvArgs),
    /// List branches
    Branches(branches::BranchesArgs),
    /// Show commit history
    Log(log::LogArgs),
    /// Show one commit with its patch
    Show(show::ShowArgs),
    /// Move the current branch tip to another commit
    Reset(reset::ResetArgs),
    /// Copy a committed file back into the working tree
    Restore(restore::RestoreArgs),
    /// Show working-tree status
    Status(status::StatusArgs),
    /// Show differences between branches or against the working tree
    Diff(diff::DiffArgs),
    /// Search file contents with a regex
    Grep(grep::GrepArgs),
    /// Switch the working tree to a branch
    Switch(switch::SwitchArgs),
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, &cli),
        Commands::Write(args) => write::run(args, &cli),
        Commands::Cat(args) => cat::run(args, &cli),
        Commands::Ls(args) => ls::run(args, &cli),
        Commands::Rm(args) => rm::run(args, &cli),
        Commands::Mv(args) => mv::run(args, &cli),
        Commands::Branches(args) => branches::run(args, &cli),
        Commands::Log(args) => log::run(args, &cli),
        Commands::Show(args) => show::run(args, &cli),
        Commands::Reset(args) => reset::run(args, &cli),
        Commands::Restore(args) => restore::run(args, &cli),
        Commands::Status(args) => status::run(args, &cli),
        Commands::Diff(args) => diff::run(args, &cli),
        Commands::Grep(args) => grep::run(args, &cli),
        Commands::Switch(args) => switch::run(args, &cli),
    }
}

/// Open the vault rooted in the current directory.
pub(crate) fn open_vault() -> Result<Vault> {
    Ok(Vault::open(std::env::current_dir()?)?)
}

/// Uniform envelope handling: with `--json` the raw envelope is printed and
/// the exit code reflects `success`; otherwise `on_ok` renders the payload.
pub(crate) fn finish<T: Serialize>(
    cli: &Cli,
    env: Envelope<T>,
    on_ok: impl FnOnce(&T),
) -> Result<i32> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&env)?);
        return Ok(if env.success { 0 } else { 1 });
    }

    if env.success {
        if let Some(ref data) = env.data {
            on_ok(data);
        }
        Ok(0)
    } else {
        eprintln!("error: {}", env.message);
        Ok(1)
    }
}
