//! Interactive and scripted shell over the finance manager.

pub mod commands;
mod context;
pub mod output;
mod shell;
pub mod table;

pub use context::{CliError, CliMode, CommandError, CommandResult, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
