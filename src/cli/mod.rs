//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{BufRead, Write};

use clap::Parser;

use crate::config::HelperContext;
use crate::errors::Result;
use crate::keychain::CredentialStore;

/// Vault token helper backed by the OS credential store.
///
/// Configure it in `~/.vault` with `token_helper = "/path/to/vault-token-helper"`.
#[derive(Parser)]
#[command(
    name = "vault-token-helper",
    about = "Store the Vault token in the OS credential store",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// The token helper protocol: exactly one of these per invocation.
#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Save the token read from stdin (add or update)
    Store,

    /// Print the stored token to stdout (nothing if absent)
    Get,

    /// Remove the stored token (succeeds if absent)
    Erase,
}

/// Run one command against `store`.
///
/// `input` is only read by `store`, `output` only written by `get`.
pub fn dispatch(
    command: Commands,
    ctx: &HelperContext,
    store: &dyn CredentialStore,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Store => commands::store::execute(ctx, store, input),
        Commands::Get => commands::get::execute(ctx, store, output),
        Commands::Erase => commands::erase::execute(ctx, store),
    }
}
