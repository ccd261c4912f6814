use std::io;

use clap::Parser;
use vault_token_helper::cli::{dispatch, output, Cli};
use vault_token_helper::config::{HelperContext, Settings};
use vault_token_helper::errors::Result;
use vault_token_helper::keychain;

fn main() {
    // Usage errors exit 1 like every other failure; help and version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    vault_token_helper::logging::init();

    if let Err(e) = run(&cli) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::from_env()?;
    let ctx = HelperContext::resolve(&settings)?;
    let store = keychain::platform_store();

    let stdin = io::stdin();
    let stdout = io::stdout();
    dispatch(
        cli.command,
        &ctx,
        store.as_ref(),
        &mut stdin.lock(),
        &mut stdout.lock(),
    )
}
