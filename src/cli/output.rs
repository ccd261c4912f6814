//! Colored terminal output helpers.
//!
//! Everything goes to stderr: Vault reads the token from stdout.

use console::style;

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").for_stderr().red().bold(), msg);
}
