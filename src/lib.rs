pub mod cli;
pub mod config;
pub mod errors;
pub mod keychain;
pub mod logging;
