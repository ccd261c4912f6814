//! One module per token helper command.

pub mod erase;
pub mod get;
pub mod store;
