//! Current OS user lookup.
//!
//! The login name becomes the `account` of every record, so failing to
//! resolve it is fatal.

use crate::errors::{HelperError, Result};

/// Login name of the user running this process.
#[cfg(unix)]
pub fn current_username() -> Result<String> {
    use nix::unistd::{Uid, User};

    let uid = Uid::current();
    match User::from_uid(uid) {
        Ok(Some(user)) => Ok(user.name),
        Ok(None) => Err(HelperError::Identity(format!(
            "no passwd entry for uid {uid}"
        ))),
        Err(e) => Err(HelperError::Identity(format!(
            "passwd lookup failed for uid {uid}: {e}"
        ))),
    }
}

/// Login name of the user running this process.
#[cfg(not(unix))]
pub fn current_username() -> Result<String> {
    ["USERNAME", "USER"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .ok_or_else(|| HelperError::Identity("USERNAME is not set".into()))
}
