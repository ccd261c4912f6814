//! Process-wide configuration, resolved once at startup.

pub mod identity;
pub mod settings;

pub use settings::Settings;

use crate::errors::Result;

/// Environment variable naming the target Vault server.
pub const VAULT_ADDR_VAR: &str = "VAULT_ADDR";

/// Immutable identity of the helper's single credential record.
///
/// Built once in `main` and handed to every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperContext {
    /// Login name of the current OS user.
    pub account: String,
    /// Service label; doubles as the item label.
    pub service: String,
}

impl HelperContext {
    /// Resolve the context from the process environment.
    pub fn resolve(settings: &Settings) -> Result<Self> {
        let account = identity::current_username()?;
        let service = service_label(vault_addr().as_deref(), &settings.default_service);

        tracing::debug!(%account, %service, "resolved helper context");
        Ok(Self { account, service })
    }
}

/// Raw `VAULT_ADDR` value; `None` when unset.
pub fn vault_addr() -> Option<String> {
    std::env::var_os(VAULT_ADDR_VAR).map(|v| v.to_string_lossy().into_owned())
}

/// Service label for the given `VAULT_ADDR` value.
///
/// Unset falls back to `default`; a set value is trimmed and lower-cased.
pub fn service_label(vault_addr: Option<&str>, default: &str) -> String {
    match vault_addr {
        Some(addr) => addr.trim().to_lowercase(),
        None => default.to_string(),
    }
}
