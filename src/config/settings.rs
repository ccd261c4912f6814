use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{HelperError, Result};

/// Optional helper configuration, loaded from a TOML file.
///
/// Every field has a default so the helper works without any config
/// file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Service label used when `VAULT_ADDR` is not set.
    #[serde(default = "default_service")]
    pub default_service: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_service() -> String {
    "Default HashiCorp Vault Server".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_service: default_service(),
        }
    }
}

impl Settings {
    /// Environment variable naming the config file.
    pub const PATH_VAR: &'static str = "VAULT_TOKEN_HELPER_CONFIG";

    /// Load settings from the file named by `VAULT_TOKEN_HELPER_CONFIG`,
    /// or defaults when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(Self::PATH_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from `config_path`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            HelperError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_use_default_server_label() {
        let s = Settings::default();
        assert_eq!(s.default_service, "Default HashiCorp Vault Server");
    }

    #[test]
    fn load_returns_defaults_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(&tmp.path().join("helper.toml")).unwrap();
        assert_eq!(settings.default_service, "Default HashiCorp Vault Server");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("helper.toml");
        fs::write(&path, "default_service = \"HashiCorp Vault\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_service, "HashiCorp Vault");
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("helper.toml");
        fs::write(&path, "# nothing here\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_service, "Default HashiCorp Vault Server");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("helper.toml");
        fs::write(&path, "not valid {{toml").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, HelperError::ConfigError(_)));
    }
}
