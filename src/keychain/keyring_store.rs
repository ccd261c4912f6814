//! OS keyring backend for platforms without the macOS Keychain:
//! - Windows: Credential Manager
//! - Linux: kernel keyutils
//!
//! Entries are keyed by (service, account). The access group,
//! accessibility and synchronizable attributes are Keychain concepts
//! with no keyring equivalent and are ignored here.
//!
//! Keyring backends refuse empty secrets. An empty token is therefore
//! kept as "no entry", which `get` already renders as empty output.

use keyring::Entry;
use zeroize::Zeroizing;

use super::{CredentialStore, ItemDescriptor, ItemQuery, QueryResult, StoreError};

#[derive(Debug, Default)]
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }
}

fn entry(item: &ItemDescriptor) -> Result<Entry, StoreError> {
    Entry::new(&item.service, &item.account).map_err(|e| {
        StoreError::Unavailable(format!("failed to create keyring entry: {e}"))
    })
}

/// Map an error from a read or delete.
fn read_err(e: keyring::Error) -> StoreError {
    match e {
        keyring::Error::NoEntry => StoreError::NotFound,
        other => StoreError::Unavailable(other.to_string()),
    }
}

/// Map an error from a write. `NoEntry` here means there is no keyring
/// to write into (e.g. no keyutils session keyring), not a missing item.
fn write_err(e: keyring::Error) -> StoreError {
    match e {
        keyring::Error::NoEntry => StoreError::Unavailable(
            "no keyring available to write to (is a session keyring set up?)".to_string(),
        ),
        other => StoreError::Unavailable(other.to_string()),
    }
}

fn write(entry: &Entry, data: &[u8]) -> Result<(), StoreError> {
    if data.is_empty() {
        return match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(write_err(e)),
        };
    }
    entry.set_secret(data).map_err(write_err)
}

fn create_in(entry: &Entry, data: &[u8]) -> Result<(), StoreError> {
    // Keyring writes are upserts; emulate the Keychain's insert semantics.
    match entry.get_secret() {
        Ok(_) => return Err(StoreError::Duplicate),
        Err(keyring::Error::NoEntry) => {}
        Err(e) => return Err(read_err(e)),
    }
    write(entry, data)
}

fn query_in(entry: &Entry, return_data: bool) -> Result<Vec<QueryResult>, StoreError> {
    match entry.get_secret() {
        Ok(secret) => {
            let secret = Zeroizing::new(secret);
            Ok(vec![QueryResult {
                data: return_data.then_some(secret),
            }])
        }
        Err(keyring::Error::NoEntry) => Ok(Vec::new()),
        Err(e) => Err(read_err(e)),
    }
}

impl CredentialStore for KeyringStore {
    fn create(&self, item: &ItemDescriptor) -> Result<(), StoreError> {
        let data = item.data.as_deref().map(Vec::as_slice).unwrap_or_default();
        create_in(&entry(item)?, data)?;
        tracing::debug!(service = %item.service, "created keyring entry");
        Ok(())
    }

    fn query(&self, query: &ItemQuery) -> Result<Vec<QueryResult>, StoreError> {
        query_in(&entry(&query.item)?, query.return_data)
    }

    fn update(&self, query: &ItemDescriptor, data: &[u8]) -> Result<(), StoreError> {
        write(&entry(query)?, data)
    }

    fn delete(&self, item: &ItemDescriptor) -> Result<(), StoreError> {
        entry(item)?.delete_credential().map_err(read_err)
    }
}
