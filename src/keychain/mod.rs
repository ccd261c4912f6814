//! Credential store boundary.
//!
//! The helper only ever needs four operations from the host credential
//! service: create, query, update, and delete, all keyed by an
//! [`ItemDescriptor`]. [`CredentialStore`] captures that contract so the
//! command handlers never touch a native API directly:
//! - macOS: Keychain via the Security framework ([`KeychainStore`])
//! - elsewhere: the platform keyring via the `keyring` crate ([`KeyringStore`])
//! - tests: [`MemoryStore`]

#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(target_os = "macos"))]
mod keyring_store;
pub mod memory;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::HelperContext;

#[cfg(target_os = "macos")]
pub use macos::KeychainStore;
#[cfg(not(target_os = "macos"))]
pub use keyring_store::KeyringStore;
pub use memory::MemoryStore;

/// Access group scoping the item to this tool.
pub const ACCESS_GROUP: &str = "com.hootsuite.vault-token-helper-osx-keychain";

/// Errors reported by a credential store backend.
///
/// `Duplicate` and `NotFound` are expected conditions that callers
/// translate; everything else is surfaced.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the specified item already exists in the keychain")]
    Duplicate,

    #[error("the specified item could not be found in the keychain")]
    NotFound,

    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    #[error("{message} (OSStatus {code})")]
    Os { code: i32, message: String },
}

/// Item class. Only generic passwords are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemClass {
    GenericPassword,
}

/// When the item may be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    /// Requires the device to be unlocked; never migrates to another device.
    WhenUnlockedThisDeviceOnly,
}

/// How many results a query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLimit {
    One,
}

/// Structured identifier (and optional payload) of a credential record.
///
/// Used both as the record to insert and as the query to match it.
#[derive(Debug, Clone)]
pub struct ItemDescriptor {
    pub class: ItemClass,
    pub service: String,
    pub account: String,
    pub label: String,
    pub access_group: String,
    pub synchronizable: bool,
    pub accessibility: Accessibility,
    pub data: Option<Zeroizing<Vec<u8>>>,
}

impl ItemDescriptor {
    /// Build the descriptor for the helper's single record.
    pub fn for_context(ctx: &HelperContext) -> Self {
        Self {
            class: ItemClass::GenericPassword,
            service: ctx.service.clone(),
            account: ctx.account.clone(),
            label: ctx.service.clone(),
            access_group: ACCESS_GROUP.to_string(),
            synchronizable: false,
            accessibility: Accessibility::WhenUnlockedThisDeviceOnly,
            data: None,
        }
    }

    /// Attach the secret payload.
    pub fn with_data(mut self, data: Zeroizing<Vec<u8>>) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether `other` names the same record (service, account, access group).
    pub fn same_record(&self, other: &ItemDescriptor) -> bool {
        self.class == other.class
            && self.service == other.service
            && self.account == other.account
            && self.access_group == other.access_group
    }
}

/// A query: the descriptor to match plus what to return.
#[derive(Debug, Clone)]
pub struct ItemQuery {
    pub item: ItemDescriptor,
    pub return_data: bool,
    pub limit: MatchLimit,
}

impl ItemQuery {
    /// Query returning the payload of at most one matching record.
    pub fn data_of(item: ItemDescriptor) -> Self {
        Self {
            item,
            return_data: true,
            limit: MatchLimit::One,
        }
    }
}

/// One matched record.
#[derive(Debug)]
pub struct QueryResult {
    /// Payload, present when the query asked for data.
    pub data: Option<Zeroizing<Vec<u8>>>,
}

/// The four native operations the helper relies on.
pub trait CredentialStore {
    /// Insert a new record. Fails with [`StoreError::Duplicate`] if one
    /// already exists for the same identifier.
    fn create(&self, item: &ItemDescriptor) -> Result<(), StoreError>;

    /// Find matching records. No match is an empty vector, not an error.
    fn query(&self, query: &ItemQuery) -> Result<Vec<QueryResult>, StoreError>;

    /// Replace the payload of the record matched by `query`.
    fn update(&self, query: &ItemDescriptor, data: &[u8]) -> Result<(), StoreError>;

    /// Remove the matching record. A missing record may be reported as
    /// [`StoreError::NotFound`].
    fn delete(&self, item: &ItemDescriptor) -> Result<(), StoreError>;
}

/// Open the credential store for the current platform.
pub fn platform_store() -> Box<dyn CredentialStore> {
    #[cfg(target_os = "macos")]
    {
        Box::new(KeychainStore::new())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Box::new(KeyringStore::new())
    }
}
