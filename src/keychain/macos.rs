//! macOS Keychain backend.
//!
//! Talks to the Security framework item API directly so every attribute
//! of the record (access group, accessibility, synchronizable) reaches
//! the Keychain unchanged.

use std::ptr;

use core_foundation::base::{CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::{CFString, CFStringRef};
use security_framework::base::Error as SecError;
use security_framework_sys::access_control::kSecAttrAccessibleWhenUnlockedThisDeviceOnly;
use security_framework_sys::base::{errSecDuplicateItem, errSecItemNotFound, errSecSuccess};
use security_framework_sys::item::{
    kSecAttrAccessGroup, kSecAttrAccount, kSecAttrLabel, kSecAttrService,
    kSecAttrSynchronizable, kSecClass, kSecClassGenericPassword, kSecMatchLimit,
    kSecMatchLimitOne, kSecReturnData, kSecValueData,
};
use security_framework_sys::keychain_item::{
    SecItemAdd, SecItemCopyMatching, SecItemDelete, SecItemUpdate,
};
use zeroize::Zeroizing;

use super::{
    Accessibility, CredentialStore, ItemClass, ItemDescriptor, ItemQuery, MatchLimit,
    QueryResult, StoreError,
};

// Key for the item's accessibility class.
#[link(name = "Security", kind = "framework")]
extern "C" {
    static kSecAttrAccessible: CFStringRef;
}

type Pairs = Vec<(CFString, CFType)>;

#[derive(Debug, Default)]
pub struct KeychainStore;

impl KeychainStore {
    pub fn new() -> Self {
        Self
    }
}

/// Wrap one of the framework's constant keys.
fn key(raw: CFStringRef) -> CFString {
    // SAFETY: Security framework constants are valid for the process lifetime.
    unsafe { CFString::wrap_under_get_rule(raw) }
}

/// Attributes that identify the record: class, service, account, access
/// group and sync scope.
fn identity(item: &ItemDescriptor) -> Pairs {
    let class = match item.class {
        ItemClass::GenericPassword => key(unsafe { kSecClassGenericPassword }),
    };

    vec![
        (key(unsafe { kSecClass }), class.as_CFType()),
        (
            key(unsafe { kSecAttrService }),
            CFString::new(&item.service).as_CFType(),
        ),
        (
            key(unsafe { kSecAttrAccount }),
            CFString::new(&item.account).as_CFType(),
        ),
        (
            key(unsafe { kSecAttrAccessGroup }),
            CFString::new(&item.access_group).as_CFType(),
        ),
        (
            key(unsafe { kSecAttrSynchronizable }),
            CFBoolean::from(item.synchronizable).as_CFType(),
        ),
    ]
}

/// Full attribute set for an insert.
fn record(item: &ItemDescriptor) -> Pairs {
    let accessible = match item.accessibility {
        Accessibility::WhenUnlockedThisDeviceOnly => {
            key(unsafe { kSecAttrAccessibleWhenUnlockedThisDeviceOnly })
        }
    };

    let mut pairs = identity(item);
    pairs.push((
        key(unsafe { kSecAttrLabel }),
        CFString::new(&item.label).as_CFType(),
    ));
    pairs.push((key(unsafe { kSecAttrAccessible }), accessible.as_CFType()));
    if let Some(data) = &item.data {
        pairs.push((
            key(unsafe { kSecValueData }),
            CFData::from_buffer(data).as_CFType(),
        ));
    }
    pairs
}

fn dictionary(pairs: &[(CFString, CFType)]) -> CFDictionary<CFString, CFType> {
    CFDictionary::from_CFType_pairs(pairs)
}

/// Translate an OSStatus into the store contract.
fn check(status: i32) -> Result<(), StoreError> {
    match status {
        errSecSuccess => Ok(()),
        errSecDuplicateItem => Err(StoreError::Duplicate),
        errSecItemNotFound => Err(StoreError::NotFound),
        code => Err(StoreError::Os {
            code,
            message: SecError::from_code(code)
                .message()
                .unwrap_or_else(|| "unknown keychain error".to_string()),
        }),
    }
}

impl CredentialStore for KeychainStore {
    fn create(&self, item: &ItemDescriptor) -> Result<(), StoreError> {
        let attrs = dictionary(&record(item));
        // SAFETY: `attrs` outlives the call; no result is requested.
        let status = unsafe { SecItemAdd(attrs.as_concrete_TypeRef(), ptr::null_mut()) };
        tracing::debug!(status, service = %item.service, "SecItemAdd");
        check(status)
    }

    fn query(&self, query: &ItemQuery) -> Result<Vec<QueryResult>, StoreError> {
        let mut pairs = identity(&query.item);
        if query.return_data {
            pairs.push((
                key(unsafe { kSecReturnData }),
                CFBoolean::true_value().as_CFType(),
            ));
        }
        match query.limit {
            MatchLimit::One => pairs.push((
                key(unsafe { kSecMatchLimit }),
                key(unsafe { kSecMatchLimitOne }).as_CFType(),
            )),
        }
        let dict = dictionary(&pairs);

        let mut result: CFTypeRef = ptr::null();
        // SAFETY: `dict` outlives the call and `result` is a valid out-pointer.
        let status = unsafe { SecItemCopyMatching(dict.as_concrete_TypeRef(), &mut result) };
        tracing::debug!(status, service = %query.item.service, "SecItemCopyMatching");

        match check(status) {
            Ok(()) => {}
            Err(StoreError::NotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        }

        if result.is_null() {
            return Ok(vec![QueryResult { data: None }]);
        }

        // SAFETY: SecItemCopyMatching follows the create rule for `result`.
        let value = unsafe { CFType::wrap_under_create_rule(result) };
        let data = value
            .downcast_into::<CFData>()
            .map(|d| Zeroizing::new(d.bytes().to_vec()));
        Ok(vec![QueryResult { data }])
    }

    fn update(&self, query: &ItemDescriptor, data: &[u8]) -> Result<(), StoreError> {
        let query = dictionary(&identity(query));
        let changes = dictionary(&[(
            key(unsafe { kSecValueData }),
            CFData::from_buffer(data).as_CFType(),
        )]);
        // SAFETY: both dictionaries outlive the call.
        let status = unsafe {
            SecItemUpdate(query.as_concrete_TypeRef(), changes.as_concrete_TypeRef())
        };
        tracing::debug!(status, "SecItemUpdate");
        check(status)
    }

    fn delete(&self, item: &ItemDescriptor) -> Result<(), StoreError> {
        let query = dictionary(&identity(item));
        // SAFETY: `query` outlives the call.
        let status = unsafe { SecItemDelete(query.as_concrete_TypeRef()) };
        tracing::debug!(status, service = %item.service, "SecItemDelete");
        check(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_status_is_ok() {
        assert!(check(0).is_ok());
    }

    #[test]
    fn duplicate_status_maps_to_duplicate() {
        assert!(matches!(check(-25299), Err(StoreError::Duplicate)));
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        assert!(matches!(check(-25300), Err(StoreError::NotFound)));
    }

    #[test]
    fn other_status_keeps_code_and_message() {
        // errSecAuthFailed
        match check(-25293) {
            Err(StoreError::Os { code, message }) => {
                assert_eq!(code, -25293);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
