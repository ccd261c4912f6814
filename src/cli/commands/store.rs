//! `vault-token-helper store` — save the token read from stdin.

use std::io::BufRead;

use zeroize::Zeroizing;

use crate::config::HelperContext;
use crate::errors::{HelperError, Result};
use crate::keychain::{CredentialStore, ItemDescriptor, ItemQuery, StoreError};

/// Execute the `store` command.
///
/// Reads a single line from `input`, keeping the trailing newline if
/// there is one. End of input before a newline is not an error.
pub fn execute(
    ctx: &HelperContext,
    store: &dyn CredentialStore,
    input: &mut dyn BufRead,
) -> Result<()> {
    let mut value = Zeroizing::new(Vec::new());
    input
        .read_until(b'\n', &mut value)
        .map_err(HelperError::ReadInput)?;

    let item = ItemDescriptor::for_context(ctx).with_data(value);

    match store.create(&item) {
        Ok(()) => {
            tracing::debug!(service = %ctx.service, "stored new token");
            Ok(())
        }
        // Keychain items are not upserted: an existing record is updated instead.
        Err(StoreError::Duplicate) => update_existing(ctx, store, &item),
        Err(e) => Err(HelperError::store("failed to add item to keychain")(e)),
    }
}

fn update_existing(
    ctx: &HelperContext,
    store: &dyn CredentialStore,
    item: &ItemDescriptor,
) -> Result<()> {
    let query = ItemQuery::data_of(ItemDescriptor::for_context(ctx));

    let results = store
        .query(&query)
        .map_err(HelperError::store("failed to query keychain"))?;
    if results.is_empty() {
        return Err(HelperError::NoResults);
    }

    let data = item.data.as_deref().map(Vec::as_slice).unwrap_or_default();
    store
        .update(&query.item, data)
        .map_err(HelperError::store("failed to update item in keychain"))?;

    tracing::debug!(service = %ctx.service, "updated existing token");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keychain::memory::{MemoryStore, Operation};

    fn ctx() -> HelperContext {
        HelperContext {
            account: "alice".into(),
            service: "https://vault.example.com".into(),
        }
    }

    fn stored(store: &MemoryStore) -> Option<Vec<u8>> {
        store.payload(&ItemDescriptor::for_context(&ctx()))
    }

    #[test]
    fn keeps_trailing_newline() {
        let store = MemoryStore::new();
        execute(&ctx(), &store, &mut &b"s.abc123\n"[..]).unwrap();
        assert_eq!(stored(&store).unwrap(), b"s.abc123\n");
    }

    #[test]
    fn reads_only_the_first_line() {
        let store = MemoryStore::new();
        execute(&ctx(), &store, &mut &b"first\nsecond\n"[..]).unwrap();
        assert_eq!(stored(&store).unwrap(), b"first\n");
    }

    #[test]
    fn end_of_input_without_newline_is_fine() {
        let store = MemoryStore::new();
        execute(&ctx(), &store, &mut &b"no-newline"[..]).unwrap();
        assert_eq!(stored(&store).unwrap(), b"no-newline");
    }

    #[test]
    fn empty_input_stores_empty_value() {
        let store = MemoryStore::new();
        execute(&ctx(), &store, &mut &b""[..]).unwrap();
        assert_eq!(stored(&store).unwrap(), b"");
    }

    #[test]
    fn duplicate_becomes_update() {
        let store = MemoryStore::new();
        execute(&ctx(), &store, &mut &b"old\n"[..]).unwrap();
        execute(&ctx(), &store, &mut &b"new\n"[..]).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(stored(&store).unwrap(), b"new\n");
    }

    #[test]
    fn duplicate_without_record_is_inconsistent() {
        let store = MemoryStore::new();
        store.report_phantom_duplicates();
        let err = execute(&ctx(), &store, &mut &b"tok\n"[..]).unwrap_err();
        assert!(matches!(err, HelperError::NoResults));
    }

    #[test]
    fn add_failure_is_wrapped() {
        let store = MemoryStore::new();
        store.fail_on(Operation::Create);
        let err = execute(&ctx(), &store, &mut &b"tok\n"[..]).unwrap_err();
        assert!(err.to_string().starts_with("failed to add item to keychain"));
        assert!(store.is_empty());
    }

    #[test]
    fn update_failure_is_wrapped() {
        let store = MemoryStore::new();
        execute(&ctx(), &store, &mut &b"old\n"[..]).unwrap();
        store.fail_on(Operation::Update);
        let err = execute(&ctx(), &store, &mut &b"new\n"[..]).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("failed to update item in keychain"));
        assert_eq!(stored(&store).unwrap(), b"old\n");
    }

    #[test]
    fn read_failure_is_wrapped() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("stdin closed"))
            }
        }

        let store = MemoryStore::new();
        let mut input = std::io::BufReader::new(Broken);
        let err = execute(&ctx(), &store, &mut input).unwrap_err();
        assert!(matches!(err, HelperError::ReadInput(_)));
        assert!(store.is_empty());
    }
}
