//! `vault-token-helper erase` — remove the stored token.

use crate::config::HelperContext;
use crate::errors::{HelperError, Result};
use crate::keychain::{CredentialStore, ItemDescriptor, StoreError};

/// Execute the `erase` command.
///
/// Succeeds when the item does not exist; only store communication
/// failures are errors.
pub fn execute(ctx: &HelperContext, store: &dyn CredentialStore) -> Result<()> {
    let item = ItemDescriptor::for_context(ctx);

    match store.delete(&item) {
        Ok(()) => {
            tracing::debug!(service = %ctx.service, "erased token");
            Ok(())
        }
        Err(StoreError::NotFound) => {
            tracing::debug!(service = %ctx.service, "no token to erase");
            Ok(())
        }
        Err(e) => Err(HelperError::store("failed to delete item")(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keychain::memory::{MemoryStore, Operation};

    fn ctx() -> HelperContext {
        HelperContext {
            account: "alice".into(),
            service: "svc".into(),
        }
    }

    #[test]
    fn removes_existing_item() {
        let store = MemoryStore::new();
        store.create(&ItemDescriptor::for_context(&ctx())).unwrap();
        execute(&ctx(), &store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn missing_item_is_success() {
        let store = MemoryStore::new();
        execute(&ctx(), &store).unwrap();
    }

    #[test]
    fn delete_failure_is_wrapped() {
        let store = MemoryStore::new();
        store.fail_on(Operation::Delete);
        let err = execute(&ctx(), &store).unwrap_err();
        assert!(err.to_string().starts_with("failed to delete item"));
    }
}
