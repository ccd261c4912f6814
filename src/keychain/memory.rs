//! In-memory credential store.
//!
//! Honors the same contract as the native backends: uniqueness per
//! (service, account, access group), `Duplicate` on a second insert and
//! `NotFound` on deleting a missing record. No keychain interaction.

use std::cell::{Cell, RefCell};

use zeroize::Zeroizing;

use super::{CredentialStore, ItemDescriptor, ItemQuery, QueryResult, StoreError};

/// Store operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Query,
    Update,
    Delete,
}

#[derive(Default)]
pub struct MemoryStore {
    records: RefCell<Vec<ItemDescriptor>>,
    fail_on: Cell<Option<Operation>>,
    phantom_duplicates: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `op` fail with an `Unavailable` error.
    pub fn fail_on(&self, op: Operation) {
        self.fail_on.set(Some(op));
    }

    /// Report `Duplicate` on every insert without keeping the record,
    /// as a racing deleter would make it look.
    pub fn report_phantom_duplicates(&self) {
        self.phantom_duplicates.set(true);
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored payload of the record matching `item`, if any.
    pub fn payload(&self, item: &ItemDescriptor) -> Option<Vec<u8>> {
        self.records
            .borrow()
            .iter()
            .find(|r| r.same_record(item))
            .and_then(|r| r.data.as_ref().map(|d| d.to_vec()))
    }

    fn check(&self, op: Operation) -> Result<(), StoreError> {
        if self.fail_on.get() == Some(op) {
            return Err(StoreError::Unavailable(format!("{op:?} failed")));
        }
        Ok(())
    }
}

impl CredentialStore for MemoryStore {
    fn create(&self, item: &ItemDescriptor) -> Result<(), StoreError> {
        self.check(Operation::Create)?;
        if self.phantom_duplicates.get() {
            return Err(StoreError::Duplicate);
        }

        let mut records = self.records.borrow_mut();
        if records.iter().any(|r| r.same_record(item)) {
            return Err(StoreError::Duplicate);
        }
        records.push(item.clone());
        Ok(())
    }

    fn query(&self, query: &ItemQuery) -> Result<Vec<QueryResult>, StoreError> {
        self.check(Operation::Query)?;
        let results = self
            .records
            .borrow()
            .iter()
            .filter(|r| r.same_record(&query.item))
            .take(1)
            .map(|r| QueryResult {
                data: if query.return_data {
                    r.data.clone()
                } else {
                    None
                },
            })
            .collect();
        Ok(results)
    }

    fn update(&self, query: &ItemDescriptor, data: &[u8]) -> Result<(), StoreError> {
        self.check(Operation::Update)?;
        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .find(|r| r.same_record(query))
            .ok_or(StoreError::NotFound)?;
        record.data = Some(Zeroizing::new(data.to_vec()));
        Ok(())
    }

    fn delete(&self, item: &ItemDescriptor) -> Result<(), StoreError> {
        self.check(Operation::Delete)?;
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|r| !r.same_record(item));
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HelperContext;

    fn item(account: &str) -> ItemDescriptor {
        ItemDescriptor::for_context(&HelperContext {
            account: account.into(),
            service: "svc".into(),
        })
    }

    #[test]
    fn second_create_is_duplicate() {
        let store = MemoryStore::new();
        store.create(&item("alice")).unwrap();
        assert!(matches!(
            store.create(&item("alice")),
            Err(StoreError::Duplicate)
        ));
        store.create(&item("bob")).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn query_without_return_data_omits_payload() {
        let store = MemoryStore::new();
        store
            .create(&item("alice").with_data(Zeroizing::new(b"tok".to_vec())))
            .unwrap();

        let mut q = ItemQuery::data_of(item("alice"));
        q.return_data = false;
        let results = store.query(&q).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].data.is_none());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete(&item("alice")),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn injected_failure_applies_to_one_operation() {
        let store = MemoryStore::new();
        store.fail_on(Operation::Query);
        store.create(&item("alice")).unwrap();
        assert!(store.query(&ItemQuery::data_of(item("alice"))).is_err());
    }
}
