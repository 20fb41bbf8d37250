//! In-memory recording store.

use bastion_core::{
    scalar_view, Key, MutationRequest, Record, Store, StoreError, StoreResult, Value,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    records: BTreeMap<String, Vec<Record>>,
    fetches: Vec<(String, Key)>,
    persisted: Vec<(String, MutationRequest)>,
    next_id: u64,
}

/// A `Store` over in-memory tables that records every call.
///
/// `persist` applies the root node's scalar fields to the root entity's
/// table. Nested operations are kept in the recorded request, where tests
/// can inspect what the pipeline resolved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_persist: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to `entity`'s table.
    pub fn seed(self, entity: &str, record: Record) -> Self {
        self.state()
            .records
            .entry(entity.to_string())
            .or_default()
            .push(record);
        self
    }

    /// Make every persist call fail with a backend error.
    pub fn failing_persist(mut self, message: impl Into<String>) -> Self {
        self.fail_persist = Some(message.into());
        self
    }

    pub fn find(&self, entity: &str, key: &Key) -> Option<Record> {
        self.state()
            .records
            .get(entity)
            .and_then(|rows| rows.iter().find(|r| key.matches(r)).cloned())
    }

    pub fn records(&self, entity: &str) -> Vec<Record> {
        self.state().records.get(entity).cloned().unwrap_or_default()
    }

    pub fn fetch_count(&self) -> usize {
        self.state().fetches.len()
    }

    pub fn persist_count(&self) -> usize {
        self.state().persisted.len()
    }

    /// Requests handed to `persist`, in call order.
    pub fn persisted(&self) -> Vec<(String, MutationRequest)> {
        self.state().persisted.clone()
    }

    /// The most recent persisted request.
    pub fn last_persisted(&self) -> Option<MutationRequest> {
        self.state().persisted.last().map(|(_, r)| r.clone())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn fetch_by_key(&self, entity: &str, key: &Key) -> StoreResult<Option<Record>> {
        let mut state = self.state();
        state.fetches.push((entity.to_string(), key.clone()));
        Ok(state
            .records
            .get(entity)
            .and_then(|rows| rows.iter().find(|r| key.matches(r)).cloned()))
    }

    fn persist(&self, entity: &str, request: &MutationRequest) -> StoreResult<Record> {
        let mut state = self.state();
        state.persisted.push((entity.to_string(), request.clone()));
        if let Some(message) = &self.fail_persist {
            return Err(StoreError::backend(message.clone()));
        }

        match request {
            MutationRequest::Create { data } => {
                let mut record = scalar_view(data);
                if !record.contains_key("id") {
                    state.next_id += 1;
                    let id = format!("{}-{}", entity.to_lowercase(), state.next_id);
                    record.insert("id".to_string(), Value::from(id));
                }
                state
                    .records
                    .entry(entity.to_string())
                    .or_default()
                    .push(record.clone());
                Ok(record)
            }
            MutationRequest::Update { key, data } => {
                let row = state
                    .records
                    .get_mut(entity)
                    .and_then(|rows| rows.iter_mut().find(|r| key.matches(r)))
                    .ok_or_else(|| StoreError::backend(format!("no {} with {}", entity, key)))?;
                row.extend(scalar_view(data));
                Ok(row.clone())
            }
            MutationRequest::Delete { key } => {
                let rows = state.records.entry(entity.to_string()).or_default();
                let index = rows
                    .iter()
                    .position(|r| key.matches(r))
                    .ok_or_else(|| StoreError::backend(format!("no {} with {}", entity, key)))?;
                Ok(rows.remove(index))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{data, record};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_assigns_id() {
        let store = MemoryStore::new();
        let record = store
            .persist("Post", &MutationRequest::create(data! { "title" => "A" }))
            .unwrap();
        assert_eq!(record, record! { "id" => "post-1", "title" => "A" });
        assert_eq!(store.records("Post").len(), 1);
    }

    #[test]
    fn test_update_merges_scalars() {
        // GIVEN
        let store = MemoryStore::new().seed("Post", record! { "id" => "p1", "title" => "A", "views" => 1i64 });

        // WHEN
        store
            .persist(
                "Post",
                &MutationRequest::update(Key::id("p1"), data! { "title" => "B" }),
            )
            .unwrap();

        // THEN
        assert_eq!(
            store.find("Post", &Key::id("p1")),
            Some(record! { "id" => "p1", "title" => "B", "views" => 1i64 })
        );
    }

    #[test]
    fn test_fetches_are_counted() {
        let store = MemoryStore::new().seed("User", record! { "id" => "u1" });
        assert!(store.fetch_by_key("User", &Key::id("u1")).unwrap().is_some());
        assert!(store.fetch_by_key("User", &Key::id("u2")).unwrap().is_none());
        assert_eq!(store.fetch_count(), 2);
    }
}
