#![allow(dead_code)]

use roster_tauri::app::AppState;
use roster_tauri::config::AppConfig;
use roster_tauri::errors::StoreError;
use roster_tauri::storage::StoragePaths;
use roster_tauri::store::{Collection, Document, ListOrder, RecordStore};
use serde_json::{Map, Value};
use tempfile::TempDir;

pub fn test_config() -> AppConfig {
    AppConfig {
        kdf_iterations: 10,
        store_secret: "integration-secret".to_string(),
        ..AppConfig::default()
    }
}

pub fn open_state(dir: &TempDir) -> AppState {
    let paths = StoragePaths::new(dir.path()).unwrap();
    AppState::with_config(paths, test_config()).unwrap()
}

/// Store double whose every call fails.
#[derive(Debug, Default)]
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("offline".to_string())
}

impl RecordStore for FailingStore {
    fn list(&self, _: Collection, _: ListOrder) -> Result<Vec<Document>, StoreError> {
        Err(unavailable())
    }

    fn create(&mut self, _: Collection, _: Map<String, Value>) -> Result<String, StoreError> {
        Err(unavailable())
    }

    fn update(&mut self, _: Collection, _: &str, _: Map<String, Value>) -> Result<(), StoreError> {
        Err(unavailable())
    }

    fn delete(&mut self, _: Collection, _: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

/// Store double that passes writes through to `inner` and fails reads while
/// `fail_lists` is set.
#[derive(Debug)]
pub struct ReadFailingStore<S> {
    pub inner: S,
    pub fail_lists: bool,
}

impl<S: RecordStore> RecordStore for ReadFailingStore<S> {
    fn list(&self, collection: Collection, order: ListOrder) -> Result<Vec<Document>, StoreError> {
        if self.fail_lists {
            return Err(unavailable());
        }
        self.inner.list(collection, order)
    }

    fn create(
        &mut self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<String, StoreError> {
        self.inner.create(collection, fields)
    }

    fn update(
        &mut self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.inner.update(collection, id, fields)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id)
    }
}
