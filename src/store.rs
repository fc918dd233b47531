//! Document collections for candidates, access keys and bookmarks.
//!
//! [`RecordStore`] is the seam the screens talk to. [`EncryptedFileStore`]
//! keeps all three collections in one AES-GCM sealed JSON file and holds the
//! decrypted document in memory between calls.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::DateTime;
use serde_json::{json, Map, Value};

use crate::crypto::{
    decrypt_envelope_with_key, derive_key, encrypt_text_with_key, envelope_salt, random_hex,
    random_salt, CryptoEnvelope,
};
use crate::errors::StoreError;
use crate::model::Record;
use crate::storage::write_text_file;

const DB_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    AccessKeys,
    Bookmarks,
}

pub const ALL_COLLECTIONS: [Collection; 3] = [
    Collection::Students,
    Collection::AccessKeys,
    Collection::Bookmarks,
];

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::AccessKeys => "accessKeys",
            Collection::Bookmarks => "bookmarks",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Insertion order.
    Stored,
    Ascending(&'static str),
    Descending(&'static str),
}

pub trait RecordStore {
    fn list(&self, collection: Collection, order: ListOrder) -> Result<Vec<Document>, StoreError>;

    /// Returns the generated id.
    fn create(
        &mut self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<String, StoreError>;

    /// Merges `fields` into the existing document.
    fn update(
        &mut self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

pub fn list_records<T: Record>(
    store: &dyn RecordStore,
    order: ListOrder,
) -> Result<Vec<T>, StoreError> {
    store
        .list(T::COLLECTION, order)?
        .iter()
        .map(T::from_document)
        .collect()
}

pub fn create_record<T: Record>(
    store: &mut dyn RecordStore,
    record: &T,
) -> Result<String, StoreError> {
    store.create(T::COLLECTION, record.to_fields()?)
}

pub fn new_id() -> String {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("id-{ms}-{}", random_hex(10))
}

pub struct EncryptedFileStore {
    path: PathBuf,
    salt: Vec<u8>,
    key: [u8; 32],
    db: Value,
}

impl fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl EncryptedFileStore {
    /// Opens the store file, or starts an empty one that is written on the
    /// first mutation.
    pub fn open(
        path: impl Into<PathBuf>,
        secret: &str,
        iterations: u32,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            let salt = random_salt();
            let key = derive_key(secret, &salt, iterations);
            tracing::info!(path = %path.display(), "starting empty record store");
            return Ok(EncryptedFileStore {
                path,
                salt: salt.to_vec(),
                key,
                db: default_db_value(),
            });
        }

        let raw = fs::read_to_string(path.as_path())?;
        let envelope: CryptoEnvelope = serde_json::from_str(raw.as_str())?;
        let salt = envelope_salt(&envelope).ok_or(StoreError::Locked)?;
        let key = derive_key(secret, salt.as_slice(), iterations);
        let plaintext = decrypt_envelope_with_key(&envelope, &key).ok_or(StoreError::Locked)?;
        let parsed: Value = serde_json::from_str(plaintext.as_str())?;

        Ok(EncryptedFileStore {
            path,
            salt,
            key,
            db: ensure_db_shape_value(parsed),
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.documents(collection).map_or(true, |docs| docs.is_empty())
    }

    /// Fills an empty collection with `records`, keeping
    /// each record's own id.
    pub fn seed_if_empty<T: Record>(&mut self, records: &[T]) -> Result<usize, StoreError> {
        if !self.is_empty(T::COLLECTION) {
            return Ok(0);
        }
        let mut next = self.db.clone();
        let docs = documents_mut(&mut next, T::COLLECTION)?;
        for record in records {
            let mut fields = record.to_fields()?;
            fields.insert("id".to_string(), json!(record.id()));
            docs.push(Value::Object(fields));
        }
        self.commit(next)?;
        tracing::info!(count = records.len(), "seeded sample roster");
        Ok(records.len())
    }

    fn documents(&self, collection: Collection) -> Option<&Vec<Value>> {
        self.db.get(collection.name()).and_then(|v| v.as_array())
    }

    fn commit(&mut self, next: Value) -> Result<(), StoreError> {
        let plaintext = serde_json::to_string(&next)?;
        let envelope = encrypt_text_with_key(plaintext.as_str(), self.salt.as_slice(), &self.key)?;
        let content = serde_json::to_string(&envelope)?;
        write_text_file(self.path.as_path(), content.as_str())?;
        self.db = next;
        Ok(())
    }
}

impl RecordStore for EncryptedFileStore {
    fn list(&self, collection: Collection, order: ListOrder) -> Result<Vec<Document>, StoreError> {
        let mut out: Vec<Document> = self
            .documents(collection)
            .map(|docs| docs.iter().filter_map(split_document).collect())
            .unwrap_or_default();

        match order {
            ListOrder::Stored => {}
            ListOrder::Ascending(field) => {
                out.sort_by(|a, b| compare_field(a, b, field));
            }
            ListOrder::Descending(field) => {
                out.sort_by(|a, b| compare_field(b, a, field));
            }
        }
        Ok(out)
    }

    fn create(
        &mut self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let id = new_id();
        let mut next = self.db.clone();
        let mut stored = fields;
        stored.insert("id".to_string(), json!(id));
        documents_mut(&mut next, collection)?.push(Value::Object(stored));
        self.commit(next)?;
        Ok(id)
    }

    fn update(
        &mut self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut next = self.db.clone();
        let target = documents_mut(&mut next, collection)?
            .iter_mut()
            .filter_map(|doc| doc.as_object_mut())
            .find(|doc| doc.get("id").and_then(|v| v.as_str()) == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        for (key, value) in fields {
            if key != "id" {
                target.insert(key, value);
            }
        }
        self.commit(next)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut next = self.db.clone();
        let docs = documents_mut(&mut next, collection)?;
        let before = docs.len();
        docs.retain(|doc| doc.get("id").and_then(|v| v.as_str()) != Some(id));
        if docs.len() == before {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        self.commit(next)
    }
}

fn split_document(value: &Value) -> Option<Document> {
    let mut fields = value.as_object()?.clone();
    let id = match fields.remove("id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => {
            tracing::warn!("skipping stored document without an id");
            return None;
        }
    };
    Some(Document { id, fields })
}

fn documents_mut(db: &mut Value, collection: Collection) -> Result<&mut Vec<Value>, StoreError> {
    db.get_mut(collection.name())
        .and_then(|v| v.as_array_mut())
        .ok_or_else(|| StoreError::Unavailable(format!("{collection} collection missing")))
}

/// Documents missing the field sort first. Timestamp strings compare as
/// instants, other strings bytewise.
fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    match (a.fields.get(field), b.fields.get(field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => compare_values(left, right),
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            let l = l.as_f64().unwrap_or(0.0);
            let r = r.as_f64().unwrap_or(0.0);
            l.total_cmp(&r)
        }
        (Value::String(l), Value::String(r)) => {
            match (
                DateTime::parse_from_rfc3339(l.as_str()),
                DateTime::parse_from_rfc3339(r.as_str()),
            ) {
                (Ok(l), Ok(r)) => l.cmp(&r),
                _ => l.cmp(r),
            }
        }
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

fn default_db_value() -> Value {
    json!({
        "version": DB_VERSION,
        "students": [],
        "accessKeys": [],
        "bookmarks": [],
    })
}

fn ensure_db_shape_value(value: Value) -> Value {
    let mut out = value;
    let Some(obj) = out.as_object_mut() else {
        return default_db_value();
    };
    if !obj.get("version").is_some_and(|v| v.is_number()) {
        obj.insert("version".to_string(), json!(DB_VERSION));
    }
    for collection in ALL_COLLECTIONS {
        if !obj.get(collection.name()).is_some_and(|v| v.is_array()) {
            obj.insert(collection.name().to_string(), json!([]));
        }
    }
    out
}
