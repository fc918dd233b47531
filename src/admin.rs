//! Admin screen: maintain the student roster and the access key records.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{badge_for, Domain, DomainBadge, KNOWN_DOMAINS};
use crate::errors::{FlowError, FormError, StoreError};
use crate::model::{AccessKeyDraft, AccessKeyRecord, Candidate, CandidateDraft, Record};
use crate::notice::Notice;
use crate::store::{create_record, list_records, Collection, ListOrder, RecordStore};

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

#[derive(Debug, Clone, Default)]
pub struct AdminFlow {
    candidates: Vec<Candidate>,
    access_keys: Vec<AccessKeyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_students: usize,
    pub active_keys: usize,
    pub total_keys: usize,
    pub domains: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminView {
    pub stats: AdminStats,
    /// Choices for the domain select of both forms.
    pub domain_options: Vec<DomainBadge>,
    pub candidates: Vec<Candidate>,
    pub access_keys: Vec<AccessKeyRecord>,
}

fn now_value() -> Value {
    Value::String(Utc::now().to_rfc3339())
}

fn stamped(
    fields: Result<Map<String, Value>, StoreError>,
    stamps: &[&str],
) -> Result<Map<String, Value>, FlowError> {
    let mut fields = fields.map_err(|err| FlowError::store("Failed to save student", err))?;
    let now = now_value();
    for stamp in stamps {
        fields.insert((*stamp).to_string(), now.clone());
    }
    Ok(fields)
}

fn warn_unknown_domain(candidate: &Candidate) {
    if !Domain::from_code(candidate.domain.as_str()).is_known() {
        tracing::warn!(domain = %candidate.domain, "saving student with an unknown domain code");
    }
}

impl AdminFlow {
    /// Reloads both lists. Each list keeps its previous contents if its own
    /// read fails; the first failure is reported.
    pub fn load(&mut self, store: &dyn RecordStore) -> Result<(), FlowError> {
        let students = self.load_candidates(store);
        let keys = self.load_access_keys(store);
        students.and(keys)
    }

    pub fn load_candidates(&mut self, store: &dyn RecordStore) -> Result<(), FlowError> {
        let candidates = list_records::<Candidate>(store, ListOrder::Ascending("name"))
            .map_err(|err| {
                tracing::error!(error = %err, "failed to fetch students");
                FlowError::store("Failed to fetch students", err)
            })?;
        self.candidates = candidates;
        Ok(())
    }

    pub fn load_access_keys(&mut self, store: &dyn RecordStore) -> Result<(), FlowError> {
        let keys = list_records::<AccessKeyRecord>(store, ListOrder::Descending(CREATED_AT))
            .map_err(|err| {
                tracing::error!(error = %err, "failed to fetch access keys");
                FlowError::store("Failed to fetch access keys", err)
            })?;
        self.access_keys = keys;
        Ok(())
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_slice()
    }

    pub fn access_keys(&self) -> &[AccessKeyRecord] {
        self.access_keys.as_slice()
    }

    /// Appends to the in-memory list; the name order is restored on the next load.
    pub fn add_candidate(
        &mut self,
        store: &mut dyn RecordStore,
        draft: CandidateDraft,
    ) -> Result<Notice, FlowError> {
        if !draft.has_required_fields() {
            return Err(FormError::Required("Name and domain are required").into());
        }
        let mut candidate = draft.into_candidate();
        warn_unknown_domain(&candidate);
        let fields = stamped(candidate.to_fields(), &[CREATED_AT, UPDATED_AT])?;
        let id = store.create(Collection::Students, fields).map_err(|err| {
            tracing::error!(error = %err, "failed to add student");
            FlowError::store("Failed to add student", err)
        })?;
        tracing::info!(id = %id, name = %candidate.name, "student added");
        candidate.set_id(id);
        self.candidates.push(candidate);
        Ok(Notice::info("Success", "Student added successfully"))
    }

    pub fn update_candidate(
        &mut self,
        store: &mut dyn RecordStore,
        id: &str,
        draft: CandidateDraft,
    ) -> Result<Notice, FlowError> {
        if !draft.has_required_fields() {
            return Err(FormError::Required("Name and domain are required").into());
        }
        let mut candidate = draft.into_candidate();
        warn_unknown_domain(&candidate);
        let fields = stamped(candidate.update_fields(), &[UPDATED_AT])?;
        store
            .update(Collection::Students, id, fields)
            .map_err(|err| {
                tracing::error!(error = %err, id, "failed to update student");
                FlowError::store("Failed to update student", err)
            })?;
        candidate.set_id(id.to_string());
        if let Some(slot) = self.candidates.iter_mut().find(|c| c.id == id) {
            *slot = candidate;
        }
        Ok(Notice::info("Success", "Student updated successfully"))
    }

    pub fn delete_candidate(
        &mut self,
        store: &mut dyn RecordStore,
        id: &str,
    ) -> Result<Notice, FlowError> {
        store.delete(Collection::Students, id).map_err(|err| {
            tracing::error!(error = %err, id, "failed to delete student");
            FlowError::store("Failed to delete student", err)
        })?;
        self.candidates.retain(|c| c.id != id);
        Ok(Notice::info("Success", "Student deleted successfully"))
    }

    /// New keys start active with no recorded use and go to the top of the list.
    pub fn add_access_key(
        &mut self,
        store: &mut dyn RecordStore,
        draft: AccessKeyDraft,
    ) -> Result<Notice, FlowError> {
        if draft.key.trim().is_empty() || draft.description.trim().is_empty() {
            return Err(FormError::Required("Key and description are required").into());
        }
        let mut record = AccessKeyRecord {
            id: String::new(),
            key: draft.key,
            domain: draft.domain,
            count: draft.count,
            description: draft.description,
            is_active: true,
            created_at: Utc::now(),
            usage_count: 0,
        };
        let id = create_record(store, &record).map_err(|err| {
            tracing::error!(error = %err, "failed to add access key");
            FlowError::store("Failed to add access key", err)
        })?;
        record.set_id(id);
        self.access_keys.insert(0, record);
        Ok(Notice::info("Success", "Access key added successfully"))
    }

    pub fn set_access_key_active(
        &mut self,
        store: &mut dyn RecordStore,
        id: &str,
        is_active: bool,
    ) -> Result<Notice, FlowError> {
        let mut fields = Map::new();
        fields.insert("isActive".to_string(), Value::Bool(is_active));
        store
            .update(Collection::AccessKeys, id, fields)
            .map_err(|err| {
                tracing::error!(error = %err, id, "failed to update access key");
                FlowError::store("Failed to update access key", err)
            })?;
        if let Some(record) = self.access_keys.iter_mut().find(|k| k.id == id) {
            record.is_active = is_active;
        }
        let state = if is_active { "activated" } else { "deactivated" };
        Ok(Notice::info("Success", format!("Access key {state}")))
    }

    pub fn delete_access_key(
        &mut self,
        store: &mut dyn RecordStore,
        id: &str,
    ) -> Result<Notice, FlowError> {
        store.delete(Collection::AccessKeys, id).map_err(|err| {
            tracing::error!(error = %err, id, "failed to delete access key");
            FlowError::store("Failed to delete access key", err)
        })?;
        self.access_keys.retain(|k| k.id != id);
        Ok(Notice::info("Success", "Access key deleted successfully"))
    }

    pub fn stats(&self) -> AdminStats {
        let domains: HashSet<&str> = self
            .candidates
            .iter()
            .map(|c| c.domain.as_str())
            .collect();
        AdminStats {
            total_students: self.candidates.len(),
            active_keys: self.access_keys.iter().filter(|k| k.is_active).count(),
            total_keys: self.access_keys.len(),
            domains: domains.len(),
        }
    }

    pub fn view(&self) -> AdminView {
        AdminView {
            stats: self.stats(),
            domain_options: KNOWN_DOMAINS
                .iter()
                .map(|domain| badge_for(domain.code()))
                .collect(),
            candidates: self.candidates.clone(),
            access_keys: self.access_keys.clone(),
        }
    }
}
