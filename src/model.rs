//! Typed records read from and written to the record store.
//!
//! Every document passes through [`Record::from_document`] on the way in, so
//! a missing or mistyped field surfaces as [`StoreError::Schema`] instead of a
//! half-filled struct.

use chrono::{DateTime, Datelike, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{badge_for, DomainBadge};
use crate::errors::StoreError;
use crate::store::{Collection, Document};

pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn from_document(document: &Document) -> Result<Self, StoreError> {
        let mut record: Self = serde_json::from_value(Value::Object(document.fields.clone()))
            .map_err(|err| StoreError::Schema {
                collection: Self::COLLECTION,
                id: document.id.clone(),
                detail: err.to_string(),
            })?;
        record.set_id(document.id.clone());
        Ok(record)
    }

    /// Stored fields, without the id (the store owns ids).
    fn to_fields(&self) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(self)? {
            Value::Object(mut fields) => {
                fields.remove("id");
                Ok(fields)
            }
            _ => Err(StoreError::Schema {
                collection: Self::COLLECTION,
                id: self.id().to_string(),
                detail: "record did not serialize to an object".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_deserializing)]
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub resume_url: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub ai_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<u32>,
}

/// Optional candidate fields. Left out of a stored document when unset.
pub const CANDIDATE_OPTIONAL_FIELDS: [&str; 4] = ["location", "graduation_year", "gpa", "projects"];

impl Candidate {
    /// Fields for a merge update. Unset optional fields are written as
    /// `null` so a cleared value replaces the stored one.
    pub fn update_fields(&self) -> Result<Map<String, Value>, StoreError> {
        let mut fields = self.to_fields()?;
        for field in CANDIDATE_OPTIONAL_FIELDS {
            fields.entry(field).or_insert(Value::Null);
        }
        Ok(fields)
    }

    pub fn badge(&self) -> DomainBadge {
        badge_for(self.domain.as_str())
    }

    /// Up to two initials for the avatar tile.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect()
    }

    /// Outbound links worth opening, in card order.
    pub fn links(&self) -> Vec<&str> {
        [
            self.resume_url.as_str(),
            self.linkedin.as_str(),
            self.github.as_str(),
        ]
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .collect()
    }
}

impl Record for Candidate {
    const COLLECTION: Collection = Collection::Students;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Admin-managed key document. Not consulted by key redemption, which reads
/// the built-in table in [`crate::keys`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyRecord {
    #[serde(default, skip_deserializing)]
    pub id: String,
    pub key: String,
    pub domain: String,
    pub count: u32,
    pub description: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "usageCount", default)]
    pub usage_count: u32,
}

impl Record for AccessKeyRecord {
    const COLLECTION: Collection = Collection::AccessKeys;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "studentName")]
    pub student_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Bookmark {
    pub fn for_candidate(candidate: &Candidate, created_at: DateTime<Utc>) -> Self {
        Bookmark {
            id: String::new(),
            student_id: candidate.id.clone(),
            student_name: candidate.name.clone(),
            created_at,
            notes: Some(String::new()),
        }
    }
}

impl Record for Bookmark {
    const COLLECTION: Collection = Collection::Bookmarks;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Access key form contents before it becomes a record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccessKeyDraft {
    pub key: String,
    pub domain: String,
    pub count: u32,
    pub description: String,
}

impl Default for AccessKeyDraft {
    fn default() -> Self {
        AccessKeyDraft {
            key: String::new(),
            domain: "DS".to_string(),
            count: 5,
            description: String::new(),
        }
    }
}

/// Student form contents. Skills arrive as the raw comma-separated text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CandidateDraft {
    pub name: String,
    pub domain: String,
    pub skills: String,
    pub location: String,
    pub graduation_year: i32,
    pub gpa: f64,
    pub projects: u32,
    pub ai_summary: String,
    pub linkedin: String,
    pub github: String,
    pub resume_url: String,
}

impl Default for CandidateDraft {
    fn default() -> Self {
        CandidateDraft {
            name: String::new(),
            domain: "DS".to_string(),
            skills: String::new(),
            location: String::new(),
            graduation_year: Utc::now().year(),
            gpa: 0.0,
            projects: 0,
            ai_summary: String::new(),
            linkedin: String::new(),
            github: String::new(),
            resume_url: String::new(),
        }
    }
}

impl CandidateDraft {
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty() && !self.domain.trim().is_empty()
    }

    pub fn into_candidate(self) -> Candidate {
        let location = self.location.trim().to_string();
        Candidate {
            id: String::new(),
            name: self.name.trim().to_string(),
            domain: self.domain.trim().to_string(),
            skills: parse_skills(self.skills.as_str()),
            resume_url: self.resume_url,
            linkedin: self.linkedin,
            github: self.github,
            ai_summary: self.ai_summary,
            location: (!location.is_empty()).then_some(location),
            graduation_year: Some(self.graduation_year),
            gpa: Some(self.gpa),
            projects: Some(self.projects),
        }
    }
}

/// Splits the comma-separated skills field of the admin form.
pub fn parse_skills(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|skill| skill.trim())
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}
