//! Key redemption: which slice of the roster a key unlocks.

use serde::Serialize;
use serde_json::Value;

use crate::errors::StoreError;
use crate::keys::{lookup_key, normalize_key};
use crate::model::{Candidate, Record};
use crate::store::{Collection, Document};

const SAMPLE_ROSTER: &str = include_str!("sample_roster.json");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRoster {
    pub key: String,
    /// `None` when the key is not in the table.
    pub description: Option<&'static str>,
    pub candidates: Vec<Candidate>,
}

impl ResolvedRoster {
    /// A provisioned key that matches nobody unlocks nothing either.
    pub fn is_unlocked(&self) -> bool {
        self.description.is_some() && !self.candidates.is_empty()
    }
}

/// Candidates of the key's domain, in pool order, cut to the key's count.
/// Unknown keys yield an empty list whatever their shape.
pub fn resolve(key: &str, pool: &[Candidate]) -> ResolvedRoster {
    let key = normalize_key(key);
    let Some(config) = lookup_key(key.as_str()) else {
        return ResolvedRoster {
            key,
            description: None,
            candidates: Vec::new(),
        };
    };

    let candidates = pool
        .iter()
        .filter(|candidate| candidate.domain == config.domain)
        .take(config.count)
        .cloned()
        .collect();

    ResolvedRoster {
        key,
        description: Some(config.description),
        candidates,
    }
}

/// The bundled demo roster, decoded through the same schema check as
/// stored records.
pub fn sample_candidates() -> Result<Vec<Candidate>, StoreError> {
    let values: Vec<Value> = serde_json::from_str(SAMPLE_ROSTER)?;
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let Value::Object(mut fields) = value else {
                return Err(StoreError::Schema {
                    collection: Collection::Students,
                    id: format!("sample-{}", idx + 1),
                    detail: "expected an object".to_string(),
                });
            };
            let id = match fields.remove("id") {
                Some(Value::String(id)) => id,
                _ => format!("sample-{}", idx + 1),
            };
            Candidate::from_document(&Document { id, fields })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(roster: &ResolvedRoster) -> Vec<&str> {
        roster.candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn sample_roster_decodes() {
        let pool = sample_candidates().unwrap();
        assert_eq!(pool.len(), 8);
        assert_eq!(pool[0].id, "STU001");
        assert_eq!(pool[0].gpa, Some(3.8));
    }

    #[test]
    fn lowercase_key_unlocks_data_science_slice() {
        let pool = sample_candidates().unwrap();
        let roster = resolve("ds2006", &pool);
        assert!(roster.is_unlocked());
        assert_eq!(roster.key, "DS2006");
        assert_eq!(roster.description, Some("Data Science Profiles"));
        assert_eq!(ids(&roster), vec!["STU001", "STU005"]);
    }

    #[test]
    fn count_limit_truncates_in_pool_order() {
        let mut pool = sample_candidates().unwrap();
        let template = pool[2].clone();
        for n in 0..6 {
            let mut extra = template.clone();
            extra.id = format!("ML-{n}");
            pool.push(extra);
        }
        let roster = resolve("ML0504", &pool);
        assert_eq!(ids(&roster), vec!["STU003", "STU008", "ML-0", "ML-1"]);
    }

    #[test]
    fn unknown_keys_resolve_to_nothing() {
        let pool = sample_candidates().unwrap();
        for key in ["DS2007", "not a key", ""] {
            let roster = resolve(key, &pool);
            assert!(roster.candidates.is_empty());
            assert_eq!(roster.description, None);
            assert!(!roster.is_unlocked());
        }
    }

    #[test]
    fn provisioned_key_with_empty_domain_is_not_unlocked() {
        let pool: Vec<Candidate> = sample_candidates()
            .unwrap()
            .into_iter()
            .filter(|c| c.domain != "BE")
            .collect();
        let roster = resolve("BE0708", &pool);
        assert_eq!(roster.description, Some("Backend Engineering Profiles"));
        assert!(!roster.is_unlocked());
    }
}
