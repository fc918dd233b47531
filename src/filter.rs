//! Search, domain filter and sort over an in-memory candidate list.
//!
//! Everything here is recomputed from scratch on each input change; the
//! lists are one key's worth of candidates, so there is no index.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Candidate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Domain,
    Gpa,
    Recent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Which candidate text a search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Name, skills and summary.
    #[default]
    Full,
    NameAndSkills,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    pub domain: Option<String>,
    pub sort: SortKey,
    pub view: ViewMode,
    pub scope: SearchScope,
}

impl FilterState {
    /// Candidates to render, in display order. Never touches `candidates`.
    pub fn apply(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        filter_and_sort(
            candidates,
            self.search.as_str(),
            self.domain.as_deref(),
            self.sort,
            self.scope,
        )
    }
}

pub fn filter_and_sort(
    candidates: &[Candidate],
    search: &str,
    domain: Option<&str>,
    sort: SortKey,
    scope: SearchScope,
) -> Vec<Candidate> {
    let needle = search.to_lowercase();
    let mut out: Vec<Candidate> = candidates
        .iter()
        .filter(|candidate| needle.is_empty() || matches_search(candidate, needle.as_str(), scope))
        .filter(|candidate| domain.map_or(true, |code| candidate.domain == code))
        .cloned()
        .collect();
    out.sort_by(|a, b| compare_by(a, b, sort));
    out
}

fn matches_search(candidate: &Candidate, needle: &str, scope: SearchScope) -> bool {
    if candidate.name.to_lowercase().contains(needle) {
        return true;
    }
    if candidate
        .skills
        .iter()
        .any(|skill| skill.to_lowercase().contains(needle))
    {
        return true;
    }
    scope == SearchScope::Full && candidate.ai_summary.to_lowercase().contains(needle)
}

pub fn compare_by(a: &Candidate, b: &Candidate, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Name => locale_cmp(a.name.as_str(), b.name.as_str()),
        SortKey::Domain => a.domain.cmp(&b.domain),
        SortKey::Gpa => b.gpa.unwrap_or(0.0).total_cmp(&a.gpa.unwrap_or(0.0)),
        SortKey::Recent => b
            .graduation_year
            .unwrap_or(0)
            .cmp(&a.graduation_year.unwrap_or(0)),
    }
}

/// Case folds first so "adam" sits next to "Adam"; ties break on the raw
/// text to keep the order total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Distinct domain codes in first-seen order, for the filter chips.
pub fn distinct_domains(candidates: &[Candidate]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for candidate in candidates {
        if !out.iter().any(|code| code == &candidate.domain) {
            out.push(candidate.domain.clone());
        }
    }
    out
}
