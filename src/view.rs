use serde::Serialize;

use crate::domain::{badge_for, DomainBadge};
use crate::filter::{distinct_domains, FilterState};
use crate::model::Candidate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateCard {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub badge: DomainBadge,
    pub initials: String,
    pub bookmarked: bool,
}

/// One render of a candidate list: "showing `shown.len()` of `total`".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub shown: Vec<CandidateCard>,
    pub total: usize,
    pub domains: Vec<DomainBadge>,
    pub filter: FilterState,
}

pub fn build_listing(
    candidates: &[Candidate],
    filter: &FilterState,
    is_bookmarked: impl Fn(&str) -> bool,
) -> Listing {
    let shown = filter
        .apply(candidates)
        .into_iter()
        .map(|candidate| CandidateCard {
            badge: candidate.badge(),
            initials: candidate.initials(),
            bookmarked: is_bookmarked(candidate.id.as_str()),
            candidate,
        })
        .collect();
    Listing {
        shown,
        total: candidates.len(),
        domains: distinct_domains(candidates)
            .iter()
            .map(|code| badge_for(code))
            .collect(),
        filter: filter.clone(),
    }
}
