//! Visitor screen: redeem a key, browse the unlocked slice, export bookmarks.

use serde::Serialize;

use crate::bookmarks::SessionBookmarks;
use crate::errors::{AccessError, FlowError};
use crate::export::{build_export, home_export_filename, ExportOutcome};
use crate::filter::FilterState;
use crate::keys::validate_key;
use crate::model::Candidate;
use crate::notice::Notice;
use crate::roster::resolve;
use crate::store::{list_records, ListOrder, RecordStore};
use crate::view::{build_listing, Listing};

const EMPTY_EXPORT_HINT: &str = "Please bookmark some profiles first.";

#[derive(Debug, Clone, Default)]
pub struct HomeFlow {
    access_key: Option<String>,
    description: Option<&'static str>,
    unlocked: Vec<Candidate>,
    bookmarks: SessionBookmarks,
    filter: FilterState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub access_key: Option<String>,
    pub description: Option<&'static str>,
    pub bookmarked_count: usize,
    pub listing: Listing,
}

impl HomeFlow {
    /// Validates and redeems `raw` against the stored roster.
    pub fn submit_key(
        &mut self,
        raw: &str,
        store: &dyn RecordStore,
    ) -> Result<Notice, FlowError> {
        let key = validate_key(raw)?;
        let pool = list_records::<Candidate>(store, ListOrder::Stored).map_err(|err| {
            tracing::error!(error = %err, "failed to load roster for key redemption");
            FlowError::store("Failed to load profiles", err)
        })?;
        self.unlock(key.as_str(), &pool)
    }

    /// Redeems an already-validated key against `pool`.
    pub fn unlock(&mut self, key: &str, pool: &[Candidate]) -> Result<Notice, FlowError> {
        let roster = resolve(key, pool);
        let Some(description) = roster.description.filter(|_| roster.is_unlocked()) else {
            tracing::debug!(key = %roster.key, "access key not provisioned");
            return Err(AccessError::NotProvisioned.into());
        };

        let count = roster.candidates.len();
        self.access_key = Some(roster.key);
        self.description = Some(description);
        self.unlocked = roster.candidates;
        self.bookmarks.clear();
        self.filter = FilterState::default();

        Ok(Notice::info(
            "Profiles Unlocked!",
            format!(
                "{count} {} unlocked successfully.",
                description.to_lowercase()
            ),
        ))
    }

    pub fn is_unlocked(&self) -> bool {
        self.access_key.is_some()
    }

    pub fn unlocked(&self) -> &[Candidate] {
        self.unlocked.as_slice()
    }

    pub fn bookmarks(&self) -> &SessionBookmarks {
        &self.bookmarks
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Ids outside the unlocked slice are ignored.
    pub fn set_bookmark(&mut self, candidate_id: &str, bookmarked: bool) -> Option<Notice> {
        if !self.unlocked.iter().any(|c| c.id == candidate_id) {
            return None;
        }
        if bookmarked {
            self.bookmarks.add(candidate_id);
            Some(Notice::info(
                "Profile Bookmarked",
                "Student profile added to your bookmarks.",
            ))
        } else {
            self.bookmarks.remove(candidate_id);
            Some(Notice::info(
                "Bookmark Removed",
                "Student profile removed from bookmarks.",
            ))
        }
    }

    pub fn export_bookmarked(&self, row_limit: usize) -> ExportOutcome {
        let selected = self.bookmarks.select(&self.unlocked);
        let key = self.access_key.as_deref().unwrap_or("session");
        build_export(&selected, home_export_filename(key), row_limit, EMPTY_EXPORT_HINT)
    }

    /// Back to the key prompt.
    pub fn reset(&mut self) {
        *self = HomeFlow::default();
    }

    pub fn view(&self) -> HomeView {
        HomeView {
            access_key: self.access_key.clone(),
            description: self.description,
            bookmarked_count: self.bookmarks.len(),
            listing: build_listing(&self.unlocked, &self.filter, |id| {
                self.bookmarks.contains(id)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::sample_candidates;

    #[test]
    fn unlock_reports_count_and_description() {
        let pool = sample_candidates().unwrap();
        let mut home = HomeFlow::default();
        let notice = home.unlock("DS2006", &pool).unwrap();
        assert_eq!(notice.title, "Profiles Unlocked!");
        assert_eq!(
            notice.description,
            "2 data science profiles unlocked successfully."
        );
        assert_eq!(home.view().listing.total, 2);
    }

    #[test]
    fn unprovisioned_key_leaves_state_alone() {
        let pool = sample_candidates().unwrap();
        let mut home = HomeFlow::default();
        home.unlock("WD1010", &pool).unwrap();
        let err = home.unlock("XX0000", &pool).unwrap_err();
        assert_eq!(err.notice().title, "Invalid Access Key");
        assert_eq!(home.view().access_key.as_deref(), Some("WD1010"));
    }

    #[test]
    fn bookmarks_outside_the_slice_are_ignored() {
        let pool = sample_candidates().unwrap();
        let mut home = HomeFlow::default();
        home.unlock("DS2006", &pool).unwrap();
        assert!(home.set_bookmark("STU002", true).is_none());
        assert!(home.bookmarks().is_empty());
    }
}
