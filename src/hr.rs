//! HR screen: the whole roster, a shared bookmark list, and export.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::bookmarks::PersistedBookmarks;
use crate::errors::{FlowError, StoreError};
use crate::export::{build_export, hr_export_filename, ExportOutcome};
use crate::filter::{FilterState, SearchScope};
use crate::model::Candidate;
use crate::notice::Notice;
use crate::store::{list_records, Collection, ListOrder, RecordStore};
use crate::view::{build_listing, Listing};

const EMPTY_EXPORT_HINT: &str = "You don't have any bookmarked profiles to export.";

// TODO: scope bookmarks to the signed-in account once the store records an
// owner per bookmark; today every HR user shares one list.
#[derive(Debug, Clone)]
pub struct HrFlow {
    candidates: Vec<Candidate>,
    bookmarks: PersistedBookmarks,
    filter: FilterState,
}

impl Default for HrFlow {
    fn default() -> Self {
        HrFlow {
            candidates: Vec::new(),
            bookmarks: PersistedBookmarks::default(),
            filter: FilterState {
                scope: SearchScope::NameAndSkills,
                ..FilterState::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrStats {
    pub total_candidates: usize,
    pub bookmarks: usize,
    /// One decimal, "0.0" for an empty roster.
    pub average_gpa: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrView {
    pub stats: HrStats,
    pub listing: Listing,
}

impl HrFlow {
    /// Re-reads roster and bookmarks. On failure the previous snapshot stays.
    pub fn load(&mut self, store: &dyn RecordStore) -> Result<(), FlowError> {
        let fetched = list_records::<Candidate>(store, ListOrder::Stored).and_then(|candidates| {
            PersistedBookmarks::load(store).map(|bookmarks| (candidates, bookmarks))
        });
        match fetched {
            Ok((candidates, bookmarks)) => {
                self.candidates = candidates;
                self.bookmarks = bookmarks;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch HR data");
                Err(FlowError::store("Failed to fetch data. Please try again.", err))
            }
        }
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = FilterState {
            scope: SearchScope::NameAndSkills,
            ..filter
        };
    }

    pub fn bookmarks(&self) -> &PersistedBookmarks {
        &self.bookmarks
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_slice()
    }

    /// Bookmarks the candidate if unmarked, otherwise removes its bookmark.
    pub fn toggle_bookmark(
        &mut self,
        store: &mut dyn RecordStore,
        candidate_id: &str,
    ) -> Result<Notice, FlowError> {
        if let Some(existing) = self.bookmarks.bookmark_for(candidate_id) {
            let bookmark_id = existing.id.clone();
            return self.remove_bookmark(store, bookmark_id.as_str());
        }
        let Some(candidate) = self.candidates.iter().find(|c| c.id == candidate_id).cloned() else {
            let missing = StoreError::NotFound {
                collection: Collection::Students,
                id: candidate_id.to_string(),
            };
            return Err(FlowError::store("Failed to add bookmark.", missing));
        };
        self.add_bookmark(store, &candidate)
    }

    pub fn add_bookmark(
        &mut self,
        store: &mut dyn RecordStore,
        candidate: &Candidate,
    ) -> Result<Notice, FlowError> {
        self.bookmarks.add(store, candidate).map_err(|err| {
            tracing::error!(error = %err, candidate = %candidate.id, "failed to add bookmark");
            FlowError::store("Failed to add bookmark.", err)
        })?;
        self.refresh_bookmarks(store)?;
        Ok(Notice::info(
            "Bookmark Added",
            format!("{} has been bookmarked.", candidate.name),
        ))
    }

    pub fn remove_bookmark(
        &mut self,
        store: &mut dyn RecordStore,
        bookmark_id: &str,
    ) -> Result<Notice, FlowError> {
        self.bookmarks.remove(store, bookmark_id).map_err(|err| {
            tracing::error!(error = %err, bookmark = bookmark_id, "failed to remove bookmark");
            FlowError::store("Failed to remove bookmark.", err)
        })?;
        self.refresh_bookmarks(store)?;
        Ok(Notice::info("Bookmark Removed", "Bookmark has been removed."))
    }

    /// Re-reads bookmarks after a write that already went through. A failure
    /// here is a fetch failure; the local snapshot already reflects the write.
    fn refresh_bookmarks(&mut self, store: &dyn RecordStore) -> Result<(), FlowError> {
        self.bookmarks.refresh(store).map_err(|err| {
            tracing::error!(error = %err, "failed to refresh bookmarks");
            FlowError::store("Failed to fetch data. Please try again.", err)
        })
    }

    pub fn export_bookmarks(&self, today: NaiveDate, row_limit: usize) -> ExportOutcome {
        let selected = self.bookmarks.select(&self.candidates);
        build_export(&selected, hr_export_filename(today), row_limit, EMPTY_EXPORT_HINT)
    }

    pub fn export_bookmarks_today(&self, row_limit: usize) -> ExportOutcome {
        self.export_bookmarks(Utc::now().date_naive(), row_limit)
    }

    pub fn stats(&self) -> HrStats {
        let average_gpa = if self.candidates.is_empty() {
            0.0
        } else {
            let sum: f64 = self.candidates.iter().map(|c| c.gpa.unwrap_or(0.0)).sum();
            sum / self.candidates.len() as f64
        };
        HrStats {
            total_candidates: self.candidates.len(),
            bookmarks: self.bookmarks.len(),
            average_gpa: format!("{average_gpa:.1}"),
        }
    }

    pub fn view(&self) -> HrView {
        HrView {
            stats: self.stats(),
            listing: build_listing(&self.candidates, &self.filter, |id| {
                self.bookmarks.is_bookmarked(id)
            }),
        }
    }
}
