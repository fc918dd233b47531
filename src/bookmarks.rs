use std::collections::HashSet;

use chrono::Utc;

use crate::errors::StoreError;
use crate::model::{Bookmark, Candidate, Record};
use crate::store::{create_record, list_records, Collection, ListOrder, RecordStore};

/// Bookmarks held for one browsing session only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionBookmarks {
    ids: HashSet<String>,
}

impl SessionBookmarks {
    pub fn add(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Bookmarked members of `candidates`, in their order.
    pub fn select(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        candidates
            .iter()
            .filter(|candidate| self.contains(candidate.id.as_str()))
            .cloned()
            .collect()
    }
}

/// Snapshot of the shared bookmark collection.
///
/// A mutation touches the snapshot only once the store has accepted it, so
/// the snapshot never lags a write that went through. Re-reading the whole
/// collection is a separate [`PersistedBookmarks::refresh`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedBookmarks {
    bookmarks: Vec<Bookmark>,
}

impl PersistedBookmarks {
    pub fn load(store: &dyn RecordStore) -> Result<Self, StoreError> {
        let bookmarks = list_records::<Bookmark>(store, ListOrder::Stored)?;
        Ok(PersistedBookmarks { bookmarks })
    }

    pub fn refresh(&mut self, store: &dyn RecordStore) -> Result<(), StoreError> {
        *self = Self::load(store)?;
        Ok(())
    }

    pub fn add(
        &mut self,
        store: &mut dyn RecordStore,
        candidate: &Candidate,
    ) -> Result<String, StoreError> {
        let mut bookmark = Bookmark::for_candidate(candidate, Utc::now());
        let id = create_record(store, &bookmark)?;
        bookmark.set_id(id.clone());
        self.bookmarks.push(bookmark);
        Ok(id)
    }

    pub fn remove(
        &mut self,
        store: &mut dyn RecordStore,
        bookmark_id: &str,
    ) -> Result<(), StoreError> {
        store.delete(Collection::Bookmarks, bookmark_id)?;
        self.bookmarks.retain(|bookmark| bookmark.id != bookmark_id);
        Ok(())
    }

    pub fn all(&self) -> &[Bookmark] {
        self.bookmarks.as_slice()
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn is_bookmarked(&self, student_id: &str) -> bool {
        self.bookmark_for(student_id).is_some()
    }

    pub fn bookmark_for(&self, student_id: &str) -> Option<&Bookmark> {
        self.bookmarks
            .iter()
            .find(|bookmark| bookmark.student_id == student_id)
    }

    /// Candidates with at least one bookmark, in roster order.
    pub fn select(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        candidates
            .iter()
            .filter(|candidate| self.is_bookmarked(candidate.id.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_restores_the_set() {
        let mut set = SessionBookmarks::default();
        set.add("STU002");
        let before = set.clone();

        assert!(set.add("STU001"));
        assert!(set.contains("STU001"));
        assert!(!set.add("STU001"));
        assert!(set.remove("STU001"));

        assert_eq!(set, before);
        assert!(!set.contains("STU001"));
    }

    #[test]
    fn select_keeps_roster_order() {
        let pool = crate::roster::sample_candidates().unwrap();
        let mut set = SessionBookmarks::default();
        set.add("STU005");
        set.add("STU001");
        set.add("missing");
        let picked: Vec<String> = set.select(&pool).into_iter().map(|c| c.id).collect();
        assert_eq!(picked, vec!["STU001", "STU005"]);
    }
}
