mod common;

use common::{open_state, FailingStore};
use pretty_assertions::assert_eq;
use roster_tauri::export::EXPORT_HEADER;
use roster_tauri::filter::{FilterState, SortKey};
use roster_tauri::home::HomeFlow;
use tempfile::TempDir;

#[test]
fn lowercase_key_unlocks_the_seeded_data_science_slice() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);
    let notice = app.home.submit_key("  ds2006 ", &app.store).unwrap();
    assert_eq!(notice.title, "Profiles Unlocked!");
    assert_eq!(
        notice.description,
        "2 data science profiles unlocked successfully."
    );

    let view = app.home.view();
    assert_eq!(view.access_key.as_deref(), Some("DS2006"));
    assert_eq!(view.description, Some("Data Science Profiles"));
    let ids: Vec<&str> = view.listing.shown.iter().map(|c| c.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["STU001", "STU005"]);
}

#[test]
fn malformed_and_unknown_keys_are_told_apart() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);

    let err = app.home.submit_key("DS20", &app.store).unwrap_err();
    assert_eq!(
        err.notice().description,
        "Please enter a valid access key (format: AB1234)"
    );

    let err = app.home.submit_key("QQ9999", &app.store).unwrap_err();
    let notice = err.notice();
    assert_eq!(notice.title, "Invalid Access Key");
    assert_eq!(
        notice.description,
        "The access key you entered is not valid or has expired."
    );
    assert!(notice.is_error());
    assert!(!app.home.is_unlocked());
}

#[test]
fn store_failure_keeps_the_prompt() {
    let mut home = HomeFlow::default();
    let err = home.submit_key("DS2006", &FailingStore).unwrap_err();
    assert_eq!(err.notice().title, "Error");
    assert!(!home.is_unlocked());
}

#[test]
fn bookmark_filter_and_export_round() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);
    app.home.submit_key("WD1010", &app.store).unwrap();

    let empty = app.home.export_bookmarked(100);
    assert_eq!(empty.export(), None);
    assert_eq!(
        empty.notice().description,
        "Please bookmark some profiles first."
    );

    let notice = app.home.set_bookmark("STU007", true).unwrap();
    assert_eq!(notice.title, "Profile Bookmarked");
    assert_eq!(app.home.view().bookmarked_count, 1);

    app.home.set_filter(FilterState {
        search: "react".to_string(),
        sort: SortKey::Gpa,
        ..FilterState::default()
    });
    let view = app.home.view();
    assert_eq!(view.listing.total, 2);
    assert_eq!(view.listing.shown.len(), 1);
    assert_eq!(view.listing.shown[0].candidate.name, "Alex Rodriguez");
    assert!(!view.listing.shown[0].bookmarked);

    let outcome = app.home.export_bookmarked(100);
    let export = outcome.export().unwrap();
    assert_eq!(export.filename, "smarted-bookmarked-profiles-WD1010.csv");
    let lines: Vec<&str> = export.content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], EXPORT_HEADER);
    assert!(lines[1].starts_with("\"Jessica Liu\",\"WD\""));
}

#[test]
fn reset_clears_key_bookmarks_and_filter() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);
    app.home.submit_key("ML0504", &app.store).unwrap();
    app.home.set_bookmark("STU003", true);
    app.home.set_filter(FilterState {
        search: "nlp".to_string(),
        ..FilterState::default()
    });

    app.home.reset();
    let view = app.home.view();
    assert_eq!(view.access_key, None);
    assert_eq!(view.bookmarked_count, 0);
    assert_eq!(view.listing.total, 0);
    assert_eq!(view.listing.filter, FilterState::default());
}
