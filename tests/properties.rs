use proptest::prelude::*;
use roster_tauri::filter::{compare_by, filter_and_sort, SearchScope, SortKey};
use roster_tauri::keys::{is_valid_key, lookup_key, validate_key, ACCESS_KEYS};
use roster_tauri::model::Candidate;
use roster_tauri::roster::resolve;
use std::cmp::Ordering;

fn candidate(id: usize, name: String, domain: &str, gpa: Option<f64>) -> Candidate {
    Candidate {
        id: format!("C{id:03}"),
        name,
        domain: domain.to_string(),
        skills: vec!["Python".to_string(), "React".to_string()],
        resume_url: String::new(),
        linkedin: String::new(),
        github: String::new(),
        ai_summary: String::new(),
        location: None,
        graduation_year: None,
        gpa,
        projects: None,
    }
}

fn pool_strategy() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec(
        (
            "[A-Za-z]{1,8}( [A-Za-z]{1,8})?",
            prop::sample::select(vec!["DS", "WD", "ML", "UI", "BE", "QA"]),
            prop::option::of(0.0f64..4.0),
        ),
        0..24,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, domain, gpa))| candidate(i, name, domain, gpa))
            .collect()
    })
}

fn key_strategy() -> impl Strategy<Value = String> {
    let known: Vec<String> = ACCESS_KEYS.iter().map(|(key, _)| key.to_string()).collect();
    prop_oneof![prop::sample::select(known), "[A-Z]{2}[0-9]{4}"]
}

proptest! {
    #[test]
    fn well_formed_keys_validate_in_any_case(key in "[a-zA-Z]{2}[0-9]{4}", pad in " {0,3}") {
        let raw = format!("{pad}{key}{pad}");
        prop_assert!(is_valid_key(raw.as_str()));
        prop_assert_eq!(validate_key(raw.as_str()), Ok(key.to_uppercase()));
    }

    #[test]
    fn wrong_length_never_validates(raw in "[A-Za-z0-9]{0,5}|[A-Za-z0-9]{7,12}") {
        prop_assert!(!is_valid_key(raw.as_str()));
    }

    #[test]
    fn resolved_slice_respects_domain_and_count(key in key_strategy(), pool in pool_strategy()) {
        let roster = resolve(key.as_str(), &pool);
        match lookup_key(key.as_str()) {
            None => prop_assert!(roster.candidates.is_empty()),
            Some(config) => {
                let in_domain = pool.iter().filter(|c| c.domain == config.domain).count();
                prop_assert!(roster.candidates.iter().all(|c| c.domain == config.domain));
                prop_assert!(roster.candidates.len() <= config.count);
                prop_assert_eq!(roster.candidates.len(), in_domain.min(config.count));
            }
        }
    }

    #[test]
    fn filtering_is_idempotent_and_pure(
        pool in pool_strategy(),
        search in "[a-z]{0,3}",
        sort in prop::sample::select(
            vec![SortKey::Name, SortKey::Domain, SortKey::Gpa, SortKey::Recent],
        ),
    ) {
        let before = pool.clone();
        let once = filter_and_sort(&pool, search.as_str(), None, sort, SearchScope::Full);
        let twice = filter_and_sort(&once, search.as_str(), None, sort, SearchScope::Full);
        prop_assert_eq!(&pool, &before);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn gpa_order_is_total_and_descending(pool in pool_strategy()) {
        let sorted = filter_and_sort(&pool, "", None, SortKey::Gpa, SearchScope::Full);
        for pair in sorted.windows(2) {
            prop_assert_ne!(compare_by(&pair[0], &pair[1], SortKey::Gpa), Ordering::Greater);
            prop_assert!(pair[0].gpa.unwrap_or(0.0) >= pair[1].gpa.unwrap_or(0.0));
        }
    }
}
