//! Property tests for the query codec and the local evaluation pipeline.

use proptest::prelude::*;

use woogle::engine::facets::count_facets;
use woogle::engine::filter::filter;
use woogle::engine::paginate::{controls, paginate, total_pages};
use woogle::engine::sort::sort_dossiers;
use woogle::engine::{Dimension, FacetValue};
use woogle::models::{Dossier, TypeCode};
use woogle::query::{codec, SearchState, SortOrder};

// ============================================================================
// STRATEGIES
// ============================================================================

fn type_code() -> impl Strategy<Value = TypeCode> {
    prop_oneof![
        Just(TypeCode::from("2k")),
        Just(TypeCode::from("2i")),
        Just(TypeCode::from("2c")),
        Just(TypeCode::from("1e-i")),
    ]
}

fn dossier() -> impl Strategy<Value = Dossier> {
    (
        "[a-z]{1,6}",
        "[A-Za-zé ]{0,12}",
        type_code(),
        proptest::option::of(2015i32..2025),
        proptest::option::of((1u32..=12, 1u32..=28)),
    )
        .prop_map(|(id, title, type_code, year, date)| Dossier {
            id,
            title,
            type_code,
            year,
            published_date: date.map(|(m, d)| format!("2022-{:02}-{:02}", m, d)),
            ..Default::default()
        })
}

fn sort_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![
        Just(SortOrder::DateDesc),
        Just(SortOrder::DateAsc),
        Just(SortOrder::TitleDesc),
        Just(SortOrder::TitleAsc),
        Just(SortOrder::RelevanceDesc),
        Just(SortOrder::RelevanceAsc),
        Just(SortOrder::TypeDesc),
        Just(SortOrder::TypeAsc),
        "[a-z]{1,5}-size".prop_map(SortOrder::Other),
    ]
}

fn state() -> impl Strategy<Value = SearchState> {
    (
        "[a-zA-Z0-9 &=%+é\"]{0,10}",
        proptest::option::of(type_code()),
        proptest::option::of(2015i32..2025),
        proptest::option::of(sort_order()),
        1u32..50,
    )
        .prop_map(|(query, type_code, year, order, page)| {
            let mut state = SearchState {
                query,
                type_code,
                year,
                page,
                ..Default::default()
            };
            state.sort_order = order.unwrap_or_else(|| state.default_sort_order());
            state
        })
}

/// A query matching a subset of what `query` matches.
///
/// Extending a substring only narrows it; a blank or match-all query is replaced.
fn narrower_query(query: &str, word: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() || trimmed == "*" {
        word.to_string()
    } else {
        format!("{}{}", trimmed, word)
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_codec_round_trip(state in state()) {
        let encoded = codec::encode(&state);
        prop_assert_eq!(codec::decode(&encoded), state);
    }

    #[test]
    fn prop_decode_is_total(raw in "[a-z=&%0-9?]{0,30}") {
        let state = codec::decode(&raw);
        prop_assert!(state.page >= 1);
        prop_assert_eq!(codec::decode(&codec::encode(&state)), state);
    }

    #[test]
    fn prop_filtering_is_monotone(
        catalog in proptest::collection::vec(dossier(), 0..30),
        state in state(),
        year in 2015i32..2025,
        code in type_code(),
        word in "[a-zé]{1,3}",
    ) {
        let loose = filter(&catalog, &state);
        let narrowed = [
            SearchState { year: state.year.or(Some(year)), ..state.clone() },
            SearchState { type_code: state.type_code.clone().or(Some(code)), ..state.clone() },
            SearchState { query: narrower_query(&state.query, &word), ..state.clone() },
        ];

        for tighter in &narrowed {
            let tight = filter(&catalog, tighter);
            prop_assert!(tight.len() <= loose.len());
            for d in &tight {
                prop_assert!(loose.iter().any(|l| std::ptr::eq(*l, *d)));
            }
        }
    }

    #[test]
    fn prop_reference_index_never_passes(
        catalog in proptest::collection::vec(dossier(), 0..30),
        state in state(),
    ) {
        for d in filter(&catalog, &state) {
            prop_assert!(!d.type_code.is_excluded());
        }
    }

    #[test]
    fn prop_pagination_partitions_results(
        len in 0usize..60,
        page_size in 1u32..15,
        page in 1u32..10,
    ) {
        let items: Vec<usize> = (0..len).collect();
        let result = paginate(items, page_size, page);
        let expected_pages = total_pages(len as u64, page_size);

        prop_assert_eq!(result.total_count, len as u64);
        prop_assert_eq!(result.total_pages, expected_pages);
        prop_assert!(result.items.len() <= page_size as usize);
        prop_assert!(result.current_page >= 1);
        if expected_pages > 0 {
            prop_assert!(result.current_page <= expected_pages);
        }
        let offset = (result.current_page - 1) as usize * page_size as usize;
        for (i, item) in result.items.iter().enumerate() {
            prop_assert_eq!(*item, offset + i);
        }
    }

    #[test]
    fn prop_controls_window(total in 0u32..40, current in 1u32..40) {
        let current = current.min(total.max(1));
        let c = controls(total, current);
        prop_assert!(c.pages.len() <= 10);
        prop_assert!(c.pages.windows(2).all(|w| w[1] == w[0] + 1));
        if total > 0 {
            prop_assert!(c.pages.contains(&current));
        }
        prop_assert_eq!(c.next, current < total);
        prop_assert_eq!(c.previous, current > 1);
    }

    #[test]
    fn prop_sort_is_permutation(
        catalog in proptest::collection::vec(dossier(), 0..30),
        order in sort_order(),
    ) {
        let refs: Vec<&Dossier> = catalog.iter().collect();
        let sorted = sort_dossiers(refs, &order);
        prop_assert_eq!(sorted.len(), catalog.len());
        for d in &catalog {
            prop_assert!(sorted.iter().any(|s| std::ptr::eq(*s, d)));
        }
    }

    #[test]
    fn prop_relevance_keeps_incoming_order(
        catalog in proptest::collection::vec(dossier(), 0..30),
    ) {
        let ids = |v: &[&Dossier]| v.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
        let incoming: Vec<&Dossier> = catalog.iter().collect();

        let desc = sort_dossiers(incoming.clone(), &SortOrder::RelevanceDesc);
        prop_assert_eq!(ids(&desc), ids(&incoming));

        let reversed = sort_dossiers(incoming.clone(), &SortOrder::RelevanceAsc);
        let restored = sort_dossiers(reversed, &SortOrder::RelevanceAsc);
        prop_assert_eq!(ids(&restored), ids(&incoming));
    }

    #[test]
    fn prop_title_sort_is_stable(
        catalog in proptest::collection::vec(dossier(), 0..30),
    ) {
        let position = |d: &Dossier| catalog.iter().position(|c| std::ptr::eq(c, d));
        let sorted = sort_dossiers(catalog.iter().collect::<Vec<_>>(), &SortOrder::TitleAsc);
        for pair in sorted.windows(2) {
            if pair[0].title == pair[1].title {
                prop_assert!(position(pair[0]) < position(pair[1]));
            }
        }
    }

    #[test]
    fn prop_facet_counts_match_filtered_set(
        catalog in proptest::collection::vec(dossier(), 0..30),
        state in state(),
    ) {
        let filtered = filter(&catalog, &state);
        let facets = count_facets(&filtered);

        if let Some(types) = facets.get(&Dimension::Type) {
            prop_assert_eq!(types.total(), filtered.len() as u64);
            for (value, count) in types.iter() {
                prop_assert!(matches!(value, FacetValue::Category(_)));
                let expected = filtered
                    .iter()
                    .filter(|d| FacetValue::Category(d.type_code.as_str().to_string()) == *value)
                    .count();
                prop_assert_eq!(count, expected as u64);
            }
        } else {
            prop_assert!(filtered.is_empty());
        }

        let with_year = filtered.iter().filter(|d| d.year.is_some()).count() as u64;
        let year_total = facets.get(&Dimension::Year).map(|c| c.total()).unwrap_or(0);
        prop_assert_eq!(year_total, with_year);
    }
}
