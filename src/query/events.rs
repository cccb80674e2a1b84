//! User interactions and the reducer that turns them into the next search state.

use serde::Serialize;

use super::state::{SearchState, SortOrder};
use crate::models::TypeCode;

/// A removable refinement of the result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key", content = "value", rename_all = "lowercase")]
pub enum Facet {
    Type(TypeCode),
    Year(i32),
    /// The text query, shown alongside facets so it can be cleared the same way.
    #[serde(rename = "q")]
    Query(String),
}

/// Interactions emitted by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    SearchSubmitted { query: String },
    FacetToggled { facet: Facet, selected: bool },
    PageChanged { page: u32 },
    SortChanged { order: SortOrder },
    /// Removes query, type and year at once.
    FiltersCleared,
}

/// Replace typographic double quotes with plain ones.
pub fn normalize_query(raw: &str) -> String {
    raw.replace(['\u{201C}', '\u{201D}'], "\"")
}

/// Compute the state that follows `event`.
///
/// Changing query, type, year or sort order resets the page to 1. A sort order that
/// was only the default for the previous criteria is re-derived for the new ones.
pub fn reduce(state: &SearchState, event: &SearchEvent) -> SearchState {
    let mut next = state.clone();
    let implicit_sort = state.sort_order == state.default_sort_order();

    match event {
        SearchEvent::SearchSubmitted { query } => {
            next.query = normalize_query(query);
        }
        SearchEvent::FacetToggled { facet, selected } => match facet {
            Facet::Type(code) => {
                next.type_code = (*selected && !code.is_empty()).then(|| code.clone());
            }
            Facet::Year(year) => {
                next.year = selected.then_some(*year);
            }
            Facet::Query(query) => {
                next.query = if *selected {
                    normalize_query(query)
                } else {
                    String::new()
                };
            }
        },
        SearchEvent::PageChanged { page } => {
            next.page = (*page).max(1);
            return next;
        }
        SearchEvent::SortChanged { order } => {
            next.sort_order = order.clone();
            next.page = 1;
            return next;
        }
        SearchEvent::FiltersCleared => {
            next.query.clear();
            next.type_code = None;
            next.year = None;
        }
    }

    next.page = 1;
    if implicit_sort {
        next.sort_order = next.default_sort_order();
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::codec;

    #[test]
    fn test_facet_selection_resets_page() {
        let state = codec::decode("q=afval&page=3");
        let next = reduce(
            &state,
            &SearchEvent::FacetToggled {
                facet: Facet::Type(TypeCode::from("2k")),
                selected: true,
            },
        );
        assert_eq!(next.page, 1);
        assert_eq!(next.type_code, Some(TypeCode::from("2k")));
        assert_eq!(next.query, "afval");
    }

    #[test]
    fn test_page_change_keeps_everything_else() {
        let state = codec::decode("q=afval&type=2i&order=title-asc");
        let next = reduce(&state, &SearchEvent::PageChanged { page: 5 });
        assert_eq!(next.page, 5);
        assert_eq!(next.sort_order, SortOrder::TitleAsc);
        assert_eq!(next.type_code, state.type_code);

        let next = reduce(&state, &SearchEvent::PageChanged { page: 0 });
        assert_eq!(next.page, 1);
    }

    #[test]
    fn test_sort_change_resets_page() {
        let state = codec::decode("page=4");
        let next = reduce(
            &state,
            &SearchEvent::SortChanged {
                order: SortOrder::TitleDesc,
            },
        );
        assert_eq!(next.page, 1);
        assert_eq!(next.sort_order, SortOrder::TitleDesc);
    }

    #[test]
    fn test_implicit_sort_follows_criteria() {
        let state = codec::decode("");
        assert_eq!(state.sort_order, SortOrder::DateDesc);

        let next = reduce(
            &state,
            &SearchEvent::SearchSubmitted {
                query: "“nota”".to_string(),
            },
        );
        assert_eq!(next.query, "\"nota\"");
        assert_eq!(next.sort_order, SortOrder::RelevanceDesc);

        let cleared = reduce(&next, &SearchEvent::FiltersCleared);
        assert_eq!(cleared.sort_order, SortOrder::DateDesc);
        assert!(!cleared.has_criteria());
    }

    #[test]
    fn test_explicit_sort_survives_filter_change() {
        let state = codec::decode("order=date-asc&page=2");
        let next = reduce(
            &state,
            &SearchEvent::FacetToggled {
                facet: Facet::Year(2020),
                selected: true,
            },
        );
        assert_eq!(next.sort_order, SortOrder::DateAsc);
        assert_eq!(next.year, Some(2020));
        assert_eq!(next.page, 1);
    }

    #[test]
    fn test_deselect_query_crumb() {
        let state = codec::decode("q=brug&year=2019");
        let next = reduce(
            &state,
            &SearchEvent::FacetToggled {
                facet: Facet::Query("brug".into()),
                selected: false,
            },
        );
        assert_eq!(next.query, "");
        assert_eq!(next.year, Some(2019));
    }
}
