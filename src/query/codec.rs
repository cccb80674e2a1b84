//! Mapping between [`SearchState`] and URL query strings.
//!
//! Decoding is total: absent or unparsable parameters take their defaults. Encoding
//! omits parameters that equal their default, so `decode(encode(s)) == s` for every
//! decoded state.

use url::form_urlencoded;

use super::state::{SearchState, SortOrder};
use crate::models::TypeCode;

pub const PARAM_QUERY: &str = "q";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_YEAR: &str = "year";
pub const PARAM_ORDER: &str = "order";
pub const PARAM_PAGE: &str = "page";

const STATE_PARAMS: [&str; 5] = [PARAM_QUERY, PARAM_TYPE, PARAM_YEAR, PARAM_ORDER, PARAM_PAGE];

fn pairs(query_string: &str) -> Vec<(String, String)> {
    let raw = query_string.strip_prefix('?').unwrap_or(query_string);
    form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Decode a URL query string (with or without leading `?`) into a search state.
pub fn decode(query_string: &str) -> SearchState {
    let pairs = pairs(query_string);

    let query = first(&pairs, PARAM_QUERY).unwrap_or_default().to_string();
    let type_code = first(&pairs, PARAM_TYPE)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(TypeCode::from);
    let year = first(&pairs, PARAM_YEAR).and_then(|y| y.trim().parse::<i32>().ok());
    let page = first(&pairs, PARAM_PAGE)
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    let mut state = SearchState {
        query,
        type_code,
        year,
        sort_order: SortOrder::DateDesc,
        page,
    };
    state.sort_order = match first(&pairs, PARAM_ORDER).filter(|o| !o.is_empty()) {
        Some(order) => SortOrder::parse(order),
        None => state.default_sort_order(),
    };
    state
}

/// Parameter values for a state, `None` where the parameter is left out.
fn state_values(state: &SearchState) -> [(&'static str, Option<String>); 5] {
    [
        (
            PARAM_QUERY,
            Some(state.query.clone()).filter(|q| !q.is_empty()),
        ),
        (
            PARAM_TYPE,
            state.type_code.as_ref().map(|t| t.as_str().to_string()),
        ),
        (PARAM_YEAR, state.year.map(|y| y.to_string())),
        (
            PARAM_ORDER,
            Some(state.sort_order.as_str().to_string())
                .filter(|_| state.sort_order != state.default_sort_order()),
        ),
        (
            PARAM_PAGE,
            Some(state.page.to_string()).filter(|_| state.page > 1),
        ),
    ]
}

/// Encode a state as a query string (without leading `?`).
pub fn encode(state: &SearchState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in state_values(state) {
        if let Some(value) = value {
            serializer.append_pair(key, &value);
        }
    }
    serializer.finish()
}

/// Rewrite the state parameters of an existing query string, keeping every other
/// parameter (publisher, country, pid, ...) where it was.
pub fn merge(query_string: &str, state: &SearchState) -> String {
    let values = state_values(state);
    let value_of = |key: &str| {
        values
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_deref())
    };

    let mut written: Vec<&str> = Vec::new();
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (key, value) in pairs(query_string) {
        match STATE_PARAMS.iter().copied().find(|p| *p == key) {
            Some(param) => {
                if written.contains(&param) {
                    continue;
                }
                written.push(param);
                if let Some(v) = value_of(param) {
                    serializer.append_pair(param, v);
                }
            }
            None => {
                serializer.append_pair(&key, &value);
            }
        }
    }

    for param in STATE_PARAMS {
        if !written.contains(&param) {
            if let Some(v) = value_of(param) {
                serializer.append_pair(param, v);
            }
        }
    }

    serializer.finish()
}
