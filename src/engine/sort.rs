//! Stable ordering of dossiers by sort order.

use std::borrow::Borrow;
use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Dossier;
use crate::query::{SortKey, SortOrder};

/// Accent- and case-insensitive key for title comparison ("Émile" sorts with "emile").
pub fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn sort_by_key<T, K, F>(items: Vec<T>, descending: bool, key: F) -> Vec<T>
where
    T: Borrow<Dossier>,
    K: Ord,
    F: Fn(&Dossier) -> K,
{
    let mut keyed: Vec<(K, T)> = items
        .into_iter()
        .map(|item| (key(item.borrow()), item))
        .collect();
    // Vec::sort_by is stable; descending flips the comparator, not the result,
    // so equal keys keep their incoming order in both directions.
    keyed.sort_by(|a, b| {
        let ord: Ordering = a.0.cmp(&b.0);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Order dossiers by `order`.
///
/// Unparsable publication dates sort as the earliest. Relevance keeps the order
/// supplied by the data source (ascending reverses it); unknown orders are identity.
pub fn sort_dossiers<T: Borrow<Dossier>>(mut items: Vec<T>, order: &SortOrder) -> Vec<T> {
    let Some((key, descending)) = order.key() else {
        return items;
    };
    match key {
        SortKey::Relevance => {
            if !descending {
                items.reverse();
            }
            items
        }
        SortKey::Date => sort_by_key(items, descending, |d| d.published_at()),
        SortKey::Title => sort_by_key(items, descending, |d| {
            (collation_key(&d.title), d.title.clone())
        }),
        SortKey::Type => sort_by_key(items, descending, |d| d.type_code.clone()),
    }
}
