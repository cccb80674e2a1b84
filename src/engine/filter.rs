//! Predicate evaluation over a dossier set.

use serde_json::Value;

use crate::error::Result;
use crate::models::{wire, Dossier, DossierFile};
use crate::query::SearchState;

/// Case-folded substring containment.
fn contains_folded(haystack: &str, needle_folded: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(needle_folded)
}

fn file_matches(file: &DossierFile, needle_folded: &str) -> bool {
    contains_folded(&file.title, needle_folded) || contains_folded(&file.file_name, needle_folded)
}

/// Whether a dossier passes every filter clause of `state`.
///
/// Reference index records never match.
pub fn matches(dossier: &Dossier, state: &SearchState) -> bool {
    if dossier.type_code.is_excluded() {
        return false;
    }
    if let Some(year) = state.year {
        if dossier.year != Some(year) {
            return false;
        }
    }
    if let Some(ref code) = state.type_code {
        if &dossier.type_code != code {
            return false;
        }
    }
    match state.text_query() {
        None => true,
        Some(query) => {
            let needle = query.to_lowercase();
            contains_folded(&dossier.title, &needle)
                || contains_folded(&dossier.description, &needle)
                || dossier.files.iter().any(|f| file_matches(f, &needle))
        }
    }
}

/// Dossiers matching `state`, in their incoming order.
pub fn filter<'a>(dossiers: &'a [Dossier], state: &SearchState) -> Vec<&'a Dossier> {
    dossiers.iter().filter(|d| matches(d, state)).collect()
}

/// Decode a raw catalog response and filter it.
///
/// A structurally invalid catalog yields an error and no dossiers; it never panics.
pub fn filter_json(value: &Value, state: &SearchState) -> Result<Vec<Dossier>> {
    let dossiers = wire::decode_catalog(value)?;
    Ok(dossiers
        .into_iter()
        .filter(|d| matches(d, state))
        .collect())
}

/// Drop reference index records from a server-filtered list.
pub fn without_excluded(dossiers: &[Dossier]) -> Vec<&Dossier> {
    dossiers
        .iter()
        .filter(|d| !d.type_code.is_excluded())
        .collect()
}

/// Files of a dossier whose name contains the active text query.
pub fn matching_files<'a>(dossier: &'a Dossier, state: &SearchState) -> Vec<&'a DossierFile> {
    let Some(query) = state.text_query() else {
        return Vec::new();
    };
    let needle = query.to_lowercase();
    dossier
        .files
        .iter()
        .filter(|f| file_matches(f, &needle))
        .collect()
}
