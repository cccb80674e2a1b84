//! Display text helpers.

use super::Locale;
use crate::models::{FairScore, TypeCode};

/// Maximum description length in result lists.
pub const DESCRIPTION_LIMIT: usize = 250;

/// Maximum title length in a detail page title.
pub const PAGE_TITLE_LIMIT: usize = 50;

const ELLIPSIS: &str = "...";

/// Human-readable name of a type code.
pub fn type_name(code: &TypeCode, locale: Locale) -> &'static str {
    match (code.as_str(), locale) {
        (TypeCode::DECISION, Locale::Nl) => "Beschikking",
        (TypeCode::DECISION, Locale::En) => "Decision",
        (TypeCode::MEETING_DOCUMENT, Locale::Nl) => "Vergaderstuk decentrale overheid",
        (TypeCode::MEETING_DOCUMENT, Locale::En) => "Meeting document of a local authority",
        (TypeCode::REQUEST_DOSSIER, Locale::Nl) => "Dossier na Woo/Wob-verzoek",
        (TypeCode::REQUEST_DOSSIER, Locale::En) => "Dossier after a Woo/Wob request",
        (TypeCode::CONTACT_DETAILS, Locale::Nl) => "Bereikbaarheidsgegevens",
        (TypeCode::CONTACT_DETAILS, Locale::En) => "Contact details",
        (TypeCode::REFERENCE_INDEX, Locale::Nl) => "Verwijsindex",
        (TypeCode::REFERENCE_INDEX, Locale::En) => "Reference index",
        _ => unknown_label(locale),
    }
}

pub fn unknown_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Nl => "Onbekend",
        Locale::En => "Unknown",
    }
}

/// The value itself, or the localized "unknown" label when blank.
pub fn or_unknown(value: Option<&str>, locale: Locale) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => unknown_label(locale).to_string(),
    }
}

/// Upper-case the first character.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cut `text` to `limit` characters, appending `...` when anything was removed.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}{}", &text[..end], ELLIPSIS),
        None => text.to_string(),
    }
}

pub fn fair_score_label(score: FairScore) -> String {
    match score {
        FairScore::Score(v) => format!("{}", v),
        FairScore::Unknown => "N/A".to_string(),
    }
}

/// "1 pagina" / "3 pagina's".
pub fn pages_label(count: u32, locale: Locale) -> String {
    match (locale, count) {
        (Locale::Nl, 1) => "1 pagina".to_string(),
        (Locale::Nl, n) => format!("{} pagina's", n),
        (Locale::En, 1) => "1 page".to_string(),
        (Locale::En, n) => format!("{} pages", n),
    }
}

/// Result count caption.
pub fn result_caption(total: u64, filtered: bool, locale: Locale) -> String {
    match (filtered, total, locale) {
        (false, _, Locale::Nl) => "Alle dossiers".to_string(),
        (false, _, Locale::En) => "All dossiers".to_string(),
        (true, 1, _) => "1 dossier".to_string(),
        (true, n, _) => format!("{} dossiers", n),
    }
}
