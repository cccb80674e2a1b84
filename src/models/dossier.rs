//! Dossier and file records as received from the Woo data source.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Short tag classifying a dossier's legal/administrative category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeCode(String);

impl TypeCode {
    /// Decision ("Beschikking").
    pub const DECISION: &'static str = "2k";
    /// Meeting document of a decentralised government body.
    pub const MEETING_DOCUMENT: &'static str = "2c";
    /// Dossier disclosed after a Woo/Wob request.
    pub const REQUEST_DOSSIER: &'static str = "2i";
    /// Contact details.
    pub const CONTACT_DETAILS: &'static str = "1e";
    /// Reference index entry, never shown in results.
    pub const REFERENCE_INDEX: &'static str = "1e-i";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reference index records are excluded from every result set.
    pub fn is_excluded(&self) -> bool {
        self.0 == Self::REFERENCE_INDEX
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Serialize for TypeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// FAIR (findable, accessible, interoperable, reusable) completeness score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FairScore {
    Score(f64),
    #[default]
    Unknown,
}

impl FairScore {
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            FairScore::Score(value)
        } else {
            FairScore::Unknown
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            FairScore::Score(v) => Some(*v),
            FairScore::Unknown => None,
        }
    }
}

impl Serialize for FairScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FairScore::Score(v) => serializer.serialize_f64(*v),
            FairScore::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// A file belonging to a dossier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DossierFile {
    pub id: String,
    /// `dc_title` of the file.
    pub title: String,
    /// Original file name (`foi_fileName`).
    pub file_name: String,
    /// MIME-like format string, e.g. `application/pdf`.
    pub format: String,
    pub page_count: u32,
    /// Role of the file within the dossier (`verzoek`, `besluit`, `bijlage`, ...).
    pub role: String,
    pub fair_score: FairScore,
    /// Identifier of the owning dossier.
    pub dossier_id: String,
}

impl DossierFile {
    /// Name used when matching a text query against this file.
    pub fn display_name(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else {
            &self.file_name
        }
    }
}

/// A disclosed case file with its metadata and files.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dossier {
    pub id: String,
    pub title: String,
    pub description: String,
    pub type_code: TypeCode,
    pub year: Option<i32>,
    pub published_date: Option<String>,
    pub request_date: Option<String>,
    pub decision_date: Option<String>,
    pub retrieved_date: Option<String>,
    pub topic: Option<String>,
    pub valuation: Option<String>,
    pub publisher_name: Option<String>,
    pub document_count: Option<u32>,
    pub page_count: Option<u32>,
    pub request_text: Option<String>,
    pub decision_text: Option<String>,
    pub fair_score: FairScore,
    pub files: Vec<DossierFile>,
}

impl Dossier {
    /// Parsed publication date, `None` when absent or unparsable.
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        self.published_date.as_deref().and_then(parse_date)
    }
}

/// Parse the date formats seen in Woo metadata.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
