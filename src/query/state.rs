//! Structured representation of what the user is currently viewing.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::models::TypeCode;

/// Query text meaning "match everything".
pub const MATCH_ALL: &str = "*";

/// Field a result list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Title,
    Relevance,
    Type,
}

/// Ordering requested by the user, as carried in the `order` URL parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortOrder {
    DateDesc,
    DateAsc,
    TitleDesc,
    TitleAsc,
    RelevanceDesc,
    RelevanceAsc,
    TypeDesc,
    TypeAsc,
    /// Unrecognised value; results keep their incoming order.
    Other(String),
}

impl SortOrder {
    /// The orderings offered in the sort selector, in display order.
    pub const ALL: [SortOrder; 8] = [
        SortOrder::RelevanceDesc,
        SortOrder::RelevanceAsc,
        SortOrder::DateDesc,
        SortOrder::DateAsc,
        SortOrder::TypeDesc,
        SortOrder::TypeAsc,
        SortOrder::TitleDesc,
        SortOrder::TitleAsc,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "date-desc" => SortOrder::DateDesc,
            "date-asc" => SortOrder::DateAsc,
            "title-desc" => SortOrder::TitleDesc,
            "title-asc" => SortOrder::TitleAsc,
            "relevance-desc" => SortOrder::RelevanceDesc,
            "relevance-asc" => SortOrder::RelevanceAsc,
            "type-desc" => SortOrder::TypeDesc,
            "type-asc" => SortOrder::TypeAsc,
            other => SortOrder::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortOrder::DateDesc => "date-desc",
            SortOrder::DateAsc => "date-asc",
            SortOrder::TitleDesc => "title-desc",
            SortOrder::TitleAsc => "title-asc",
            SortOrder::RelevanceDesc => "relevance-desc",
            SortOrder::RelevanceAsc => "relevance-asc",
            SortOrder::TypeDesc => "type-desc",
            SortOrder::TypeAsc => "type-asc",
            SortOrder::Other(raw) => raw,
        }
    }

    /// Sort key and whether the order is descending; `None` for unknown orders.
    pub fn key(&self) -> Option<(SortKey, bool)> {
        match self {
            SortOrder::DateDesc => Some((SortKey::Date, true)),
            SortOrder::DateAsc => Some((SortKey::Date, false)),
            SortOrder::TitleDesc => Some((SortKey::Title, true)),
            SortOrder::TitleAsc => Some((SortKey::Title, false)),
            SortOrder::RelevanceDesc => Some((SortKey::Relevance, true)),
            SortOrder::RelevanceAsc => Some((SortKey::Relevance, false)),
            SortOrder::TypeDesc => Some((SortKey::Type, true)),
            SortOrder::TypeAsc => Some((SortKey::Type, false)),
            SortOrder::Other(_) => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortOrder::parse(s))
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The minimal state behind a result page, fully derivable from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchState {
    pub query: String,
    #[serde(rename = "type")]
    pub type_code: Option<TypeCode>,
    pub year: Option<i32>,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            type_code: None,
            year: None,
            sort_order: SortOrder::DateDesc,
            page: 1,
        }
    }
}

impl SearchState {
    /// Whether any of query, type or year is set (drives the default ordering).
    pub fn has_criteria(&self) -> bool {
        !self.query.is_empty() || self.type_code.is_some() || self.year.is_some()
    }

    /// Ordering used when the URL does not name one.
    pub fn default_sort_order(&self) -> SortOrder {
        if self.has_criteria() {
            SortOrder::RelevanceDesc
        } else {
            SortOrder::DateDesc
        }
    }

    /// Text to match, or `None` when the query is blank or the match-all sentinel.
    pub fn text_query(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() || trimmed == MATCH_ALL {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Whether the result set is narrowed by any filter clause.
    pub fn has_active_filters(&self) -> bool {
        self.text_query().is_some() || self.type_code.is_some() || self.year.is_some()
    }
}
