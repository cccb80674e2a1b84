//! Renderable view models built from evaluated search results.
//!
//! Nothing here touches the network; a `ViewModel` is a pure function of the evaluated
//! page, the facet summary and the search state. Every facet option, crumb and sort
//! option carries the query string it navigates to, so a renderer only has to emit links.

mod detail;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{
    controls, matching_files, Dimension, FacetSummary, FacetValue, PaginationControls, ResultPage,
};
use crate::error::{ErrorKind, WooError};
use crate::models::{Dossier, TypeCode};
use crate::query::{codec, reduce, Facet, SearchEvent, SearchState, SortOrder};

pub use detail::{build_detail, DossierDetail, DossierLinks, FileEntry, FileGroup, FileRole};

/// Language of generated captions and labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Nl,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nl" | "nl-nl" => Ok(Locale::Nl),
            "en" | "en-gb" | "en-us" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Nl => f.write_str("nl"),
            Locale::En => f.write_str("en"),
        }
    }
}

/// Whether the result list could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultStatus {
    Ready,
    /// The data source could not be reached or answered with an error.
    Unavailable { message: String },
    /// The data source answered with data of the wrong shape.
    InvalidData { message: String },
}

/// A file of a listed dossier whose name matched the text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedFile {
    pub id: String,
    pub name: String,
}

/// One entry of the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub type_code: TypeCode,
    pub type_name: &'static str,
    pub topic: String,
    pub valuation: String,
    pub published_date: String,
    pub year: Option<i32>,
    pub fair_score: String,
    pub matching_files: Vec<MatchedFile>,
}

impl ResultItem {
    fn new(dossier: &Dossier, state: &SearchState, locale: Locale) -> Self {
        let matching_files = matching_files(dossier, state)
            .into_iter()
            .map(|f| MatchedFile {
                id: f.id.clone(),
                name: if f.display_name().is_empty() {
                    untitled_file(locale).to_string()
                } else {
                    f.display_name().to_string()
                },
            })
            .collect();

        Self {
            id: dossier.id.clone(),
            title: text::capitalize_first(&dossier.title),
            description: text::truncate(
                &text::capitalize_first(&dossier.description),
                text::DESCRIPTION_LIMIT,
            ),
            type_code: dossier.type_code.clone(),
            type_name: text::type_name(&dossier.type_code, locale),
            topic: text::or_unknown(dossier.topic.as_deref(), locale),
            valuation: text::or_unknown(dossier.valuation.as_deref(), locale),
            published_date: text::or_unknown(dossier.published_date.as_deref(), locale),
            year: dossier.year,
            fair_score: text::fair_score_label(dossier.fair_score),
            matching_files,
        }
    }
}

pub(crate) fn untitled_file(locale: Locale) -> &'static str {
    match locale {
        Locale::Nl => "Naamloos bestand",
        Locale::En => "Untitled file",
    }
}

/// A selectable value within a facet group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetOption {
    pub value: FacetValue,
    pub label: String,
    pub count: u64,
    pub selected: bool,
    /// Query string after toggling this option; `None` for informational values.
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetGroup {
    pub dimension: Dimension,
    pub label: &'static str,
    pub options: Vec<FacetOption>,
}

/// An active refinement shown above the results, with its removal link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crumb {
    pub facet: Facet,
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOption {
    pub order: SortOrder,
    pub label: &'static str,
    pub selected: bool,
    pub href: String,
}

/// Everything a renderer needs for one result page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub status: ResultStatus,
    pub caption: String,
    pub state: SearchState,
    /// Canonical query string of `state`.
    pub query_string: String,
    pub items: Vec<ResultItem>,
    pub total_count: u64,
    pub facets: Vec<FacetGroup>,
    pub crumbs: Vec<Crumb>,
    pub pagination: PaginationControls,
    pub sort_options: Vec<SortOption>,
    /// Query string that removes every filter at once.
    pub clear_href: String,
}

fn href(state: &SearchState, event: SearchEvent) -> String {
    let next = reduce(state, &event);
    format!("?{}", codec::encode(&next))
}

fn dimension_label(dimension: &Dimension, locale: Locale) -> &'static str {
    match (dimension, locale) {
        (Dimension::Type, _) => "Type",
        (Dimension::Year, Locale::Nl) => "Jaar",
        (Dimension::Year, Locale::En) => "Year",
        (Dimension::Topic, Locale::Nl) => "Thema",
        (Dimension::Topic, Locale::En) => "Topic",
        (Dimension::Publisher, Locale::Nl) => "Organisatie",
        (Dimension::Publisher, Locale::En) => "Publisher",
        (Dimension::Other(_), Locale::Nl) => "Overig",
        (Dimension::Other(_), Locale::En) => "Other",
    }
}

fn sort_label(order: &SortOrder, locale: Locale) -> &'static str {
    match (order, locale) {
        (SortOrder::RelevanceDesc, Locale::Nl) => "Meest relevant",
        (SortOrder::RelevanceDesc, Locale::En) => "Most relevant",
        (SortOrder::RelevanceAsc, Locale::Nl) => "Minst relevant",
        (SortOrder::RelevanceAsc, Locale::En) => "Least relevant",
        (SortOrder::DateDesc, Locale::Nl) => "Nieuwste eerst",
        (SortOrder::DateDesc, Locale::En) => "Newest first",
        (SortOrder::DateAsc, Locale::Nl) => "Oudste eerst",
        (SortOrder::DateAsc, Locale::En) => "Oldest first",
        (SortOrder::TypeDesc, _) => "Type (Z-A)",
        (SortOrder::TypeAsc, _) => "Type (A-Z)",
        (SortOrder::TitleDesc, Locale::Nl) => "Titel (Z-A)",
        (SortOrder::TitleDesc, Locale::En) => "Title (Z-A)",
        (SortOrder::TitleAsc, Locale::Nl) => "Titel (A-Z)",
        (SortOrder::TitleAsc, Locale::En) => "Title (A-Z)",
        (SortOrder::Other(_), _) => "",
    }
}

/// The removable refinement a facet option corresponds to, if any.
fn facet_for(dimension: &Dimension, value: &FacetValue) -> Option<Facet> {
    match (dimension, value) {
        (Dimension::Type, value) => Some(Facet::Type(TypeCode::new(value.to_string()))),
        (Dimension::Year, FacetValue::Year(year)) => Some(Facet::Year(*year)),
        _ => None,
    }
}

fn is_selected(state: &SearchState, facet: &Facet) -> bool {
    match facet {
        Facet::Type(code) => state.type_code.as_ref() == Some(code),
        Facet::Year(year) => state.year == Some(*year),
        Facet::Query(query) => &state.query == query,
    }
}

fn facet_groups(facets: &FacetSummary, state: &SearchState, locale: Locale) -> Vec<FacetGroup> {
    facets
        .iter()
        .map(|(dimension, counts)| {
            let options = counts
                .iter()
                .map(|(value, count)| {
                    let facet = facet_for(dimension, value);
                    let selected = facet.as_ref().is_some_and(|f| is_selected(state, f));
                    let label = match dimension {
                        Dimension::Type => {
                            text::type_name(&TypeCode::new(value.to_string()), locale).to_string()
                        }
                        Dimension::Topic => text::capitalize_first(&value.to_string()),
                        _ => value.to_string(),
                    };
                    FacetOption {
                        value: value.clone(),
                        label,
                        count,
                        selected,
                        href: facet.map(|facet| {
                            href(
                                state,
                                SearchEvent::FacetToggled {
                                    facet,
                                    selected: !selected,
                                },
                            )
                        }),
                    }
                })
                .collect();
            FacetGroup {
                dimension: dimension.clone(),
                label: dimension_label(dimension, locale),
                options,
            }
        })
        .collect()
}

fn crumbs(state: &SearchState, locale: Locale) -> Vec<Crumb> {
    let mut active = Vec::new();
    if !state.query.is_empty() {
        active.push((Facet::Query(state.query.clone()), format!("\"{}\"", state.query)));
    }
    if let Some(ref code) = state.type_code {
        active.push((
            Facet::Type(code.clone()),
            text::type_name(code, locale).to_string(),
        ));
    }
    if let Some(year) = state.year {
        active.push((Facet::Year(year), year.to_string()));
    }

    active
        .into_iter()
        .map(|(facet, label)| Crumb {
            href: href(
                state,
                SearchEvent::FacetToggled {
                    facet: facet.clone(),
                    selected: false,
                },
            ),
            facet,
            label,
        })
        .collect()
}

fn sort_options(state: &SearchState, locale: Locale) -> Vec<SortOption> {
    SortOrder::ALL
        .into_iter()
        .map(|order| SortOption {
            selected: order == state.sort_order,
            label: sort_label(&order, locale),
            href: href(state, SearchEvent::SortChanged { order: order.clone() }),
            order,
        })
        .collect()
}

/// Assemble the view model for an evaluated page.
pub fn build(
    page: &ResultPage<&Dossier>,
    facets: &FacetSummary,
    state: &SearchState,
    locale: Locale,
) -> ViewModel {
    // The page may have been clamped; links and markers follow the page actually shown.
    let mut shown = state.clone();
    shown.page = page.current_page;

    ViewModel {
        status: ResultStatus::Ready,
        caption: text::result_caption(page.total_count, shown.has_active_filters(), locale),
        query_string: codec::encode(&shown),
        items: page
            .items
            .iter()
            .map(|d| ResultItem::new(d, &shown, locale))
            .collect(),
        total_count: page.total_count,
        facets: facet_groups(facets, &shown, locale),
        crumbs: crumbs(&shown, locale),
        pagination: controls(page.total_pages, page.current_page),
        sort_options: sort_options(&shown, locale),
        clear_href: href(&shown, SearchEvent::FiltersCleared),
        state: shown,
    }
}

impl ViewModel {
    /// An empty result view reporting why no results could be shown.
    pub fn failed(state: &SearchState, error: &WooError, locale: Locale) -> Self {
        let invalid = error.kind() == ErrorKind::DataShape;
        let message = match (invalid, locale) {
            (true, Locale::Nl) => "De ontvangen gegevens hebben een onverwacht formaat",
            (true, Locale::En) => "The received data has an unexpected format",
            (false, Locale::Nl) => "Kan resultaten niet laden",
            (false, Locale::En) => "Unable to load results",
        }
        .to_string();

        let empty = ResultPage {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            current_page: 1,
        };
        Self {
            caption: message.clone(),
            status: if invalid {
                ResultStatus::InvalidData { message }
            } else {
                ResultStatus::Unavailable { message }
            },
            ..build(&empty, &FacetSummary::default(), state, locale)
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ResultStatus::Ready
    }
}
