//! Decoding of Woo API responses into domain records.
//!
//! Two response shapes exist: the infobox catalog (`{infobox: {foi_dossiers: [...]}}`)
//! used for local filtering, and the search response (`{hits, total_hits, total_pages,
//! facets}`) used when filtering is delegated to the server. Both decode into the same
//! [`Dossier`] model. Scalars are read leniently; only structurally wrong input is an error.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::dossier::{Dossier, DossierFile, FairScore, TypeCode};
use crate::error::{Result, WooError};

/// One page of server-side search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemotePage {
    pub hits: Vec<Dossier>,
    pub total_hits: u64,
    /// Page count as reported by the server, if any.
    pub total_pages: Option<u64>,
    pub facets: Vec<FacetBucket>,
}

/// A pre-aggregated facet bucket reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetBucket {
    /// Dimension key as sent by the server (`type`, `year`, `dc_publisher`, ...).
    pub dimension: String,
    /// Bucket label (`facet_name`).
    pub name: String,
    pub count: u64,
}

/// A publishing organisation as listed by the municipalities infobox.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Municipality {
    /// Woo publisher prefix, e.g. `gm0268`.
    pub prefix: String,
    pub name: String,
}

mod lenient {
    use super::*;

    pub fn string<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<String>, D::Error> {
        Ok(as_string(&Value::deserialize(d)?))
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<i64>, D::Error> {
        Ok(as_int(&Value::deserialize(d)?))
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
        Ok(as_float(&Value::deserialize(d)?))
    }

    pub fn as_string(v: &Value) -> Option<String> {
        match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn as_int(v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_float(v: &Value) -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDossier {
    #[serde(deserialize_with = "lenient::string")]
    dc_identifier: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    dc_title: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    dc_description: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    dc_type: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    dc_date_year: Option<i64>,
    #[serde(rename = "foi_publishedDate", deserialize_with = "lenient::string")]
    published_date: Option<String>,
    #[serde(rename = "foi_requestDate", deserialize_with = "lenient::string")]
    request_date: Option<String>,
    #[serde(rename = "foi_decisionDate", deserialize_with = "lenient::string")]
    decision_date: Option<String>,
    #[serde(rename = "foi_retrievedDate", deserialize_with = "lenient::string")]
    retrieved_date: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    tooiwl_topic: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    foi_valuation: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    dc_publisher_name: Option<String>,
    #[serde(rename = "foi_nrDocuments", deserialize_with = "lenient::int")]
    document_count: Option<i64>,
    #[serde(rename = "foi_nrPagesInDossier", deserialize_with = "lenient::int")]
    page_count: Option<i64>,
    #[serde(rename = "foi_requestText", deserialize_with = "lenient::string")]
    request_text: Option<String>,
    #[serde(rename = "foi_decisionText", deserialize_with = "lenient::string")]
    decision_text: Option<String>,
    #[serde(deserialize_with = "lenient::float")]
    foi_fairiscore: Option<f64>,
    #[serde(rename = "foi_fairiscoreVersions")]
    fairiscore_versions: Value,
    foi_files: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFile {
    #[serde(deserialize_with = "lenient::string")]
    dc_identifier: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    dc_title: Option<String>,
    #[serde(rename = "foi_fileName", deserialize_with = "lenient::string")]
    file_name: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    dc_format: Option<String>,
    #[serde(rename = "foi_nrPages", deserialize_with = "lenient::int")]
    page_count: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    dc_type: Option<String>,
    #[serde(deserialize_with = "lenient::float")]
    foi_fairiscore: Option<f64>,
    #[serde(rename = "foi_fairiscoreVersions")]
    fairiscore_versions: Value,
}

/// Prefer the current score, fall back to the v2 entry of the version map.
fn fair_score(current: Option<f64>, versions: &Value) -> FairScore {
    current
        .or_else(|| versions.get("v2").and_then(lenient::as_float))
        .map(FairScore::from_f64)
        .unwrap_or_default()
}

fn non_negative(v: Option<i64>) -> Option<u32> {
    v.and_then(|n| u32::try_from(n).ok())
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl RawDossier {
    fn into_dossier(self) -> Dossier {
        let id = self.dc_identifier.unwrap_or_default();
        let files = match self.foi_files {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match decode_file(item, &id) {
                    Ok(file) => Some(file),
                    Err(e) => {
                        debug!("Skipping file in dossier {}: {}", id, e);
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        Dossier {
            title: self.dc_title.unwrap_or_default(),
            description: self.dc_description.unwrap_or_default(),
            type_code: TypeCode::new(self.dc_type.unwrap_or_default()),
            year: self.dc_date_year.and_then(|y| i32::try_from(y).ok()),
            published_date: non_empty(self.published_date),
            request_date: non_empty(self.request_date),
            decision_date: non_empty(self.decision_date),
            retrieved_date: non_empty(self.retrieved_date),
            topic: non_empty(self.tooiwl_topic),
            valuation: non_empty(self.foi_valuation),
            publisher_name: non_empty(self.dc_publisher_name),
            document_count: non_negative(self.document_count),
            page_count: non_negative(self.page_count),
            request_text: non_empty(self.request_text),
            decision_text: non_empty(self.decision_text),
            fair_score: fair_score(self.foi_fairiscore, &self.fairiscore_versions),
            files,
            id,
        }
    }
}

fn decode_file(value: &Value, dossier_id: &str) -> Result<DossierFile> {
    if !value.is_object() {
        return Err(WooError::shape("file entry is not an object"));
    }
    let raw = RawFile::deserialize(value)?;
    Ok(DossierFile {
        id: raw.dc_identifier.unwrap_or_default(),
        title: raw.dc_title.unwrap_or_default(),
        file_name: raw.file_name.unwrap_or_default(),
        format: raw.dc_format.unwrap_or_default(),
        page_count: non_negative(raw.page_count).unwrap_or(0),
        role: raw.dc_type.unwrap_or_default(),
        fair_score: fair_score(raw.foi_fairiscore, &raw.fairiscore_versions),
        dossier_id: dossier_id.to_string(),
    })
}

/// Decode a single dossier record.
pub fn decode_dossier(value: &Value) -> Result<Dossier> {
    if !value.is_object() {
        return Err(WooError::shape(format!(
            "dossier record is not an object: {}",
            type_name(value)
        )));
    }
    let raw = RawDossier::deserialize(value)?;
    Ok(raw.into_dossier())
}

fn decode_records(items: &[Value]) -> Result<Vec<Dossier>> {
    items.iter().map(decode_dossier).collect()
}

/// Decode the infobox catalog used by local-filter mode.
pub fn decode_catalog(value: &Value) -> Result<Vec<Dossier>> {
    let items = value
        .get("infobox")
        .and_then(|infobox| infobox.get("foi_dossiers"))
        .and_then(Value::as_array)
        .ok_or_else(|| WooError::shape("infobox.foi_dossiers is not an array"))?;
    decode_records(items)
}

/// Decode a server-side search response.
pub fn decode_search(value: &Value) -> Result<RemotePage> {
    let items = value
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| WooError::shape("hits is not an array"))?;
    let hits = decode_records(items)?;

    let total_hits = value
        .get("total_hits")
        .and_then(lenient::as_int)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(hits.len() as u64);
    let total_pages = value
        .get("total_pages")
        .and_then(lenient::as_int)
        .and_then(|n| u64::try_from(n).ok());

    let facets = match value.get("facets") {
        Some(Value::Array(entries)) => decode_facet_entries(entries),
        _ => Vec::new(),
    };

    Ok(RemotePage {
        hits,
        total_hits,
        total_pages,
        facets,
    })
}

/// Each facet entry is an object keyed by dimension: `{ "<dim>": { facet_name, value } }`.
fn decode_facet_entries(entries: &[Value]) -> Vec<FacetBucket> {
    let mut buckets = Vec::new();
    for entry in entries {
        let Some(map) = entry.as_object() else {
            debug!("Ignoring facet entry of type {}", type_name(entry));
            continue;
        };
        for (dimension, bucket) in map {
            let name = bucket.get("facet_name").and_then(lenient::as_string);
            let count = bucket
                .get("value")
                .and_then(lenient::as_int)
                .and_then(|n| u64::try_from(n).ok());
            match (name, count) {
                (Some(name), Some(count)) => buckets.push(FacetBucket {
                    dimension: dimension.clone(),
                    name,
                    count,
                }),
                _ => debug!("Ignoring incomplete facet bucket for {}", dimension),
            }
        }
    }
    buckets
}

/// Decode a single-dossier infobox response; an empty infobox means the id is unknown.
pub fn decode_detail(value: &Value, pid: &str) -> Result<Dossier> {
    match value.get("infobox") {
        Some(infobox @ Value::Object(map)) if !map.is_empty() => decode_dossier(infobox),
        Some(Value::Object(_)) | Some(Value::Null) | None => {
            Err(WooError::NotFound(pid.to_string()))
        }
        Some(other) => Err(WooError::shape(format!(
            "infobox is not an object: {}",
            type_name(other)
        ))),
    }
}

/// Decode the municipalities infobox (a map or list of publishers).
pub fn decode_municipalities(value: &Value) -> Result<Vec<Municipality>> {
    let entries: Vec<&Value> = match value.get("infobox") {
        Some(Value::Object(map)) => map.values().collect(),
        Some(Value::Array(items)) => items.iter().collect(),
        _ => return Err(WooError::shape("infobox is neither an object nor an array")),
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let prefix = entry.get("foi_prefix").and_then(lenient::as_string)?;
            let name = entry
                .get("dc_publisher_name")
                .and_then(lenient::as_string)
                .unwrap_or_else(|| prefix.clone());
            Some(Municipality { prefix, name })
        })
        .collect())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
