//! Facet aggregation: per-dimension value counts over a filtered set.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::models::{Dossier, FacetBucket};

/// A dimension dossiers can be grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Type,
    Year,
    Topic,
    Publisher,
    Other(String),
}

impl Dimension {
    /// Map a server-side dimension key onto a known dimension.
    pub fn from_key(key: &str) -> Self {
        match key {
            "type" | "dc_type" => Dimension::Type,
            "year" | "dc_date_year" => Dimension::Year,
            "topic" | "tooiwl_topic" => Dimension::Topic,
            "publisher" | "dc_publisher" | "dc_publisher_name" => Dimension::Publisher,
            other => Dimension::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Dimension::Type => "type",
            Dimension::Year => "year",
            Dimension::Topic => "topic",
            Dimension::Publisher => "publisher",
            Dimension::Other(key) => key,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A facet bucket key: numeric for year-like values, otherwise categorical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FacetValue {
    Year(i32),
    Category(String),
}

impl FacetValue {
    /// Classify a bucket label; labels that parse as integers are year-like.
    pub fn from_label(label: &str) -> Self {
        match label.trim().parse::<i32>() {
            Ok(year) => FacetValue::Year(year),
            Err(_) => FacetValue::Category(label.to_string()),
        }
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Year(year) => write!(f, "{}", year),
            FacetValue::Category(label) => f.write_str(label),
        }
    }
}

/// Counts per value, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FacetCount {
    entries: Vec<(FacetValue, u64)>,
    index: HashMap<FacetValue, usize>,
}

impl FacetCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: FacetValue, count: u64) {
        match self.index.get(&value) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(value.clone(), self.entries.len());
                self.entries.push((value, count));
            }
        }
    }

    pub fn increment(&mut self, value: FacetValue) {
        self.add(value, 1);
    }

    pub fn get(&self, value: &FacetValue) -> u64 {
        self.index
            .get(value)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FacetValue, u64)> {
        self.entries.iter().map(|(value, count)| (value, *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl PartialEq for FacetCount {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

struct Bucket<'a> {
    value: &'a FacetValue,
    count: u64,
}

impl Serialize for Bucket<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Bucket", 2)?;
        s.serialize_field("value", self.value)?;
        s.serialize_field("count", &self.count)?;
        s.end()
    }
}

impl Serialize for FacetCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(value, count)| Bucket { value, count }))
    }
}

/// Facet counts for every dimension present in a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetSummary {
    dimensions: Vec<(Dimension, FacetCount)>,
}

impl FacetSummary {
    pub fn get(&self, dimension: &Dimension) -> Option<&FacetCount> {
        self.dimensions
            .iter()
            .find(|(d, _)| d == dimension)
            .map(|(_, counts)| counts)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, &FacetCount)> {
        self.dimensions.iter().map(|(d, counts)| (d, counts))
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    fn entry(&mut self, dimension: Dimension) -> &mut FacetCount {
        let pos = match self.dimensions.iter().position(|(d, _)| *d == dimension) {
            Some(pos) => pos,
            None => {
                self.dimensions.push((dimension, FacetCount::new()));
                self.dimensions.len() - 1
            }
        };
        &mut self.dimensions[pos].1
    }
}

impl Serialize for FacetSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.dimensions.iter().map(|(d, counts)| (d.as_str(), counts)))
    }
}

/// Count type, year and topic over the dossiers in the current result set.
///
/// Dossiers lacking a value for a dimension are skipped for that dimension only.
pub fn count_facets<T: Borrow<Dossier>>(dossiers: &[T]) -> FacetSummary {
    let mut summary = FacetSummary::default();
    // Fix the dimension order regardless of which values show up first.
    summary.entry(Dimension::Type);
    summary.entry(Dimension::Year);
    summary.entry(Dimension::Topic);

    for dossier in dossiers {
        let dossier = dossier.borrow();
        if !dossier.type_code.is_empty() {
            summary
                .entry(Dimension::Type)
                .increment(FacetValue::Category(dossier.type_code.as_str().to_string()));
        }
        if let Some(year) = dossier.year {
            summary.entry(Dimension::Year).increment(FacetValue::Year(year));
        }
        if let Some(ref topic) = dossier.topic {
            summary
                .entry(Dimension::Topic)
                .increment(FacetValue::Category(topic.clone()));
        }
    }

    summary.dimensions.retain(|(_, counts)| !counts.is_empty());
    summary
}

/// Adopt server-aggregated buckets without recounting.
pub fn from_buckets(buckets: &[FacetBucket]) -> FacetSummary {
    let mut summary = FacetSummary::default();
    for bucket in buckets {
        summary
            .entry(Dimension::from_key(&bucket.dimension))
            .add(FacetValue::from_label(&bucket.name), bucket.count);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeCode;

    fn dossier(type_code: &str, year: Option<i32>, topic: Option<&str>) -> Dossier {
        Dossier {
            type_code: TypeCode::from(type_code),
            year,
            topic: topic.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_count_facets_in_first_seen_order() {
        let set = vec![
            dossier("2k", Some(2021), Some("Verkeer")),
            dossier("2i", Some(2020), None),
            dossier("2k", Some(2021), Some("Verkeer")),
            dossier("2c", None, Some("Onderwijs")),
        ];
        let summary = count_facets(&set);

        let types = summary.get(&Dimension::Type).unwrap();
        let order: Vec<String> = types.iter().map(|(v, _)| v.to_string()).collect();
        assert_eq!(order, vec!["2k", "2i", "2c"]);
        assert_eq!(types.get(&FacetValue::Category("2k".into())), 2);
        assert_eq!(types.total(), 4);

        let years = summary.get(&Dimension::Year).unwrap();
        assert_eq!(years.get(&FacetValue::Year(2021)), 2);
        assert_eq!(years.total(), 3);

        let topics = summary.get(&Dimension::Topic).unwrap();
        assert_eq!(topics.len(), 2);
    }

    #[test]
    fn test_empty_set_has_no_dimensions() {
        let empty: Vec<Dossier> = Vec::new();
        assert!(count_facets(&empty).is_empty());
    }

    #[test]
    fn test_from_buckets_classifies_labels() {
        let buckets = vec![
            FacetBucket {
                dimension: "dc_type".into(),
                name: "2k".into(),
                count: 7,
            },
            FacetBucket {
                dimension: "year".into(),
                name: "2019".into(),
                count: 3,
            },
            FacetBucket {
                dimension: "dc_publisher".into(),
                name: "Gemeente Nijmegen".into(),
                count: 10,
            },
        ];
        let summary = from_buckets(&buckets);
        assert_eq!(
            summary.get(&Dimension::Type).unwrap().get(&FacetValue::Category("2k".into())),
            7
        );
        assert_eq!(summary.get(&Dimension::Year).unwrap().get(&FacetValue::Year(2019)), 3);
        assert_eq!(summary.get(&Dimension::Publisher).unwrap().total(), 10);
    }

    #[test]
    fn test_summary_serializes_as_map() {
        let set = vec![dossier("2k", Some(2021), None)];
        let json = serde_json::to_value(count_facets(&set)).unwrap();
        assert_eq!(json["type"][0]["value"], "2k");
        assert_eq!(json["year"][0]["value"], 2021);
        assert_eq!(json["year"][0]["count"], 1);
    }
}
