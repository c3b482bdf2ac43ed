// crates/gazetteer-core/src/model.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the search term is turned into a LIKE pattern.
///
/// `Contains` is the default, and it is also what an absent matching mode
/// means in [`SearchQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingType {
    /// The term is used as-is. Wildcards typed by the caller still apply.
    Exact,
    /// `term*`
    BeginsWith,
    /// `*term*`
    #[default]
    Contains,
}

impl FromStr for MatchingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "exact" => Ok(MatchingType::Exact),
            "begins-with" | "prefix" => Ok(MatchingType::BeginsWith),
            "contains" => Ok(MatchingType::Contains),
            other => Err(format!("unknown matching type: {other}")),
        }
    }
}

impl fmt::Display for MatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchingType::Exact => "exact",
            MatchingType::BeginsWith => "begins-with",
            MatchingType::Contains => "contains",
        })
    }
}

/// A term search as issued by [`crate::GazetteerService::find_by_term`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub matching: Option<MatchingType>,
    /// Object-type codes for the OR whitelist, in configured order.
    pub allowed_types: Vec<String>,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, matching: Option<MatchingType>) -> Self {
        Self {
            term: term.into(),
            matching,
            allowed_types: Vec::new(),
        }
    }

    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// The effective matching mode (absent means contains).
    pub fn matching(&self) -> MatchingType {
        self.matching.unwrap_or_default()
    }
}

/// Axis-aligned box in (lon, lat) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Smallest box enclosing every `(lon, lat)` vertex.
    ///
    /// The accumulator starts at the first vertex, so zero coordinates are
    /// handled like any other value. Returns `None` for an empty ring.
    pub fn enclosing<I>(vertices: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = vertices.into_iter();
        let (lon, lat) = iter.next()?;
        let first = Self::new(lon, lat, lon, lat);

        Some(iter.fold(first, |b, (lon, lat)| Self {
            min_lon: b.min_lon.min(lon),
            min_lat: b.min_lat.min(lat),
            max_lon: b.max_lon.max(lon),
            max_lat: b.max_lat.max(lat),
        }))
    }

    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    pub fn is_normalized(&self) -> bool {
        self.min_lon <= self.max_lon && self.min_lat <= self.max_lat
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.5}, {:.5}, {:.5}, {:.5})",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// A normalized gazetteer entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub bounding_box: BoundingBox,
    /// Official administrative key (AGS), when the feature carries one.
    pub native_key: Option<String>,
    pub type_id: String,
    /// `None` only when the type could not be named at all, e.g. for a
    /// dangling type reference.
    pub type_name: Option<String>,
}

impl Location {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn native_key(&self) -> Option<&str> {
        self.native_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_defaults_to_contains() {
        let q = SearchQuery::new("Berlin", None);
        assert_eq!(q.matching(), MatchingType::Contains);
    }

    #[test]
    fn matching_parses_cli_spellings() {
        assert_eq!("exact".parse::<MatchingType>(), Ok(MatchingType::Exact));
        assert_eq!(
            "BEGINS_WITH".parse::<MatchingType>(),
            Ok(MatchingType::BeginsWith)
        );
        assert_eq!(
            "begins-with".parse::<MatchingType>(),
            Ok(MatchingType::BeginsWith)
        );
        assert!("fuzzy".parse::<MatchingType>().is_err());
    }

    #[test]
    fn enclosing_box_handles_zero_coordinates() {
        let b = BoundingBox::enclosing([(0.0, 0.0), (-1.5, 2.0), (3.0, -0.5)]).unwrap();
        assert_eq!(b, BoundingBox::new(-1.5, -0.5, 3.0, 2.0));
        assert!(b.is_normalized());
    }

    #[test]
    fn enclosing_box_of_empty_ring_is_none() {
        assert!(BoundingBox::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn location_serializes_with_snake_case_fields() {
        let loc = Location {
            id: "X".into(),
            name: "Y".into(),
            bounding_box: BoundingBox::new(1.0, 2.0, 3.0, 4.0),
            native_key: None,
            type_id: "use6Type".into(),
            type_name: Some("Gemeinde".into()),
        };
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["type_id"], "use6Type");
        assert_eq!(json["bounding_box"]["max_lat"], 4.0);
    }
}
