// crates/gazetteer-core/src/response/raw.rs
//! Typed intermediate form of one feature member, before any mapping
//! rules are applied.

use thiserror::Error;

/// Marker that starts a type reference (`xlink:href="#t1"`).
pub const REFERENCE_MARKER: char = '#';

/// Type information as found on the feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawType {
    /// `<Objektart gml:id=".."><schluessel/><objektart/></Objektart>`
    Inline {
        /// `gml:id` of the definition, the target of references.
        definition_key: Option<String>,
        /// `schluessel`
        code: String,
        /// `objektart`
        text: Option<String>,
    },
    /// Raw `xlink:href`, marker included.
    Reference(String),
}

/// Coordinates as found in the document, ordinates in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometry {
    /// Two `pos` elements (or an envelope's lower/upper corner).
    Corners([(f64, f64); 2]),
    /// A `posList` ring.
    Ring(Vec<(f64, f64)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub id: String,
    pub name: String,
    pub type_info: RawType,
    /// `ags`
    pub native_key: Option<String>,
    pub geometry: RawGeometry,
}

/// Why a single feature member was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("feature has no id")]
    MissingId,
    #[error("feature has no endonym name")]
    MissingName,
    #[error("feature has neither an inline type definition nor a type reference")]
    MissingType,
    #[error("inline type definition has no key")]
    MissingTypeKey,
    #[error("feature has no pos/posList geometry")]
    MissingGeometry,
    #[error("invalid coordinates: {0}")]
    BadCoordinates(String),
}

/// Result of reading a whole feature collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCollection {
    /// Surviving features, in server order.
    pub features: Vec<RawFeature>,
    /// Members skipped because they could not be read.
    pub dropped: usize,
}

impl ParsedCollection {
    pub fn member_count(&self) -> usize {
        self.features.len() + self.dropped
    }
}
