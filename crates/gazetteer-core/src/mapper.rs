// crates/gazetteer-core/src/mapper.rs

//! # Location Mapper
//!
//! Turns the raw features of **one** response into [`Location`]s.
//!
//! Pass 1 maps every feature in order, computing its bounding box and, for
//! inline type definitions, its localized type id/name. Those definitions
//! are recorded by their `gml:id`. Features that only point at a definition
//! (`#t1`) keep the raw reference for now.
//!
//! Pass 2 walks the pending references and swaps in the recorded type. The
//! reference map lives only for the duration of one call.

use crate::config::AxisOrder;
use crate::error::Result;
use crate::localization::Localization;
use crate::model::{BoundingBox, Location};
use crate::response::{parse_feature_collection, RawFeature, RawGeometry, RawType, REFERENCE_MARKER};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Type id and name recorded for one inline type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub id: String,
    pub name: Option<String>,
}

/// Definition key (`gml:id`) -> resolved type, scoped to one response.
pub type TypeReferenceMap = HashMap<String, ResolvedType>;

#[derive(Debug, Clone, Copy)]
pub struct LocationMapper<'a> {
    localization: &'a Localization,
    axis_order: AxisOrder,
}

impl<'a> LocationMapper<'a> {
    pub fn new(localization: &'a Localization) -> Self {
        Self {
            localization,
            axis_order: AxisOrder::default(),
        }
    }

    pub fn with_axis_order(mut self, axis_order: AxisOrder) -> Self {
        self.axis_order = axis_order;
        self
    }

    /// Parses and maps a complete response body.
    pub fn map_response(&self, body: &[u8]) -> Result<Vec<Location>> {
        let parsed = parse_feature_collection(body)?;
        Ok(self.map_features(parsed.features))
    }

    pub fn map_features(&self, features: Vec<RawFeature>) -> Vec<Location> {
        let mut references = TypeReferenceMap::new();
        let mut pending: Vec<(usize, String)> = Vec::new();
        let mut locations = Vec::with_capacity(features.len());

        // Pass 1
        for feature in features {
            let Some(bounding_box) = self.bounding_box(&feature.geometry) else {
                warn!(feature_id = %feature.id, "skipping feature with empty geometry");
                continue;
            };

            let (type_id, type_name) = match feature.type_info {
                RawType::Inline {
                    definition_key,
                    code,
                    text,
                } => {
                    let resolved = self.resolve_inline(&code, text.as_deref());
                    if let Some(key) = definition_key {
                        references.insert(key, resolved.clone());
                    }
                    (resolved.id, resolved.name)
                }
                RawType::Reference(reference) => {
                    pending.push((locations.len(), reference.clone()));
                    (reference, None)
                }
            };

            locations.push(Location {
                id: feature.id,
                name: feature.name,
                bounding_box,
                native_key: feature.native_key,
                type_id,
                type_name,
            });
        }

        // Pass 2
        for (index, reference) in pending {
            let key = reference_key(&reference);
            let location = &mut locations[index];
            match references.get(key) {
                Some(resolved) => {
                    location.type_id = resolved.id.clone();
                    location.type_name = resolved.name.clone();
                }
                None => {
                    warn!(
                        feature_id = %location.id,
                        reference = %reference,
                        "type reference does not resolve within this response"
                    );
                    location.type_id = key.to_string();
                    location.type_name = None;
                }
            }
        }

        debug!(
            locations = locations.len(),
            type_definitions = references.len(),
            "mapped feature collection"
        );
        locations
    }

    /// Box in (lon, lat) order.
    ///
    /// Corners are taken as received. A ring is reduced to its coordinate-wise
    /// min/max; `None` only for an empty ring.
    pub fn bounding_box(&self, geometry: &RawGeometry) -> Option<BoundingBox> {
        match geometry {
            RawGeometry::Corners([a, b]) => {
                let (min_lon, min_lat) = self.axis_order.to_lon_lat(*a);
                let (max_lon, max_lat) = self.axis_order.to_lon_lat(*b);
                Some(BoundingBox::new(min_lon, min_lat, max_lon, max_lat))
            }
            RawGeometry::Ring(vertices) => BoundingBox::enclosing(
                vertices.iter().map(|&v| self.axis_order.to_lon_lat(v)),
            ),
        }
    }

    /// Localized id and name for an inline type definition.
    ///
    /// The id falls back to the raw code. The name is looked up by code,
    /// then by the inline text, then the inline text itself is used.
    pub fn resolve_inline(&self, code: &str, text: Option<&str>) -> ResolvedType {
        let id = match self.localization.type_id(code) {
            Some(id) => id.to_string(),
            None => {
                warn!(code, "no localized type id, using raw code");
                code.to_string()
            }
        };

        let name = match self.localization.type_name(code) {
            Some(name) => Some(name.to_string()),
            None => {
                warn!(code, "no localized type name, falling back to feature text");
                text.map(|t| self.localization.type_name(t).unwrap_or(t).to_string())
            }
        };

        ResolvedType { id, name }
    }
}

// "#t1" -> "t1"; "doc.xml#t1" -> "t1"; "t1" -> "t1"
fn reference_key(reference: &str) -> &str {
    reference
        .rsplit_once(REFERENCE_MARKER)
        .map_or(reference, |(_, key)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table() -> Localization {
        let ids = HashMap::from([("AX_Bundesland".to_string(), "use2Type".to_string())]);
        let names = HashMap::from([
            ("AX_Bundesland".to_string(), "Bundesland".to_string()),
            ("Kreis".to_string(), "Landkreis".to_string()),
        ]);
        Localization::new(ids, names)
    }

    fn inline(key: &str, code: &str, text: &str) -> RawType {
        RawType::Inline {
            definition_key: Some(key.into()),
            code: code.into(),
            text: Some(text.into()),
        }
    }

    fn feature(id: &str, type_info: RawType) -> RawFeature {
        RawFeature {
            id: id.into(),
            name: format!("name {id}"),
            type_info,
            native_key: None,
            geometry: RawGeometry::Corners([(1.0, 2.0), (3.0, 4.0)]),
        }
    }

    #[test]
    fn corners_are_taken_as_received() {
        let l = table();
        let m = LocationMapper::new(&l);
        let b = m
            .bounding_box(&RawGeometry::Corners([(13.08, 52.33), (13.76, 52.67)]))
            .unwrap();
        assert_eq!(b.as_array(), [13.08, 52.33, 13.76, 52.67]);
    }

    #[test]
    fn ring_box_is_coordinate_wise_min_max() {
        let l = table();
        let m = LocationMapper::new(&l);
        let ring = RawGeometry::Ring(vec![(0.0, 1.0), (-2.0, 0.0), (4.0, -1.0), (0.0, 1.0)]);
        assert_eq!(
            m.bounding_box(&ring).unwrap(),
            BoundingBox::new(-2.0, -1.0, 4.0, 1.0)
        );
        assert!(m.bounding_box(&RawGeometry::Ring(vec![])).is_none());
    }

    #[test]
    fn lat_lon_documents_are_swapped() {
        let l = table();
        let m = LocationMapper::new(&l).with_axis_order(AxisOrder::LatLon);
        let ring = RawGeometry::Ring(vec![(52.33, 13.08), (52.67, 13.76), (52.5, 13.4)]);
        assert_eq!(
            m.bounding_box(&ring).unwrap(),
            BoundingBox::new(13.08, 52.33, 13.76, 52.67)
        );
    }

    #[test]
    fn inline_type_is_localized() {
        let l = table();
        let m = LocationMapper::new(&l);
        let r = m.resolve_inline("AX_Bundesland", Some("Land"));
        assert_eq!(r.id, "use2Type");
        assert_eq!(r.name.as_deref(), Some("Bundesland"));
    }

    #[test]
    fn missing_localization_falls_back_to_raw_values() {
        let l = table();
        let m = LocationMapper::new(&l);

        let r = m.resolve_inline("AX_Unbekannt", Some("Weiler"));
        assert_eq!(r.id, "AX_Unbekannt");
        assert_eq!(r.name.as_deref(), Some("Weiler"));

        let r = m.resolve_inline("AX_KreisRegion", Some("Kreis"));
        assert_eq!(r.name.as_deref(), Some("Landkreis"));

        assert_eq!(m.resolve_inline("X", None).name, None);
    }

    #[test]
    fn forward_and_backward_references_resolve() {
        let l = table();
        let m = LocationMapper::new(&l);
        let features = vec![
            feature("A", RawType::Reference("#t1".into())),
            feature("B", inline("t1", "AX_Bundesland", "Bundesland")),
            feature("C", RawType::Reference("#t1".into())),
        ];

        let out = m.map_features(features);
        assert_eq!(out.len(), 3);
        for loc in &out {
            assert_eq!(loc.type_id, "use2Type", "{}", loc.id);
            assert_eq!(loc.type_name.as_deref(), Some("Bundesland"));
        }
        let ids: Vec<_> = out.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn dangling_reference_keeps_stripped_id() {
        let l = table();
        let m = LocationMapper::new(&l);
        let out = m.map_features(vec![feature("A", RawType::Reference("#t404".into()))]);
        assert_eq!(out[0].type_id, "t404");
        assert_eq!(out[0].type_name, None);
    }

    #[test]
    fn references_do_not_leak_between_calls() {
        let l = table();
        let m = LocationMapper::new(&l);
        m.map_features(vec![feature("A", inline("t1", "AX_Bundesland", "Bundesland"))]);
        let out = m.map_features(vec![feature("B", RawType::Reference("#t1".into()))]);
        assert_eq!(out[0].type_id, "t1");
    }

    #[test]
    fn reference_key_strips_marker() {
        assert_eq!(reference_key("#t1"), "t1");
        assert_eq!(reference_key("other.xml#t2"), "t2");
        assert_eq!(reference_key("t3"), "t3");
    }
}
