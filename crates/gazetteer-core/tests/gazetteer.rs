// crates/gazetteer-core/tests/gazetteer.rs
//
// Full pipeline (filter -> encode -> transport -> parse -> map) against
// recorded WFS responses. No network.

use gazetteer_core::prelude::*;
use gazetteer_core::Transport;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn fixture(name: &str) -> Vec<u8> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    std::fs::read(&path).unwrap_or_else(|e| panic!("fixture {}: {e}", path.display()))
}

/// Answers every request with one canned body and remembers what was sent.
struct FixtureTransport {
    body: Vec<u8>,
    requests: Mutex<Vec<String>>,
}

impl FixtureTransport {
    fn new(name: &str) -> Self {
        Self {
            body: fixture(name),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last_request(&self) -> String {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Transport for FixtureTransport {
    fn post_xml(&self, _url: &str, body: &str, _timeout: Option<Duration>) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(body.to_string());
        Ok(self.body.clone())
    }
}

fn config() -> GazetteerConfig {
    GazetteerConfig::load_from_path(GazetteerConfig::default_path()).unwrap()
}

fn gazetteer(fixture_name: &str) -> WfsGazetteer<FixtureTransport> {
    let transport = FixtureTransport::new(fixture_name);
    WfsGazetteer::with_transport(config(), Localization::bundled().unwrap(), transport).unwrap()
}

#[test]
fn get_by_id_maps_berlin() {
    let g = gazetteer("berlin_by_id.xml");

    let berlin = g.get_by_id("DEBKGGND00001GFQ").unwrap().expect("Berlin");

    assert_eq!(berlin.id(), "DEBKGGND00001GFQ");
    assert_eq!(berlin.name(), "Berlin");
    assert_eq!(berlin.type_id(), "use2Type");
    assert_eq!(berlin.type_name(), Some("Bundesland"));
    assert_eq!(berlin.native_key(), None);

    let [min_lon, min_lat, max_lon, max_lat] = berlin.bounding_box.as_array();
    assert!((min_lon - 13.08).abs() < 0.01, "{min_lon}");
    assert!((min_lat - 52.33).abs() < 0.01, "{min_lat}");
    assert!((max_lon - 13.76).abs() < 0.01, "{max_lon}");
    assert!((max_lat - 52.67).abs() < 0.01, "{max_lat}");
    assert!(berlin.bounding_box.is_normalized());

    let request = g.transport().last_request();
    assert!(request.contains("<ogc:PropertyName>gn:nnid</ogc:PropertyName>"));
    assert!(request.contains("<ogc:Literal>DEBKGGND00001GFQ</ogc:Literal>"));
    assert!(!request.contains("<ogc:Or>"));
}

#[test]
fn exact_search_keeps_the_callers_pattern() {
    let g = gazetteer("niedersachsen_exact.xml");

    let found = g
        .find_by_term("Niedersachsen*", Some(MatchingType::Exact))
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "Niedersachsen");
    assert_eq!(found[0].native_key(), Some("03000000"));
    assert_eq!(
        found[0].bounding_box,
        BoundingBox::new(6.65459, 51.29507, 11.59810, 53.89298)
    );

    let request = g.transport().last_request();
    assert!(request.contains("<ogc:Literal>Niedersachsen*</ogc:Literal>"));
    assert!(!request.contains("*Niedersachsen"));
}

#[test]
fn search_patterns_follow_matching_mode() {
    let g = gazetteer("niedersachsen_exact.xml");

    for (matching, literal) in [
        (Some(MatchingType::Exact), "Berlin"),
        (Some(MatchingType::BeginsWith), "Berlin*"),
        (Some(MatchingType::Contains), "*Berlin*"),
        (None, "*Berlin*"),
    ] {
        g.find_by_term("Berlin", matching).unwrap();
        let request = g.transport().last_request();
        assert!(
            request.contains(&format!("<ogc:Literal>{literal}</ogc:Literal>")),
            "{matching:?}: {request}"
        );
    }
}

#[test]
fn search_whitelists_configured_object_types() {
    let g = gazetteer("niedersachsen_exact.xml");
    g.find_by_term("Berlin", None).unwrap();

    let request = g.transport().last_request();
    assert!(request.contains("<ogc:And>"));
    assert!(request.contains("<ogc:Or>"));
    for object_type in &g.config().object_types {
        assert!(request.contains(&format!("<ogc:Literal>{object_type}</ogc:Literal>")));
    }
}

#[test]
fn one_malformed_member_is_skipped() {
    let g = gazetteer("with_malformed_member.xml");

    let found = g.find_by_term("Berlin", None).unwrap();

    let ids: Vec<_> = found.iter().map(|l| l.id()).collect();
    assert_eq!(
        ids,
        ["DEBKGGND0000A001", "DEBKGGND0000A003", "DEBKGGND0000A004"]
    );

    // Reference from a surviving feature still resolves.
    assert_eq!(found[1].type_id(), "use7Type");
    assert_eq!(found[1].type_name(), Some("Ortsteil"));

    // Ring geometry reduced to its envelope.
    assert_eq!(
        found[2].bounding_box,
        BoundingBox::new(12.58, 53.22, 12.61, 53.24)
    );
    assert_eq!(found[2].native_key(), Some("12068052"));
}

#[test]
fn references_resolve_in_either_direction() {
    let g = gazetteer("forward_references.xml");

    let found = g.find_by_term("Neustadt", Some(MatchingType::BeginsWith)).unwrap();
    assert_eq!(found.len(), 3);

    // Forward reference to t7, defined by the second feature.
    assert_eq!(found[0].type_id(), "use6Type");
    assert_eq!(found[0].type_name(), Some("Gemeinde"));
    assert_eq!(found[1].type_id(), "use6Type");

    // Dangling reference: marker stripped, no name.
    assert_eq!(found[2].type_id(), "t99");
    assert_eq!(found[2].type_name(), None);
}

#[test]
fn latin1_documents_are_decoded() {
    let g = gazetteer("koeln_latin1.xml");

    let found = g.find_by_term("Köln", Some(MatchingType::Exact)).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "Köln");
    assert_eq!(found[0].type_name(), Some("Gemeinde"));
    assert_eq!(found[0].native_key(), Some("05315000"));
}

#[test]
fn mapping_is_deterministic() {
    let body = fixture("forward_references.xml");
    let table = Localization::bundled().unwrap();
    let mapper = gazetteer_core::LocationMapper::new(&table);

    let first = mapper.map_response(&body).unwrap();
    let second = mapper.map_response(&body).unwrap();
    assert_eq!(first, second);
}

#[test]
fn exception_report_is_an_error_not_an_empty_result() {
    let g = gazetteer("exception_report.xml");

    match g.find_by_term("Berlin", None) {
        Err(GazetteerError::ServiceException(msg)) => {
            assert!(msg.contains("gn:GnObjektX"), "{msg}")
        }
        other => panic!("expected service exception, got {other:?}"),
    }
}

#[test]
fn non_xml_body_is_malformed() {
    let g = WfsGazetteer::with_transport(
        config(),
        Localization::bundled().unwrap(),
        |_: &str, _: &str, _: Option<Duration>| -> Result<Vec<u8>> {
            Ok(b"<html><body>502 Bad Gateway</body></html>".to_vec())
        },
    )
    .unwrap();

    assert!(matches!(
        g.get_by_id("DEBKGGND00001GFQ"),
        Err(GazetteerError::MalformedResponse(_))
    ));
}

#[test]
fn timeouts_are_reported_as_timeouts() {
    let g = WfsGazetteer::with_transport(
        config(),
        Localization::bundled().unwrap(),
        |_: &str, _: &str, timeout: Option<Duration>| -> Result<Vec<u8>> {
            Err(GazetteerError::Timeout(timeout.unwrap_or_default()))
        },
    )
    .unwrap()
    .with_timeout(Some(Duration::from_millis(250)));

    match g.find_by_term("Berlin", None) {
        Err(GazetteerError::Timeout(d)) => assert_eq!(d, Duration::from_millis(250)),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn concurrent_calls_do_not_interfere() {
    let berlin = fixture("berlin_by_id.xml");
    let neustadt = fixture("forward_references.xml");
    let g = Arc::new(
        WfsGazetteer::with_transport(
            config(),
            Localization::bundled().unwrap(),
            move |_: &str, body: &str, _: Option<Duration>| -> Result<Vec<u8>> {
                if body.contains("gn:nnid") {
                    Ok(berlin.clone())
                } else {
                    Ok(neustadt.clone())
                }
            },
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let g = Arc::clone(&g);
            thread::spawn(move || {
                if i % 2 == 0 {
                    let loc = g.get_by_id("DEBKGGND00001GFQ").unwrap().unwrap();
                    assert_eq!(loc.type_id(), "use2Type");
                } else {
                    let found = g.find_by_term("Neustadt", None).unwrap();
                    assert_eq!(found[0].type_id(), "use6Type");
                    assert_eq!(found[2].type_id(), "t99");
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
