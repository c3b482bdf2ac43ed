//! Offline mapping example for wfs-gazetteer-rs
//!
//! Runs the pipeline without a server: prints the request a search would
//! send, then maps a recorded response into locations and shows how
//! errors surface.

use std::path::PathBuf;
use wfs_gazetteer_rs::prelude::*;
use wfs_gazetteer_rs::LocationMapper;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("crates/gazetteer-core/tests/fixtures")
        .join(name)
}

fn main() -> Result<()> {
    println!("=== WFS Gazetteer Offline Mapping Example ===\n");

    let config = GazetteerConfig::load()?;
    let localization = Localization::bundled()?;

    // Any transport works; this one answers with a recorded response.
    let body = std::fs::read(fixture("forward_references.xml"))?;
    let gazetteer = WfsGazetteer::with_transport(
        config,
        localization.clone(),
        move |_: &str, _: &str, _: Option<std::time::Duration>| -> Result<Vec<u8>> {
            Ok(body.clone())
        },
    )?;

    println!("--- Request for find_by_term(\"Neustadt\", begins-with) ---");
    println!(
        "{}\n",
        gazetteer.encode_search("Neustadt", Some(MatchingType::BeginsWith))?
    );

    println!("--- Mapped response ---");
    for location in gazetteer.find_by_term("Neustadt", Some(MatchingType::BeginsWith))? {
        println!(
            "- {} {} [{}/{}] {}",
            location.id(),
            location.name(),
            location.type_id(),
            location.type_name().unwrap_or("-"),
            location.bounding_box
        );
    }
    println!();

    println!("--- Mapping an exception report ---");
    let report = std::fs::read(fixture("exception_report.xml"))?;
    match LocationMapper::new(&localization).map_response(&report) {
        Ok(found) => println!("unexpected: {} locations", found.len()),
        Err(GazetteerError::ServiceException(msg)) => println!("✓ server said: {msg}"),
        Err(e) => return Err(e),
    }

    Ok(())
}
