//! Basic usage example for wfs-gazetteer-rs
//!
//! This example demonstrates how to:
//! - Load the bundled WFS configuration and localization table
//! - Search locations by name with the three matching modes
//! - Lookup a location by id
//!
//! It talks to the configured server, so it needs network access.
//! Set `WFS_GAZETTEER_URL` to point it at another endpoint.

use wfs_gazetteer_rs::prelude::*;

fn main() -> Result<()> {
    println!("=== WFS Gazetteer Basic Usage Example ===\n");

    let gazetteer = WfsGazetteer::load()?;
    println!("Endpoint: {}\n", gazetteer.config().url);

    for matching in [
        MatchingType::Exact,
        MatchingType::BeginsWith,
        MatchingType::Contains,
    ] {
        println!("--- find_by_term(\"Berlin\", {matching}) ---");
        let found = gazetteer.find_by_term("Berlin", Some(matching))?;
        println!("Found {} locations", found.len());
        for location in found.iter().take(5) {
            println!(
                "- {} [{}] {}",
                location.name(),
                location.type_name().unwrap_or(location.type_id()),
                location.bounding_box
            );
        }
        println!();
    }

    println!("--- get_by_id(\"DEBKGGND00001GFQ\") ---");
    match gazetteer.get_by_id("DEBKGGND00001GFQ")? {
        Some(location) => println!("{}: {}", location.name(), location.bounding_box),
        None => println!("not found"),
    }

    Ok(())
}
