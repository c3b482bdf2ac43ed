//! gazetteer-cli: command-line front end for gazetteer-core
//!
//! Usage examples
//! --------------
//!
//! - Search by name (default matching: contains)
//!   $ gazetteer-cli find Berlin
//!   $ gazetteer-cli find Neustadt --matching begins-with
//!
//! - Lookup by id
//!   $ gazetteer-cli get DEBKGGND00001GFQ
//!
//! - Show the request that would be sent (no network)
//!   $ gazetteer-cli request Berlin --matching exact
//!   $ gazetteer-cli request --id DEBKGGND00001GFQ
//!
//! - Map a saved response offline
//!   $ gazetteer-cli --json map response.xml
//!
//! Configuration
//! -------------
//!
//! The bundled `data/wfs.json` of `gazetteer-core` is used unless
//! `--config <path>` is given. `WFS_GAZETTEER_URL`, `HTTP_PROXY_HOST` and
//! `HTTP_PROXY_PORT` override the file in both cases.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use gazetteer_core::encode::GetFeatureRequest;
use gazetteer_core::filter::{build_identity_filter, build_search_filter};
use gazetteer_core::{GazetteerConfig, Localization, Location, LocationMapper, SearchQuery};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let localization = match args.localization.as_deref() {
        Some(path) => Arc::new(Localization::load_from_path(path)?),
        None => Localization::bundled()?,
    };
    debug!(
        url = %config.url,
        types = config.object_types.len(),
        localized_types = localization.len(),
        "configuration loaded"
    );

    match args.command {
        Commands::Find { term, matching } => {
            let found = online::find(config, localization, &term, matching)?;
            if found.is_empty() && !args.json {
                println!("No locations found matching: {term}");
            } else {
                print_locations(&found, args.json)?;
            }
        }

        Commands::Get { id } => match online::get(config, localization, &id)? {
            Some(location) => print_locations(std::slice::from_ref(&location), args.json)?,
            None => println!("not found"),
        },

        Commands::Request { term, matching, id } => {
            let filter = match (id, term) {
                (Some(id), _) => build_identity_filter(&id),
                (None, Some(term)) => build_search_filter(
                    &SearchQuery::new(term, matching)
                        .with_allowed_types(config.object_types.iter().cloned()),
                ),
                (None, None) => anyhow::bail!("either a term or --id is required"),
            };
            let xml =
                GetFeatureRequest::new(&config.feature_type, &config.properties, &filter).encode()?;
            println!("{xml}");
        }

        Commands::Map { file } => {
            let body = std::fs::read(&file).with_context(|| format!("cannot read {file}"))?;
            let found = LocationMapper::new(&localization)
                .with_axis_order(config.axis_order)
                .map_response(&body)?;
            print_locations(&found, args.json)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> anyhow::Result<GazetteerConfig> {
    match path {
        Some(path) => GazetteerConfig::load_with_env(path)
            .with_context(|| format!("loading configuration from {path}")),
        None => Ok(GazetteerConfig::load()?),
    }
}

fn print_locations(locations: &[Location], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(locations)?);
        return Ok(());
    }
    for l in locations {
        println!(
            "{}  {}  [{}/{}]  {}  {}",
            l.id(),
            l.name(),
            l.type_id(),
            l.type_name().unwrap_or("-"),
            l.bounding_box,
            l.native_key().unwrap_or("-"),
        );
    }
    Ok(())
}

#[cfg(feature = "http")]
mod online {
    use gazetteer_core::{
        GazetteerConfig, GazetteerService, Localization, Location, MatchingType, WfsGazetteer,
    };
    use std::sync::Arc;

    pub fn find(
        config: GazetteerConfig,
        localization: Arc<Localization>,
        term: &str,
        matching: Option<MatchingType>,
    ) -> anyhow::Result<Vec<Location>> {
        let gazetteer = WfsGazetteer::from_config(config, localization)?;
        Ok(gazetteer.find_by_term(term, matching)?)
    }

    pub fn get(
        config: GazetteerConfig,
        localization: Arc<Localization>,
        id: &str,
    ) -> anyhow::Result<Option<Location>> {
        let gazetteer = WfsGazetteer::from_config(config, localization)?;
        Ok(gazetteer.get_by_id(id)?)
    }
}

#[cfg(not(feature = "http"))]
mod online {
    use gazetteer_core::{GazetteerConfig, Localization, Location, MatchingType};
    use std::sync::Arc;

    pub fn find(
        _config: GazetteerConfig,
        _localization: Arc<Localization>,
        _term: &str,
        _matching: Option<MatchingType>,
    ) -> anyhow::Result<Vec<Location>> {
        anyhow::bail!("`find` needs the `http` feature")
    }

    pub fn get(
        _config: GazetteerConfig,
        _localization: Arc<Localization>,
        _id: &str,
    ) -> anyhow::Result<Option<Location>> {
        anyhow::bail!("`get` needs the `http` feature")
    }
}
