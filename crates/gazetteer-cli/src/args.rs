use clap::{Parser, Subcommand};
use gazetteer_core::MatchingType;

/// CLI arguments for gazetteer-cli
#[derive(Debug, Parser)]
#[command(
    name = "gazetteer-cli",
    version,
    about = "CLI for looking up locations in a WFS gazetteer"
)]
pub struct CliArgs {
    /// Path to a WFS configuration file (default: the bundled data/wfs.json)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Path to a localization table (default: the bundled German table)
    #[arg(short = 'l', long = "localization", global = true)]
    pub localization: Option<String>,

    /// Print locations as a JSON array
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search locations by name
    Find {
        /// Name or name fragment (e.g. Berlin)
        term: String,

        /// exact, begins-with or contains
        #[arg(short = 'm', long = "matching")]
        matching: Option<MatchingType>,
    },

    /// Lookup a single location by its gazetteer id
    Get {
        /// Gazetteer id (e.g. DEBKGGND00001GFQ)
        id: String,
    },

    /// Print the GetFeature request without sending it
    Request {
        /// Search term
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        term: Option<String>,

        #[arg(short = 'm', long = "matching")]
        matching: Option<MatchingType>,

        /// Encode an id lookup instead of a term search
        #[arg(long = "id")]
        id: Option<String>,
    },

    /// Map a saved WFS response file into locations
    Map {
        /// Path to a FeatureCollection XML document
        file: String,
    },
}
