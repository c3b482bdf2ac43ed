//! gazetteer-cli
//! =============
//!
//! Command-line interface for the `gazetteer-core` WFS gazetteer adapter.
//!
//! This crate primarily provides a binary (`gazetteer-cli`). The library
//! target only carries this overview page.
//!
//! Quick start
//! -----------
//!
//! ```text
//! gazetteer-cli --help
//! gazetteer-cli find Berlin --matching begins-with
//! gazetteer-cli get DEBKGGND00001GFQ
//! gazetteer-cli request --id DEBKGGND00001GFQ
//! gazetteer-cli --json map response.xml
//! ```
//!
//! For programmatic access use the [`gazetteer-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
