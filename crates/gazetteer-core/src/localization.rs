// crates/gazetteer-core/src/localization.rs
use crate::error::{GazetteerError, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Parsed once per process; read-only afterwards.
static BUNDLED: OnceCell<Arc<Localization>> = OnceCell::new();

const BUNDLED_JSON: &str = include_str!("../data/localization.de.json");

/// Static lookup from raw object-type codes to display ids and names.
///
/// One table covers one display language. It is handed to the mapper
/// explicitly; nothing in the pipeline reaches for a global table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localization {
    #[serde(default)]
    type_ids: HashMap<String, String>,
    #[serde(default)]
    type_names: HashMap<String, String>,
}

impl Localization {
    pub fn new(type_ids: HashMap<String, String>, type_names: HashMap<String, String>) -> Self {
        Self {
            type_ids,
            type_names,
        }
    }

    /// The German table shipped with the crate.
    pub fn bundled() -> Result<Arc<Localization>> {
        BUNDLED
            .get_or_try_init(|| Self::from_json(BUNDLED_JSON).map(Arc::new))
            .cloned()
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("data")
            .join("localization.de.json")
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            GazetteerError::Config(format!(
                "localization table not found at {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Display id for a raw type code.
    pub fn type_id(&self, code: &str) -> Option<&str> {
        self.type_ids.get(code).map(String::as_str)
    }

    /// Human-readable name for a raw type code.
    pub fn type_name(&self, code: &str) -> Option<&str> {
        self.type_names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.type_ids.len().max(self.type_names.len())
    }

    pub fn is_empty(&self) -> bool {
        self.type_ids.is_empty() && self.type_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_maps_bundesland() {
        let table = Localization::bundled().unwrap();
        assert_eq!(table.type_id("AX_Bundesland"), Some("use2Type"));
        assert_eq!(table.type_name("AX_Bundesland"), Some("Bundesland"));
        assert_eq!(table.type_id("unknown"), None);
    }

    #[test]
    fn bundled_table_is_shared() {
        let a = Localization::bundled().unwrap();
        let b = Localization::bundled().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn file_on_disk_matches_embedded_copy() {
        let from_disk = Localization::load_from_path(Localization::default_path()).unwrap();
        assert_eq!(from_disk, *Localization::bundled().unwrap());
    }

    #[test]
    fn partial_tables_are_accepted() {
        let table = Localization::from_json(r#"{ "type_names": { "a": "A" } }"#).unwrap();
        assert_eq!(table.type_name("a"), Some("A"));
        assert_eq!(table.type_id("a"), None);
        assert!(!table.is_empty());
        assert_eq!(table.len(), 1);
    }
}
