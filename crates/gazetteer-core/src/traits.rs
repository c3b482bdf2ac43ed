// crates/gazetteer-core/src/traits.rs
use crate::error::Result;
use crate::model::{Location, MatchingType};

/// The gazetteer operations a location lookup backend offers.
///
/// Implementations are expected to be cheap to share across threads: every
/// call builds its own request and mapping state.
///
/// # Example
///
/// ```no_run
/// use gazetteer_core::{GazetteerService, MatchingType, WfsGazetteer};
///
/// let gazetteer = WfsGazetteer::load().unwrap();
///
/// for location in gazetteer.find_by_term("Berlin", Some(MatchingType::BeginsWith)).unwrap() {
///     println!("{} ({})", location.name(), location.type_name().unwrap_or("?"));
/// }
///
/// match gazetteer.get_by_id("DEBKGGND00001GFQ").unwrap() {
///     Some(berlin) => println!("{}: {}", berlin.name(), berlin.bounding_box),
///     None => println!("not found"),
/// }
/// ```
pub trait GazetteerService {
    /// Locations whose name matches `term`, in server order.
    ///
    /// `matching` defaults to [`MatchingType::Contains`].
    fn find_by_term(&self, term: &str, matching: Option<MatchingType>) -> Result<Vec<Location>>;

    /// The location with the given id, or `Ok(None)`.
    fn get_by_id(&self, id: &str) -> Result<Option<Location>>;

    /// Free-text location extraction.
    ///
    /// Backends without text analysis return
    /// [`crate::GazetteerError::Unsupported`].
    fn locations_from_text(
        &self,
        _text: &str,
        _analyze_max_words: usize,
        _ignore_case: bool,
    ) -> Result<Vec<Location>> {
        Err(crate::GazetteerError::Unsupported("locations_from_text"))
    }

    /// Locations related to `id` (parents, children, neighbours).
    fn related_locations(&self, _id: &str, _include_from: bool) -> Result<Vec<Location>> {
        Err(crate::GazetteerError::Unsupported("related_locations"))
    }
}
