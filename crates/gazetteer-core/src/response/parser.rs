// crates/gazetteer-core/src/response/parser.rs
use super::raw::{FeatureError, ParsedCollection, RawFeature, RawGeometry, RawType};
use crate::error::{GazetteerError, Result};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;
use tracing::{debug, warn};

// WFS 1.1 uses featureMember/featureMembers, WFS 2.0 uses member.
const MEMBER_CONTAINERS: [&str; 3] = ["featureMember", "featureMembers", "member"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Features,
    Exception,
}

fn classify_root(name: &str) -> Result<Root> {
    match name {
        "FeatureCollection" => Ok(Root::Features),
        "ExceptionReport" | "ServiceExceptionReport" => Ok(Root::Exception),
        other => Err(GazetteerError::MalformedResponse(format!(
            "expected a FeatureCollection, found <{other}>"
        ))),
    }
}

// -----------------------------------------------------------------------------
// PER-FEATURE SCRATCH
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct InlineType {
    key: Option<String>,
    code: Option<String>,
    text: Option<String>,
}

/// Collects the fields of one feature while its subtree streams by.
#[derive(Debug)]
struct FeatureScratch {
    /// Stack depth of the feature element itself.
    depth: usize,
    id: Option<String>,
    name: Option<String>,
    inline: Option<InlineType>,
    reference: Option<String>,
    native_key: Option<String>,
    positions: Vec<String>,
    pos_list: Option<(String, usize)>,
    pending_dim: Option<usize>,
}

impl FeatureScratch {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            id: None,
            name: None,
            inline: None,
            reference: None,
            native_key: None,
            positions: Vec::new(),
            pos_list: None,
            pending_dim: None,
        }
    }

    fn on_start(&mut self, name: &str, e: &BytesStart<'_>, decoder: Decoder) -> Result<()> {
        match name {
            "Objektart" if self.inline.is_none() => {
                self.inline = Some(InlineType {
                    key: attribute(e, b"id", decoder)?,
                    ..InlineType::default()
                });
            }
            "hatObjektart" if self.reference.is_none() => {
                self.reference =
                    attribute(e, b"href", decoder)?.filter(|href| !href.trim().is_empty());
            }
            "posList" => {
                self.pending_dim =
                    attribute(e, b"srsDimension", decoder)?.and_then(|d| d.trim().parse().ok());
            }
            _ => {}
        }
        Ok(())
    }

    /// `path` ends with the element being closed.
    fn on_end(&mut self, path: &[String], text: &str) {
        let Some(name) = path.last() else {
            return;
        };
        let parent = path.len().checked_sub(2).map(|i| path[i].as_str());
        let value = text.trim();
        let in_type = path[self.depth..].iter().any(|n| n == "Objektart");

        match name.as_str() {
            "nnid" => set_once(&mut self.id, value),
            "name" if parent == Some("Endonym") => set_once(&mut self.name, value),
            "schluessel" if in_type => {
                if let Some(inline) = self.inline.as_mut() {
                    set_once(&mut inline.code, value);
                }
            }
            "objektart" if in_type => {
                if let Some(inline) = self.inline.as_mut() {
                    set_once(&mut inline.text, value);
                }
            }
            "ags" => set_once(&mut self.native_key, value),
            "pos" | "lowerCorner" | "upperCorner" => self.positions.push(value.to_string()),
            "posList" if self.pos_list.is_none() => {
                let dim = self.pending_dim.take().unwrap_or(2);
                self.pos_list = Some((value.to_string(), dim));
            }
            _ => {}
        }
    }

    fn finish(self) -> std::result::Result<RawFeature, FeatureError> {
        let id = self.id.ok_or(FeatureError::MissingId)?;
        let name = self.name.ok_or(FeatureError::MissingName)?;

        let type_info = match (self.inline, self.reference) {
            (Some(inline), _) => RawType::Inline {
                definition_key: inline.key,
                code: inline.code.ok_or(FeatureError::MissingTypeKey)?,
                text: inline.text,
            },
            (None, Some(reference)) => RawType::Reference(reference),
            (None, None) => return Err(FeatureError::MissingType),
        };

        let geometry = match (self.positions.as_slice(), self.pos_list) {
            ([only], _) => {
                let p = parse_pair(only)?;
                RawGeometry::Corners([p, p])
            }
            ([a, b, ..], _) => RawGeometry::Corners([parse_pair(a)?, parse_pair(b)?]),
            ([], Some((list, dim))) => RawGeometry::Ring(parse_pos_list(&list, dim)?),
            ([], None) => return Err(FeatureError::MissingGeometry),
        };

        Ok(RawFeature {
            id,
            name,
            type_info,
            native_key: self.native_key,
            geometry,
        })
    }
}

fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

// -----------------------------------------------------------------------------
// COORDINATES
// -----------------------------------------------------------------------------

fn parse_ordinates(text: &str) -> std::result::Result<Vec<f64>, FeatureError> {
    text.split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| FeatureError::BadCoordinates(format!("not a number: {v}")))
        })
        .collect()
}

fn parse_pair(text: &str) -> std::result::Result<(f64, f64), FeatureError> {
    match parse_ordinates(text)?.as_slice() {
        [a, b, ..] => Ok((*a, *b)),
        _ => Err(FeatureError::BadCoordinates(format!(
            "pos needs two ordinates: {text:?}"
        ))),
    }
}

fn parse_pos_list(text: &str, dim: usize) -> std::result::Result<Vec<(f64, f64)>, FeatureError> {
    if dim < 2 {
        return Err(FeatureError::BadCoordinates(format!(
            "unsupported srsDimension {dim}"
        )));
    }
    let values = parse_ordinates(text)?;
    if values.is_empty() {
        return Err(FeatureError::BadCoordinates("empty posList".into()));
    }
    if values.len() % dim != 0 {
        return Err(FeatureError::BadCoordinates(format!(
            "posList has {} ordinates, not a multiple of {dim}",
            values.len()
        )));
    }
    Ok(values.chunks(dim).map(|c| (c[0], c[1])).collect())
}

// -----------------------------------------------------------------------------
// DOCUMENT
// -----------------------------------------------------------------------------

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

// Values are decoded with the document's declared encoding.
fn attribute(e: &BytesStart<'_>, local: &[u8], decoder: Decoder) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| GazetteerError::MalformedResponse(err.to_string()))?;
        if attr.key.local_name().as_ref() == local {
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|err| GazetteerError::MalformedResponse(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn malformed(reader: &Reader<&[u8]>, err: impl Display) -> GazetteerError {
    GazetteerError::MalformedResponse(format!("{err} (at byte {})", reader.buffer_position()))
}

/// Streaming state for one document.
struct DocumentState {
    stack: Vec<String>,
    text: String,
    root: Option<Root>,
    current: Option<FeatureScratch>,
    exceptions: Vec<String>,
    out: ParsedCollection,
}

impl DocumentState {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            text: String::new(),
            root: None,
            current: None,
            exceptions: Vec::new(),
            out: ParsedCollection::default(),
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, decoder: Decoder) -> Result<()> {
        let name = local_name(e);
        self.text.clear();

        if self.stack.is_empty() {
            if self.root.is_some() {
                return Err(GazetteerError::MalformedResponse(
                    "more than one root element".into(),
                ));
            }
            self.root = Some(classify_root(&name)?);
        } else if let Some(feature) = self.current.as_mut() {
            feature.on_start(&name, e, decoder)?;
        } else if self.root == Some(Root::Features)
            && self.stack.len() == 2
            && MEMBER_CONTAINERS.contains(&self.stack[1].as_str())
        {
            let mut feature = FeatureScratch::new(self.stack.len());
            feature.on_start(&name, e, decoder)?;
            self.current = Some(feature);
        }

        self.stack.push(name);
        Ok(())
    }

    fn close(&mut self) {
        match self.current.take() {
            Some(feature) if self.stack.len() == feature.depth + 1 => self.finish_feature(feature),
            Some(mut feature) => {
                feature.on_end(&self.stack, &self.text);
                self.current = Some(feature);
            }
            None => {
                let is_exception_text = self
                    .stack
                    .last()
                    .is_some_and(|n| n == "ExceptionText" || n == "ServiceException");
                if self.root == Some(Root::Exception) && is_exception_text {
                    let text = self.text.trim();
                    if !text.is_empty() {
                        self.exceptions.push(text.to_string());
                    }
                }
            }
        }
        self.text.clear();
        self.stack.pop();
    }

    fn finish_feature(&mut self, feature: FeatureScratch) {
        let hint = feature.id.clone();
        match feature.finish() {
            Ok(raw) => self.out.features.push(raw),
            Err(err) => {
                warn!(
                    feature_id = hint.as_deref().unwrap_or("<unknown>"),
                    reason = %err,
                    "skipping malformed feature member"
                );
                self.out.dropped += 1;
            }
        }
    }

    fn into_result(self) -> Result<ParsedCollection> {
        if let Some(open) = self.stack.last() {
            return Err(GazetteerError::MalformedResponse(format!(
                "document ends inside <{open}>"
            )));
        }
        match self.root {
            None => Err(GazetteerError::MalformedResponse(
                "document has no root element".into(),
            )),
            Some(Root::Exception) => Err(GazetteerError::ServiceException(
                if self.exceptions.is_empty() {
                    "no exception text".to_string()
                } else {
                    self.exceptions.join("; ")
                },
            )),
            Some(Root::Features) => {
                let out = self.out;
                if out.features.is_empty() && out.dropped > 0 {
                    return Err(GazetteerError::MalformedResponse(format!(
                        "all {} feature members were malformed",
                        out.dropped
                    )));
                }
                debug!(
                    features = out.features.len(),
                    dropped = out.dropped,
                    "parsed feature collection"
                );
                Ok(out)
            }
        }
    }
}

/// Parses a WFS feature collection.
///
/// Members that lack an id, a name, a type or a readable geometry are
/// skipped with a warning. The call itself fails only when the document is
/// not a well-formed `FeatureCollection`, when the server sent an exception
/// report, or when every member had to be skipped.
pub fn parse_feature_collection(bytes: &[u8]) -> Result<ParsedCollection> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut state = DocumentState::new();
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| malformed(&reader, e))?
        {
            Event::Start(e) => state.open(&e, reader.decoder())?,
            Event::Empty(e) => {
                state.open(&e, reader.decoder())?;
                state.close();
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| malformed(&reader, e))?;
                state.text.push_str(&text);
            }
            Event::CData(c) => {
                let text = reader.decoder().decode(&c).map_err(|e| malformed(&reader, e))?;
                state.text.push_str(&text);
            }
            Event::End(_) => state.close(),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    state.into_result()
}
