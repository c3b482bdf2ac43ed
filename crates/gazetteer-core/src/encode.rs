// crates/gazetteer-core/src/encode.rs

//! # Query Encoder
//!
//! Serializes a filter tree into a WFS 1.1.0 `GetFeature` document. Each
//! call owns its own writer, so concurrent encodes never share state.

use crate::config::FeatureTypeName;
use crate::error::{GazetteerError, Result};
use crate::filter::{FilterExpression, LikeFilter};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::io::Cursor;

pub const WFS_VERSION: &str = "1.1.0";
pub const NS_WFS: &str = "http://www.opengis.net/wfs";
pub const NS_OGC: &str = "http://www.opengis.net/ogc";
pub const NS_GML: &str = "http://www.opengis.net/gml";

/// Everything that goes into one `GetFeature` envelope.
///
/// The result type is always `results` (no hit counting, no paging).
#[derive(Debug, Clone, Copy)]
pub struct GetFeatureRequest<'a> {
    pub feature_type: &'a FeatureTypeName,
    pub properties: &'a [String],
    pub filter: &'a FilterExpression,
}

impl<'a> GetFeatureRequest<'a> {
    pub fn new(
        feature_type: &'a FeatureTypeName,
        properties: &'a [String],
        filter: &'a FilterExpression,
    ) -> Self {
        Self {
            feature_type,
            properties,
            filter,
        }
    }

    pub fn encode(&self) -> Result<String> {
        encode_get_feature(self)
    }
}

fn enc_err<E: Display>(e: E) -> GazetteerError {
    GazetteerError::Encode(e.to_string())
}

/// Writes the request as an XML string.
pub fn encode_get_feature(request: &GetFeatureRequest<'_>) -> Result<String> {
    let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(enc_err)?;

    let ft = request.feature_type;
    let ft_ns_attr = format!("xmlns:{}", ft.prefix);
    let mut root = BytesStart::new("wfs:GetFeature");
    root.push_attribute(("xmlns:wfs", NS_WFS));
    root.push_attribute(("xmlns:ogc", NS_OGC));
    root.push_attribute(("xmlns:gml", NS_GML));
    root.push_attribute((ft_ns_attr.as_str(), ft.namespace.as_str()));
    root.push_attribute(("service", "WFS"));
    root.push_attribute(("version", WFS_VERSION));
    root.push_attribute(("resultType", "results"));
    w.write_event(Event::Start(root)).map_err(enc_err)?;

    let type_name = ft.qualified();
    let mut query = BytesStart::new("wfs:Query");
    query.push_attribute(("typeName", type_name.as_str()));
    w.write_event(Event::Start(query)).map_err(enc_err)?;

    for property in request.properties {
        write_text_element(&mut w, "wfs:PropertyName", property)?;
    }

    if !is_empty(request.filter) {
        w.write_event(Event::Start(BytesStart::new("ogc:Filter")))
            .map_err(enc_err)?;
        write_expression(&mut w, request.filter)?;
        w.write_event(Event::End(BytesEnd::new("ogc:Filter")))
            .map_err(enc_err)?;
    }

    w.write_event(Event::End(BytesEnd::new("wfs:Query")))
        .map_err(enc_err)?;
    w.write_event(Event::End(BytesEnd::new("wfs:GetFeature")))
        .map_err(enc_err)?;

    String::from_utf8(w.into_inner().into_inner()).map_err(enc_err)
}

fn is_empty(expr: &FilterExpression) -> bool {
    match expr {
        FilterExpression::And(children) | FilterExpression::Or(children) => {
            children.iter().all(is_empty)
        }
        _ => false,
    }
}

// OGC logical operators need at least two operands: a single child is
// written in place of its parent, empty groups are dropped.
fn write_expression<W: std::io::Write>(w: &mut Writer<W>, expr: &FilterExpression) -> Result<()> {
    match expr {
        FilterExpression::Like(like) => write_like(w, like),
        FilterExpression::Equals {
            property,
            literal,
            match_case,
        } => {
            let mut start = BytesStart::new("ogc:PropertyIsEqualTo");
            start.push_attribute(("matchCase", bool_attr(*match_case)));
            w.write_event(Event::Start(start)).map_err(enc_err)?;
            write_text_element(w, "ogc:PropertyName", property)?;
            write_text_element(w, "ogc:Literal", literal)?;
            w.write_event(Event::End(BytesEnd::new("ogc:PropertyIsEqualTo")))
                .map_err(enc_err)?;
            Ok(())
        }
        FilterExpression::And(children) => write_logical(w, "ogc:And", children),
        FilterExpression::Or(children) => write_logical(w, "ogc:Or", children),
    }
}

fn write_logical<W: std::io::Write>(
    w: &mut Writer<W>,
    tag: &str,
    children: &[FilterExpression],
) -> Result<()> {
    let children: Vec<&FilterExpression> = children.iter().filter(|c| !is_empty(c)).collect();
    match children.as_slice() {
        [] => Ok(()),
        [only] => write_expression(w, only),
        many => {
            w.write_event(Event::Start(BytesStart::new(tag)))
                .map_err(enc_err)?;
            for child in many {
                write_expression(w, child)?;
            }
            w.write_event(Event::End(BytesEnd::new(tag)))
                .map_err(enc_err)?;
            Ok(())
        }
    }
}

fn write_like<W: std::io::Write>(w: &mut Writer<W>, like: &LikeFilter) -> Result<()> {
    let wildcard = like.wildcard.to_string();
    let single_char = like.single_char.to_string();
    let escape = like.escape.to_string();

    let mut start = BytesStart::new("ogc:PropertyIsLike");
    start.push_attribute(("wildCard", wildcard.as_str()));
    start.push_attribute(("singleChar", single_char.as_str()));
    start.push_attribute(("escapeChar", escape.as_str()));
    start.push_attribute(("matchCase", bool_attr(like.match_case)));
    w.write_event(Event::Start(start)).map_err(enc_err)?;
    write_text_element(w, "ogc:PropertyName", &like.property)?;
    write_text_element(w, "ogc:Literal", &like.pattern)?;
    w.write_event(Event::End(BytesEnd::new("ogc:PropertyIsLike")))
        .map_err(enc_err)?;
    Ok(())
}

fn write_text_element<W: std::io::Write>(w: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(tag)))
        .map_err(enc_err)?;
    w.write_event(Event::Text(BytesText::new(text)))
        .map_err(enc_err)?;
    w.write_event(Event::End(BytesEnd::new(tag)))
        .map_err(enc_err)?;
    Ok(())
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
